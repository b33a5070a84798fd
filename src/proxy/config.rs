//! Allocator configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default pool source file name
pub const DEFAULT_POOL_FILE: &str = "proxies.txt";
/// Default persisted assignment store file name
pub const DEFAULT_STORE_FILE: &str = "assignments.json";

/// Configuration for a [`ProxyAllocator`](super::ProxyAllocator)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Pool source: newline-delimited `host:port[:username:password]` file
    pub pool_path: PathBuf,
    /// Persisted token → record store (JSON)
    pub store_path: PathBuf,
    /// Validate the whole pool at load time instead of at draw time
    pub strict_validation: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        let base = crate::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            pool_path: base.join(DEFAULT_POOL_FILE),
            store_path: base.join(DEFAULT_STORE_FILE),
            strict_validation: false,
        }
    }
}

impl AllocatorConfig {
    /// Create a configuration with explicit pool and store locations
    pub fn new(pool_path: impl Into<PathBuf>, store_path: impl Into<PathBuf>) -> Self {
        Self {
            pool_path: pool_path.into(),
            store_path: store_path.into(),
            strict_validation: false,
        }
    }

    /// Set the pool source path
    pub fn with_pool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pool_path = path.into();
        self
    }

    /// Set the persisted store path
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Enable or disable eager whole-pool validation
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = AllocatorConfig::default()
            .with_pool_path("/tmp/pool.txt")
            .with_store_path("/tmp/store.json")
            .with_strict_validation(true);

        assert_eq!(config.pool_path, PathBuf::from("/tmp/pool.txt"));
        assert_eq!(config.store_path, PathBuf::from("/tmp/store.json"));
        assert!(config.strict_validation);
    }

    #[test]
    fn test_default_file_names() {
        let config = AllocatorConfig::default();
        assert!(config.pool_path.ends_with(DEFAULT_POOL_FILE));
        assert!(config.store_path.ends_with(DEFAULT_STORE_FILE));
        assert!(!config.strict_validation);
    }
}
