//! Proxy allocation module
//!
//! Maps opaque client tokens to proxy endpoints drawn from a finite pool.
//! An assignment is sticky: once a token is bound to an endpoint it gets the
//! same endpoint back on every call until the store is cleared, and no two
//! tokens ever share an endpoint. Assignments survive restarts through the
//! persisted store.

mod address;
mod config;
mod errors;
mod pool;
mod store;

pub use address::{ProxyAddress, ProxyAuth};
pub use config::AllocatorConfig;
pub use errors::ProxyError;
pub use store::AssignmentStore;

use std::collections::HashSet;
use std::path::Path;

use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info};

/// Token → proxy allocator.
///
/// Holds the pool and the assignment store behind one lock, so the whole
/// lookup-draw-commit sequence of [`ProxyAllocator::get_proxy`] is a single
/// critical section: concurrent calls with different tokens can never be
/// handed the same record, and concurrent calls with the same token both
/// observe the committed assignment.
pub struct ProxyAllocator {
    config: AllocatorConfig,
    inner: Mutex<AllocatorInner>,
}

struct AllocatorInner {
    pool: Vec<String>,
    store: AssignmentStore,
}

impl std::fmt::Debug for ProxyAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ProxyAllocator")
            .field("pool_size", &inner.pool.len())
            .field("assignments", &inner.store.len())
            .finish()
    }
}

impl ProxyAllocator {
    /// Create an allocator from a configuration.
    ///
    /// The pool is read once up front; an unreadable source aborts
    /// construction. With strict validation enabled every pool line is
    /// parsed here as well. The store starts empty; call
    /// [`ProxyAllocator::load`] to restore persisted assignments.
    pub fn new(config: AllocatorConfig) -> Result<Self, ProxyError> {
        let entries = pool::read_pool(&config.pool_path)?;
        if config.strict_validation {
            pool::validate_pool(&entries)?;
        }
        let store = AssignmentStore::new(config.store_path.clone());

        info!("ProxyAllocator initialized ({} pool entries)", entries.len());

        Ok(Self {
            config,
            inner: Mutex::new(AllocatorInner {
                pool: entries,
                store,
            }),
        })
    }

    /// Create an allocator from explicit pool and store paths
    pub fn with_paths(
        pool_path: impl AsRef<Path>,
        store_path: impl AsRef<Path>,
    ) -> Result<Self, ProxyError> {
        Self::new(AllocatorConfig::new(
            pool_path.as_ref(),
            store_path.as_ref(),
        ))
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Get the proxy assigned to `token`, allocating one if necessary.
    ///
    /// An existing assignment is returned unchanged. Otherwise candidates
    /// are drawn uniformly at random from the pool until one parses to a
    /// record no other token holds; that record is committed and returned.
    /// A malformed drawn entry signals a broken pool and fails the call
    /// immediately rather than being skipped. When every distinct record is
    /// already taken the call fails with [`ProxyError::PoolExhausted`].
    /// Failed calls leave the store exactly as it was.
    pub fn get_proxy(&self, token: &str) -> Result<ProxyAddress, ProxyError> {
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.store.get(token)? {
            debug!("Token {} already holds {}", token, existing.authority());
            return Ok(existing.clone());
        }

        let record = draw_unassigned(&inner.pool, &inner.store.values())?;
        inner.store.set(token, record.clone())?;
        info!("Assigned {} to token {}", record.authority(), token);
        Ok(record)
    }

    /// Re-read the pool source and replace the pool wholesale.
    ///
    /// The swap happens under the allocator lock: in-flight allocations
    /// observe either the old pool or the new one, never a mix. Returns the
    /// new pool size.
    pub fn reload_pool(&self) -> Result<usize, ProxyError> {
        let entries = pool::read_pool(&self.config.pool_path)?;
        if self.config.strict_validation {
            pool::validate_pool(&entries)?;
        }
        let count = entries.len();
        self.inner.lock().pool = entries;
        info!("Pool reloaded ({} entries)", count);
        Ok(count)
    }

    /// Restore assignments from the persisted store file
    pub fn load(&self) -> Result<(), ProxyError> {
        self.inner.lock().store.load()
    }

    /// Persist the current assignments in full
    pub fn save(&self) -> Result<(), ProxyError> {
        self.inner.lock().store.save()
    }

    /// Drop every assignment, in memory and on disk
    pub fn clear(&self) -> Result<(), ProxyError> {
        self.inner.lock().store.clear()
    }

    pub fn pool_size(&self) -> usize {
        self.inner.lock().pool.len()
    }

    pub fn assignment_count(&self) -> usize {
        self.inner.lock().store.len()
    }
}

/// Draw a candidate not present in `assigned`.
///
/// Random draws are bounded by the pool size; after that an in-order scan
/// distinguishes unlucky draws from true exhaustion. Both phases propagate
/// a parse failure on any candidate they touch.
fn draw_unassigned(
    pool: &[String],
    assigned: &HashSet<ProxyAddress>,
) -> Result<ProxyAddress, ProxyError> {
    if pool.is_empty() {
        return Err(ProxyError::PoolExhausted { pool_size: 0 });
    }

    let mut rng = rand::thread_rng();
    for _ in 0..pool.len() {
        let raw = &pool[rng.gen_range(0..pool.len())];
        let candidate = ProxyAddress::parse(raw)?;
        if !assigned.contains(&candidate) {
            return Ok(candidate);
        }
    }

    debug!("Random draws all collided, scanning pool in order");
    for raw in pool {
        let candidate = ProxyAddress::parse(raw)?;
        if !assigned.contains(&candidate) {
            return Ok(candidate);
        }
    }

    Err(ProxyError::PoolExhausted {
        pool_size: pool.len(),
    })
}
