//! Persisted token-to-proxy assignment store
//!
//! A flat JSON object mapping token → address record, written in full on
//! every save. The store is plain single-owner data; the allocator holds it
//! behind its own lock, so nothing here needs to synchronize.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::address::ProxyAddress;
use super::errors::ProxyError;

/// In-memory token → [`ProxyAddress`] mapping backed by a JSON file.
///
/// Entries are created only through allocation or [`AssignmentStore::load`];
/// they are never mutated in place. The mapping grows until
/// [`AssignmentStore::clear`] wipes memory and file together.
#[derive(Debug)]
pub struct AssignmentStore {
    path: PathBuf,
    entries: HashMap<String, ProxyAddress>,
}

impl AssignmentStore {
    /// Create an empty store persisting to `path`. Nothing is read or
    /// written until [`AssignmentStore::load`] / [`AssignmentStore::save`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the record assigned to `token`.
    pub fn get(&self, token: &str) -> Result<Option<&ProxyAddress>, ProxyError> {
        check_token(token)?;
        Ok(self.entries.get(token))
    }

    /// Bind `token` to `record`, silently overwriting any prior binding.
    /// Callers that must not overwrite check [`AssignmentStore::get`] first.
    pub fn set(&mut self, token: &str, record: ProxyAddress) -> Result<(), ProxyError> {
        check_token(token)?;
        debug!("Assigning {} -> {}", token, record.authority());
        self.entries.insert(token.to_string(), record);
        Ok(())
    }

    /// The distinct records currently assigned, for collision checks.
    pub fn values(&self) -> HashSet<ProxyAddress> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore the mapping from the persisted file.
    ///
    /// A missing file is not an error: it is created holding an empty map,
    /// and the store starts empty.
    pub fn load(&mut self) -> Result<(), ProxyError> {
        if !self.path.exists() {
            self.write_entries(&HashMap::new())?;
            self.entries = HashMap::new();
            info!("Initialized empty assignment store at {}", self.path.display());
            return Ok(());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| ProxyError::StoreIo {
            path: self.path.clone(),
            source,
        })?;
        let entries: HashMap<String, ProxyAddress> =
            serde_json::from_str(&content).map_err(|source| ProxyError::StoreDecode {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Loaded {} assignments from {}",
            entries.len(),
            self.path.display()
        );
        self.entries = entries;
        Ok(())
    }

    /// Write the current mapping to the persisted file in full.
    pub fn save(&self) -> Result<(), ProxyError> {
        self.write_entries(&self.entries)?;
        info!(
            "Saved {} assignments to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Empty both the in-memory mapping and the persisted file.
    pub fn clear(&mut self) -> Result<(), ProxyError> {
        self.entries.clear();
        self.write_entries(&self.entries)?;
        info!("Cleared assignment store at {}", self.path.display());
        Ok(())
    }

    fn write_entries(&self, entries: &HashMap<String, ProxyAddress>) -> Result<(), ProxyError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ProxyError::StoreIo {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let content =
            serde_json::to_string_pretty(entries).map_err(|source| ProxyError::StoreEncode {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, content).map_err(|source| ProxyError::StoreIo {
            path: self.path.clone(),
            source,
        })
    }
}

fn check_token(token: &str) -> Result<(), ProxyError> {
    if token.is_empty() {
        return Err(ProxyError::InvalidToken);
    }
    Ok(())
}
