//! Proxy pool loading
//!
//! The pool source is a plain text file, one candidate per line. Lines are
//! trimmed and blanks dropped, but entries are NOT validated here: the pool
//! may hold far more candidates than are ever drawn, and rejecting
//! construction over an unused malformed line helps nobody. Validation
//! happens when a candidate is actually drawn (see the allocator), unless
//! strict mode is enabled.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::address::ProxyAddress;
use super::errors::ProxyError;

/// Read a newline-delimited pool source into raw candidate strings.
///
/// Each line is trimmed of surrounding whitespace (including `\r` from CRLF
/// sources); empty lines are discarded. Order and duplicates are preserved.
/// An unreadable source is fatal and propagates as [`ProxyError::PoolRead`].
pub fn read_pool(path: &Path) -> Result<Vec<String>, ProxyError> {
    let content = fs::read_to_string(path).map_err(|source| ProxyError::PoolRead {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<String> = content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    info!("Loaded {} pool entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Eagerly validate every pool entry (strict mode).
///
/// Fails on the first malformed line so the bad entry is reported before
/// any allocation happens.
pub fn validate_pool(entries: &[String]) -> Result<(), ProxyError> {
    for entry in entries {
        ProxyAddress::parse(entry)?;
    }
    debug!("Validated {} pool entries", entries.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_pool(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_trimmed_lines_in_order() {
        let file = write_pool("1.1.1.1:80\r\n\n  2.2.2.2:81  \n1.1.1.1:80\n");
        let entries = read_pool(file.path()).unwrap();
        assert_eq!(entries, vec!["1.1.1.1:80", "2.2.2.2:81", "1.1.1.1:80"]);
    }

    #[test]
    fn test_blank_source_yields_empty_pool() {
        let file = write_pool("\n\r\n   \n");
        let entries = read_pool(file.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let err = read_pool(Path::new("/nonexistent/proxies.txt")).unwrap_err();
        assert!(matches!(err, ProxyError::PoolRead { .. }));
    }

    #[test]
    fn test_load_does_not_validate() {
        let file = write_pool("not-a-proxy\n1.1.1.1:80\n");
        let entries = read_pool(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_validate_pool_rejects_malformed_entry() {
        let entries = vec!["1.1.1.1:80".to_string(), "not-a-proxy".to_string()];
        let err = validate_pool(&entries).unwrap_err();
        assert!(matches!(err, ProxyError::InvalidAddress { .. }));
    }
}
