//! Allocator error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by proxy parsing, allocation, and persistence
#[derive(Error, Debug)]
pub enum ProxyError {
    /// A raw proxy string failed validation. Carries the offending field,
    /// the reason, and the full raw input so the bad pool line can be
    /// located without re-running.
    #[error("invalid proxy address `{raw}`: {field}: {reason}")]
    InvalidAddress {
        field: &'static str,
        reason: String,
        raw: String,
    },

    #[error("token must be a non-empty string")]
    InvalidToken,

    #[error("failed to read proxy pool from {}", path.display())]
    PoolRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("assignment store I/O failed at {}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("assignment store at {} is not valid JSON", path.display())]
    StoreDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode assignments for {}", path.display())]
    StoreEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Every distinct record in the pool is already assigned to a token.
    #[error("proxy pool exhausted: all records across {pool_size} entries are assigned")]
    PoolExhausted { pool_size: usize },
}

impl ProxyError {
    pub(crate) fn invalid_address(
        field: &'static str,
        reason: impl Into<String>,
        raw: &str,
    ) -> Self {
        Self::InvalidAddress {
            field,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}
