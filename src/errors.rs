//! Error taxonomy for playlist synchronization.
//!
//! Search misses and unresolvable tracks are not errors: they are reported
//! as values by the resolver and logged. Everything here is fatal for the
//! current run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport, auth, or protocol failure from the catalog or playlist API.
    #[error("remote call '{method}' failed: {reason}")]
    Remote { method: String, reason: String },
    #[error("resolution cache failure: {0}")]
    Cache(#[from] rusqlite::Error),
    #[error("resolution cache entry could not be encoded: {0}")]
    CacheEncoding(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("session is not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn remote(method: &str, reason: impl ToString) -> Self {
        SyncError::Remote {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
