//! Sidecar Error Hierarchy
//!
//! Every failure surfaces to the caller of `load`/`update` tagged with the
//! stage that produced it. Nothing is recovered locally.

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by an [`UpdateObserver`](crate::UpdateObserver).
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or decoding the persisted snapshot failed
    #[error("load targets snapshot failed: {0}")]
    Load(#[source] StorageError),

    /// A registered observer rejected the new target set
    #[error("do callbacks: observer #{index} failed: {source}")]
    Callback {
        index: usize,
        #[source]
        source: ObserverError,
    },

    /// Writing the snapshot failed after the in-memory state was updated
    #[error("save targets to file failed: {0}")]
    Persist(#[source] StorageError),

    /// Configuration sources could not be merged or deserialized
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration loaded but violates a validation rule
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Instrument construction failures
    #[error(transparent)]
    Metrics(#[from] prometheus::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Any read failure other than "file does not exist"
    #[error("read {path} failed: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File exists but its content is not a valid snapshot
    #[error("unmarshal {path} failed: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("marshal snapshot failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("create store dir {path} failed: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("write {path} failed: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// The storage failure behind a load or persist error, if any.
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Error::Load(e) | Error::Persist(e) => Some(e),
            _ => None,
        }
    }
}
