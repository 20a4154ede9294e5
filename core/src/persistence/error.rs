//! Error types for timer persistence
//!
//! These never cross the `TimerBackend` boundary: backends log them and
//! report `false` or an empty set instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode timers as JSON")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode timer JSON")]
    Decode(#[source] serde_json::Error),

    #[error("malformed key-value store {path}")]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize key-value store")]
    StoreSerialize(#[source] toml::ser::Error),
}
