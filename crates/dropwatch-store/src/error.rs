use std::path::PathBuf;

use thiserror::Error;

/// A persistence failure. Write errors risk silent data loss, so callers
/// must surface them at error severity even when they choose to continue.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
