//! Request-path error types
//!
//! Every variant is answered the same way: a logged fault and a generic 500.

use thiserror::Error;

/// Faults raised by a pipeline stage while handling a request
#[derive(Debug, Error)]
pub enum ServeError {
    /// Reading an asset or the entry document failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A stage panicked
    #[error("stage panicked: {0}")]
    Panicked(String),
}

impl ServeError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
