use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a state container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// The container was shut down; intents are no longer accepted.
    #[error("State container '{container}' is closed")]
    Closed { container: String },

    /// A container task panicked. The container is torn down.
    #[error("Task '{task}' of state container '{container}' failed: {message}")]
    TaskFailed {
        container: String,
        task: String,
        message: String,
    },
}

/// Errors that can occur when reading or writing a saved state snapshot.
#[derive(Debug, Error)]
pub enum SavedStateError {
    #[error("Failed to read saved state '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write saved state '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse saved state '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode saved state: {0}")]
    EncodeError(#[source] serde_json::Error),
}
