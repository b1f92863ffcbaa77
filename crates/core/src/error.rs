//! Error types for greenbench-core (WASM-compatible)

use thiserror::Error;

/// Result type alias for greenbench-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that work in both native and WASM environments
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed response from benchmark service: {0}")]
    MalformedResponse(String),

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error for key '{key}': {message}")]
    StorageError { key: String, message: String },
}
