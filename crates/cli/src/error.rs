//! Error types for the greenbench CLI (native-only errors)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// CLI-specific error types (includes native dependencies)
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] greenbench_core::Error),

    #[error("Benchmark service returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
