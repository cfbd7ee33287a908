//! Error types for tetrasurf

use thiserror::Error;

/// Main error type for tetrasurf operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for tetrasurf operations
pub type Result<T> = std::result::Result<T, Error>;
