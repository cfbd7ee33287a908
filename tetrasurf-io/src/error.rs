//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Unexpected end of file: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for tetrasurf_core::Error {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => tetrasurf_core::Error::Io(e),
            IoError::ParseError { line, message } => tetrasurf_core::Error::Parse { line, message },
            other => tetrasurf_core::Error::InvalidData(other.to_string()),
        }
    }
}
