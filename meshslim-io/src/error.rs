//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        IoError::ParseError {
            line,
            message: message.into(),
        }
    }
}

impl From<IoError> for meshslim_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::ParseError { line, message } => meshslim_core::Error::Parse { line, message },
            IoError::Io(e) => meshslim_core::Error::Io(e),
            IoError::FileNotFound { path } => meshslim_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path),
            )),
            IoError::WriteError { message } => meshslim_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            )),
        }
    }
}
