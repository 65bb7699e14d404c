//! Error types for meshslim

use thiserror::Error;

/// Main error type for meshslim operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A broken internal invariant of the simplification engine. Runs that
    /// hit this are aborted; it is never retried.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for meshslim operations
pub type Result<T> = std::result::Result<T, Error>;
