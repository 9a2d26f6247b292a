//! Error types for the ntuple merge core library
//!
//! Errors are grouped into three categories:
//! - I/O errors: directory listing, metadata and file access
//! - Validation errors: malformed patterns and parameters
//! - Merge errors: failures reported by a merge engine backend

use thiserror::Error;

pub mod io;
pub mod merge;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::merge::MergeError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ntuple merge core library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Merge engine errors
    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let io_error = match err.into_io_error() {
            Some(source) => IoError::from_std(source),
            None => IoError::other("filesystem loop detected"),
        };
        match path {
            Some(path) => Self::Io(io_error.with_path(&path)),
            None => Self::Io(io_error),
        }
    }
}
