use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persistence bridge. These are the only errors that
/// reach the user directly, so the messages are written for people.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Saving or opening outside the workspace folder is not allowed: {}", path.display())]
    Disallowed { path: PathBuf },

    #[error("Only Markdown, HTML and plain text files are supported: {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    pub fn disallowed(path: impl Into<PathBuf>) -> Self {
        PersistenceError::Disallowed { path: path.into() }
    }

    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        PersistenceError::UnsupportedExtension { path: path.into() }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        PersistenceError::NotFound { path: path.into() }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
