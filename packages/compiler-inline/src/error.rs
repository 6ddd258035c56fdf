use folio_parser::ParseError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Render context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Style capture failed: {0}")]
    Capture(String),

    #[error("Snapshot covers {captured} elements but the article has {expected}")]
    SnapshotMismatch { expected: usize, captured: usize },

    #[error("Compilation error: {0}")]
    Generic(String),
}

impl From<String> for CompileError {
    fn from(s: String) -> Self {
        CompileError::Generic(s)
    }
}

impl From<&str> for CompileError {
    fn from(s: &str) -> Self {
        CompileError::Generic(s.to_string())
    }
}
