use thiserror::Error;

pub type ThemeResult<T> = Result<T, ThemeImportError>;

#[derive(Error, Debug)]
pub enum ThemeImportError {
    #[error("Theme name is empty")]
    EmptyName,

    #[error("No theme variables or extra CSS found")]
    NoContent,

    #[error("Invalid theme JSON: {message}")]
    InvalidJson { message: String },
}

impl From<serde_json::Error> for ThemeImportError {
    fn from(e: serde_json::Error) -> Self {
        ThemeImportError::InvalidJson {
            message: e.to_string(),
        }
    }
}
