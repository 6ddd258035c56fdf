use folio_parser::ParseError;
use thiserror::Error;

pub type ComponentResult<T> = Result<T, ComponentError>;

#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("Unknown component '{id}'")]
    UnknownComponent { id: String },

    #[error("Component '{id}' has no editable properties")]
    NotEditable { id: String },

    #[error("Component '{id}' rendered no content")]
    EmptyRender { id: String },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ComponentError {
    pub fn unknown(id: impl Into<String>) -> Self {
        ComponentError::UnknownComponent { id: id.into() }
    }

    pub fn not_editable(id: impl Into<String>) -> Self {
        ComponentError::NotEditable { id: id.into() }
    }
}
