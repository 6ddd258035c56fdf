//! Error types for the editor

use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No component selected: place the cursor inside a component block first")]
    NoSelection,

    #[error("Component '{component}' can only be applied in the structured editor")]
    UnsupportedInTextMode { component: String },

    #[error("This action needs the {expected} representation to be active")]
    WrongFormat { expected: Format },

    #[error("Unsupported document type: {}", path.display())]
    UnsupportedFile { path: PathBuf },

    #[error("Parse error: {0}")]
    Parse(#[from] folio_parser::ParseError),

    #[error(transparent)]
    Component(#[from] folio_components::ComponentError),

    #[error("Export error: {0}")]
    Compile(#[from] folio_compiler_inline::CompileError),

    #[error(transparent)]
    Persistence(#[from] folio_common::PersistenceError),

    #[error("Theme import error: {0}")]
    Theme(#[from] folio_theme::ThemeImportError),
}

impl EditorError {
    pub fn unsupported_in_text_mode(component: impl Into<String>) -> Self {
        EditorError::UnsupportedInTextMode {
            component: component.into(),
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
