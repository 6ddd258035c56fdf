//! # Folio Vision
//!
//! Headless Chrome render contexts for computed-snapshot export.
//!
//! Each capture gets its own tab and its own disposable HTTP server serving a
//! single page: a fixed-width host holding the article stylesheet and the
//! article. The tab reads back the resolved styles, then both are torn down.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use folio_compiler_inline::{article_stylesheet, inline_computed};
//! use folio_theme::{ThemeCatalog, ThemeId};
//! use folio_vision::ChromeBackend;
//!
//! let mut backend = ChromeBackend::launch().unwrap();
//! let theme = ThemeId::clean();
//! let css = article_stylesheet(&theme, &ThemeCatalog::new());
//! let html = inline_computed(&mut backend, "<h2 class=\"section\">Hi</h2>", &css, &theme).unwrap();
//! println!("{}", html);
//! ```

mod capture;
mod page;
mod server;

pub use capture::{ChromeBackend, ChromeContext};
pub use page::{snapshot_page, snapshot_script, HOST_ID};
pub use server::{PageServer, RunningServer};

use folio_compiler_inline::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;

impl From<VisionError> for CompileError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Browser(msg) => CompileError::ContextUnavailable(msg),
            other => CompileError::Capture(other.to_string()),
        }
    }
}
