//! # Folio Editor
//!
//! Editing engine for one article at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup → tree                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - tree and flat Markdown, one authoritative│
//! │  - debounced text → tree re-derivation      │
//! │  - component selection, apply, copy style   │
//! │  - smart format, themes, export             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-inline: paste-ready inline styles  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One source of truth**: the other representation is always derived
//! 2. **Component blocks survive both directions**: they travel through the
//!    flat text as raw markup carrying their encoded values
//! 3. **Injected clock**: debounce and typing state are driven by
//!    [`Instant`](std::time::Instant)s passed in by the host
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{EditSession, ExportMode, SyncTiming};
//!
//! let mut session = EditSession::from_markup("<p>Hello</p>", SyncTiming::default())?;
//! session.insert_component("calloutInfo", 0)?;
//! session.apply_props([("title".to_string(), "Note".to_string())].into())?;
//! let html = session.export_inlined(ExportMode::Inline)?;
//! ```

mod errors;
mod export;
mod format;
mod markdown;
mod session;
mod smart;

pub use errors::{EditorError, EditorResult};
pub use export::{article_body, clipboard_html, computed_html, export_css, inlined_html, ExportMode};
pub use format::{
    Format, FormatState, SyncTiming, DEFAULT_DEBOUNCE_MS, DEFAULT_TYPING_RELEASE_MS,
};
pub use markdown::{is_component_block, markdown_to_html, markdown_to_tree, tree_to_markdown};
pub use session::{EditSession, SelectedSchema};
pub use smart::{smart_format, SmartFormatReport};

// Re-export common types for convenience
pub use folio_components::PropertyBag;
pub use folio_locator::{ComponentInstance, InstanceLocation};
pub use folio_parser::Document;
