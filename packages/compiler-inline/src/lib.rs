//! # Folio Inline Compiler
//!
//! Turns a themed article into markup that keeps its look without any
//! stylesheet: every element carries literal `style` declarations and only
//! a short allow-list of attributes survives.
//!
//! Three modes:
//!
//! - [`inline_rules`]: applies the [`rules`] table with theme tokens expanded
//! - [`inline_ultra`]: rule-based, then headings demoted to paragraphs and
//!   attributes stripped, for paste targets that sanitize aggressively
//! - [`inline_computed`]: reads resolved styles back from a real render
//!   context (see [`SnapshotBackend`])

pub mod computed;
pub mod error;
pub mod inline;
pub mod rules;
pub mod style;
pub mod stylesheet;

pub use computed::{
    inline_computed, AccentBar, ContextGuard, RenderContext, Snapshot, SnapshotBackend,
    SnapshotRequest, CAPTURED_PROPERTIES, SNAPSHOT_WIDTH_PX,
};
pub use error::{CompileError, CompileResult};
pub use inline::{apply_rules, article_root, inline_rules, inline_ultra, strip_attributes, ALLOWED_ATTRIBUTES};
pub use rules::{matching_rules, Ancestor, Scope, StyleRule, ROOT_DECLARATIONS, RULES};
pub use style::StyleDecls;
pub use stylesheet::{article_stylesheet, base_stylesheet, ACCENT_BAR_SELECTOR};
