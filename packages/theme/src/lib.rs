//! # Folio Theme
//!
//! Maps a theme identifier to a complete set of style tokens.
//!
//! Themes are either built in (a static catalog) or imported by the user from
//! JSON or CSS text and kept in a [`ThemeCatalog`] for the session. Resolution
//! never fails: any token a theme leaves unset, blank, or unknown falls back
//! to the engine default for that token.

pub mod builtins;
pub mod catalog;
pub mod error;
pub mod stylesheet;
pub mod tokens;

pub use builtins::{builtin, BuiltInTheme, BUILT_IN_THEMES};
pub use catalog::{resolve, ThemeCatalog, ThemeId, UserTheme};
pub use error::{ThemeImportError, ThemeResult};
pub use stylesheet::{theme_stylesheet, CssRule, Stylesheet, ARTICLE_CLASS};
pub use tokens::{ResolvedTokens, TokenName, CSS_VAR_PREFIX};
