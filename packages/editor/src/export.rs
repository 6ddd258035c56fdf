//! Export surfaces of a document body.

use crate::errors::{EditorError, EditorResult};
use folio_compiler_inline::{article_stylesheet, inline_computed, inline_rules, inline_ultra, CompileError, SnapshotBackend};
use folio_parser::escape_attr;
use folio_theme::{resolve, ThemeCatalog, ThemeId, ARTICLE_CLASS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an article is inlined for pasting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Rule-based inline styles.
    #[default]
    Inline,
    /// Rule-based, headings demoted, attributes stripped.
    Ultra,
    /// Styles read back from a real render.
    Computed,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportMode::Inline => "inline",
            ExportMode::Ultra => "ultra",
            ExportMode::Computed => "computed",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(ExportMode::Inline),
            "ultra" => Ok(ExportMode::Ultra),
            "computed" => Ok(ExportMode::Computed),
            other => Err(format!("unknown export mode '{}' (expected inline, ultra or computed)", other)),
        }
    }
}

/// Body wrapped in the themed article root.
pub fn article_body(body_markup: &str, theme: &ThemeId) -> String {
    format!(
        "<section class=\"{}\" data-theme=\"{}\">{}</section>",
        ARTICLE_CLASS,
        escape_attr(&theme.to_string()),
        body_markup
    )
}

/// Base stylesheet followed by the theme layer.
pub fn export_css(theme: &ThemeId, catalog: &ThemeCatalog) -> String {
    article_stylesheet(theme, catalog)
}

/// Rich-text clipboard payload: the stylesheet travels with the body.
pub fn clipboard_html(body_markup: &str, theme: &ThemeId, catalog: &ThemeCatalog) -> String {
    format!(
        "<style>{}</style>\n{}",
        export_css(theme, catalog),
        article_body(body_markup, theme)
    )
}

/// Rule-based or ultra inlining. Computed mode needs a render backend, see
/// [`computed_html`].
pub fn inlined_html(
    mode: ExportMode,
    body_markup: &str,
    theme: &ThemeId,
    catalog: &ThemeCatalog,
) -> EditorResult<String> {
    let tokens = resolve(theme, catalog);
    let html = match mode {
        ExportMode::Inline => inline_rules(body_markup, theme, &tokens)?,
        ExportMode::Ultra => inline_ultra(body_markup, theme, &tokens)?,
        ExportMode::Computed => {
            return Err(EditorError::Compile(CompileError::ContextUnavailable(
                "computed export needs a render backend".to_string(),
            )))
        }
    };
    Ok(html)
}

/// Computed-snapshot inlining through `backend`.
pub fn computed_html<B: SnapshotBackend>(
    backend: &mut B,
    body_markup: &str,
    theme: &ThemeId,
    catalog: &ThemeCatalog,
) -> EditorResult<String> {
    let css = export_css(theme, catalog);
    Ok(inline_computed(backend, body_markup, &css, theme)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        assert_eq!("Ultra".parse::<ExportMode>(), Ok(ExportMode::Ultra));
        assert!("pdf".parse::<ExportMode>().is_err());
        assert_eq!(ExportMode::Computed.to_string(), "computed");
        assert_eq!(serde_json::to_string(&ExportMode::Inline).unwrap(), "\"inline\"");
    }

    #[test]
    fn test_clipboard_carries_stylesheet() {
        let theme = ThemeId::parse("warm");
        let html = clipboard_html("<p>x</p>", &theme, &ThemeCatalog::new());
        assert!(html.starts_with("<style>.folio-article {"));
        assert!(html.ends_with("</style>\n<section class=\"folio-article\" data-theme=\"warm\"><p>x</p></section>"));
    }

    #[test]
    fn test_computed_needs_backend() {
        let err = inlined_html(ExportMode::Computed, "<p>x</p>", &ThemeId::clean(), &ThemeCatalog::new()).unwrap_err();
        assert!(matches!(err, EditorError::Compile(CompileError::ContextUnavailable(_))));
    }
}
