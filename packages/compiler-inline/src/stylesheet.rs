//! Preview stylesheet generated from the rule table.

use crate::rules::{Scope, StyleRule, ROOT_DECLARATIONS, RULES};
use folio_theme::{
    theme_stylesheet, CssRule, Stylesheet, ThemeCatalog, ThemeId, TokenName, ARTICLE_CLASS,
};

/// Selector whose accent bar only exists as generated content in the
/// stylesheet. Computed-snapshot mode turns it back into a border.
pub const ACCENT_BAR_SELECTOR: &str = "h2.section";

/// `{token}` placeholders become `var(--folio-token, default)`.
fn to_css_value(template: &str) -> String {
    let mut out = template.to_string();
    for token in TokenName::ALL {
        let placeholder = format!("{{{}}}", token.key());
        if out.contains(&placeholder) {
            out = out.replace(
                &placeholder,
                &format!("var({}, {})", token.css_var(), token.default_value()),
            );
        }
    }
    out
}

fn selector_for(rule: &StyleRule) -> String {
    let root = format!(".{}", ARTICLE_CLASS);
    let mut target = rule.tag.unwrap_or("").to_string();
    if let Some(class) = rule.class {
        target.push('.');
        target.push_str(class);
    }
    match rule.scope {
        Scope::Anywhere => format!("{} {}", root, target),
        Scope::InsideClass(class) => format!("{} .{} {}", root, class, target),
        Scope::InsideTag(tag) => format!("{} {} {}", root, tag, target),
        // Nearest approximation without :has(); the inside-tag rule that
        // follows it in the table overrides it.
        Scope::OutsideTag(_) => format!("{} {}", root, target),
    }
}

fn is_accent_bar_rule(rule: &StyleRule) -> bool {
    rule.tag == Some("h2") && rule.class == Some("section")
}

/// The article stylesheet shared by preview and computed-snapshot export.
///
/// The section heading's left accent is drawn with a `::before` bar instead
/// of a border here, matching the preview the user sees.
pub fn base_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new();

    let mut root = CssRule::new(format!(".{}", ARTICLE_CLASS));
    for (prop, value) in ROOT_DECLARATIONS {
        root = root.with(*prop, *value);
    }
    sheet.add_rule(root);

    for rule in RULES {
        let accent_bar = is_accent_bar_rule(rule);
        let mut css = CssRule::new(selector_for(rule));
        for (prop, value) in rule.declarations {
            if accent_bar && *prop == "border-left" {
                continue;
            }
            css = css.with(*prop, to_css_value(value));
        }
        if accent_bar {
            css = css.with("position", "relative").with("padding-left", "18px");
        }
        sheet.add_rule(css);

        if accent_bar {
            sheet.add_rule(
                CssRule::new(format!(".{} {}::before", ARTICLE_CLASS, ACCENT_BAR_SELECTOR))
                    .with("content", "\"\"")
                    .with("position", "absolute")
                    .with("left", "0")
                    .with("top", "8px")
                    .with("bottom", "8px")
                    .with("width", "4px")
                    .with("border-radius", "4px")
                    .with("background-color", to_css_value("{accent}")),
            );
        }
    }

    sheet
}

/// Base stylesheet followed by the theme layer.
pub fn article_stylesheet(theme: &ThemeId, catalog: &ThemeCatalog) -> String {
    format!(
        "{}\n\n{}",
        base_stylesheet().to_css(),
        theme_stylesheet(theme, catalog)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_become_vars_with_fallbacks() {
        assert_eq!(
            to_css_value("4px solid {accent}"),
            "4px solid var(--folio-accent, #0b57d0)"
        );
        assert_eq!(to_css_value("#fff"), "#fff");
    }

    #[test]
    fn test_generated_selectors() {
        let css = base_stylesheet().to_css();
        assert!(css.starts_with(".folio-article {\n  color: #111;"));
        assert!(css.contains(".folio-article blockquote.callout--warn {"));
        assert!(css.contains(".folio-article .frame--royal .frame__scroll {"));
        assert!(css.contains(".folio-article pre code {"));
        assert!(css.contains(".folio-article p.divider--c-gold {"));
        assert!(css.contains(".folio-article h2.section::before {"));
        for token in TokenName::ALL {
            assert!(!css.contains(&format!("{{{}}}", token.key())));
        }
    }

    #[test]
    fn test_section_heading_uses_accent_bar() {
        let css = base_stylesheet().to_css();
        let start = css.find(".folio-article h2.section {").unwrap();
        let block = &css[start..start + css[start..].find('}').unwrap()];
        assert!(!block.contains("border-left"));
        assert!(block.contains("position: relative;"));
    }

    #[test]
    fn test_article_stylesheet_appends_theme() {
        let css = article_stylesheet(&ThemeId::parse("royal"), &ThemeCatalog::new());
        assert!(css.contains("/* paper-like frame */"));
        assert!(css.find(".folio-article h1 {").unwrap() < css.find("/* paper-like frame */").unwrap());
    }
}
