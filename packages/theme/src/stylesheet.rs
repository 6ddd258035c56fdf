use crate::builtins::builtin;
use crate::catalog::{ThemeCatalog, ThemeId};
use crate::tokens::TokenName;

/// Class of the article root in preview and export markup.
pub const ARTICLE_CLASS: &str = "folio-article";

/// CSS rule with selector and ordered declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub properties: Vec<(String, String)>,
}

impl CssRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((property.into(), value.into()));
        self
    }
}

/// Collection of CSS rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<CssRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: CssRule) {
        self.rules.push(rule);
    }

    /// Convert to CSS text
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        for rule in &self.rules {
            if rule.properties.is_empty() {
                continue;
            }
            css.push_str(&rule.selector);
            css.push_str(" {\n");

            for (key, value) in &rule.properties {
                css.push_str("  ");
                css.push_str(key);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }

            css.push_str("}\n\n");
        }

        css.trim_end().to_string()
    }
}

/// The theme layer of the article stylesheet: custom property values set by
/// the theme, followed by its extra CSS.
///
/// Only tokens the theme actually sets are written. The base stylesheet
/// carries the defaults as `var()` fallbacks.
pub fn theme_stylesheet(id: &ThemeId, catalog: &ThemeCatalog) -> String {
    let vars: Vec<(TokenName, String)> = match id {
        ThemeId::BuiltIn(name) => builtin(name)
            .map(|t| {
                t.vars
                    .iter()
                    .filter(|(_, v)| !v.trim().is_empty())
                    .map(|(k, v)| (*k, v.trim().to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        ThemeId::Custom(custom) => catalog
            .get(custom)
            .map(|t| {
                TokenName::ALL
                    .into_iter()
                    .filter_map(|token| {
                        t.var(token)
                            .map(str::trim)
                            .filter(|v| !v.is_empty())
                            .map(|v| (token, v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default(),
    };
    let extra = catalog.extra_css(id);

    if vars.is_empty() && extra.is_none() {
        return format!("/* {} theme: base only */", id);
    }

    let mut sheet = Stylesheet::new();
    let mut root = CssRule::new(format!(".{}", ARTICLE_CLASS));
    for (token, value) in vars {
        root = root.with(token.css_var(), value);
    }
    sheet.add_rule(root);

    let mut css = sheet.to_css();
    if let Some(extra) = extra {
        if !css.is_empty() {
            css.push_str("\n\n");
        }
        css.push_str(extra);
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UserTheme;

    #[test]
    fn test_stylesheet_to_css() {
        let mut sheet = Stylesheet::new();
        sheet.add_rule(CssRule::new(".a").with("color", "red").with("margin", "0"));
        sheet.add_rule(CssRule::new(".empty"));
        assert_eq!(sheet.to_css(), ".a {\n  color: red;\n  margin: 0;\n}");
    }

    #[test]
    fn test_clean_theme_is_base_only() {
        let css = theme_stylesheet(&ThemeId::clean(), &ThemeCatalog::new());
        assert_eq!(css, "/* clean theme: base only */");
    }

    #[test]
    fn test_builtin_theme_vars_block() {
        let css = theme_stylesheet(&ThemeId::parse("warm"), &ThemeCatalog::new());
        assert!(css.starts_with(".folio-article {\n  --folio-accent: #b42318;"));
        assert!(css.contains("--folio-quote-bg: rgba(180, 35, 24, 0.06);"));
        assert!(!css.contains("--folio-pre-bg"));
    }

    #[test]
    fn test_custom_theme_with_extra_css() {
        let mut catalog = ThemeCatalog::new();
        let theme = UserTheme::from_css(
            "Blue",
            ".folio-article { --folio-accent: #2563eb; }\n.folio-article h1 { color: navy; }",
        )
        .unwrap();
        let id = catalog.add(theme);
        let css = theme_stylesheet(&id, &catalog);
        assert!(css.contains("--folio-accent: #2563eb;"));
        assert!(css.ends_with(".folio-article h1 { color: navy; }"));
    }
}
