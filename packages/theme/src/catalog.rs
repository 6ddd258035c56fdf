use crate::builtins::{builtin, BUILT_IN_THEMES};
use crate::error::{ThemeImportError, ThemeResult};
use crate::tokens::{ResolvedTokens, TokenName, CSS_VAR_PREFIX};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info, instrument};

const CUSTOM_PREFIX: &str = "custom:";

/// Identifier of the active theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThemeId {
    BuiltIn(&'static str),
    /// A user theme, by its catalog id.
    Custom(String),
}

impl ThemeId {
    pub fn clean() -> Self {
        ThemeId::BuiltIn("clean")
    }

    /// Parse `"warm"` or `"custom:1712345678901"`. Unknown names fall back
    /// to the clean theme.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(id) = raw.strip_prefix(CUSTOM_PREFIX) {
            return ThemeId::Custom(id.to_string());
        }
        match builtin(raw) {
            Some(theme) => ThemeId::BuiltIn(theme.id),
            None => {
                debug!(theme = raw, "unknown theme id, using clean");
                ThemeId::clean()
            }
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ThemeId::Custom(_))
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        ThemeId::clean()
    }
}

impl FromStr for ThemeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ThemeId::parse(s))
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThemeId::BuiltIn(id) => write!(f, "{}", id),
            ThemeId::Custom(id) => write!(f, "{}{}", CUSTOM_PREFIX, id),
        }
    }
}

/// A theme imported by the user and kept for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTheme {
    pub id: String,
    pub name: String,
    /// Raw custom property map as imported, e.g. `--folio-accent -> #f00`.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_css: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeJson {
    name: Option<serde_json::Value>,
    #[serde(default)]
    vars: BTreeMap<String, serde_json::Value>,
    extra_css: Option<serde_json::Value>,
}

fn css_var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(--folio-[a-zA-Z0-9-]+)\s*:\s*([^;]+);").unwrap())
}

fn new_theme_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

impl UserTheme {
    /// Import `{ "name": ..., "vars": {...}, "extraCss": ... }`.
    ///
    /// Non-string var values are kept in their JSON spelling.
    pub fn from_json(text: &str) -> ThemeResult<Self> {
        let parsed: ThemeJson = serde_json::from_str(text.trim())?;
        let name = parsed
            .name
            .as_ref()
            .and_then(|n| n.as_str())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if name.is_empty() {
            return Err(ThemeImportError::EmptyName);
        }

        let vars = parsed
            .vars
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect();
        let extra_css = parsed
            .extra_css
            .and_then(|v| v.as_str().map(str::to_string));

        Ok(Self {
            id: new_theme_id(),
            name,
            vars,
            extra_css,
        })
    }

    /// Import freeform CSS. `--folio-*` declarations become theme variables,
    /// everything else is kept verbatim as extra CSS.
    pub fn from_css(name: &str, css: &str) -> ThemeResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ThemeImportError::EmptyName);
        }
        let css = css.trim();
        if css.is_empty() {
            return Err(ThemeImportError::NoContent);
        }

        let re = css_var_regex();
        let vars: BTreeMap<String, String> = re
            .captures_iter(css)
            .filter_map(|caps| {
                let key = caps[1].trim().to_string();
                let value = caps[2].trim().to_string();
                (!key.is_empty() && !value.is_empty()).then_some((key, value))
            })
            .collect();
        let extra = re.replace_all(css, "").trim().to_string();

        if vars.is_empty() && extra.is_empty() {
            return Err(ThemeImportError::NoContent);
        }

        Ok(Self {
            id: new_theme_id(),
            name: name.to_string(),
            vars,
            extra_css: (!extra.is_empty()).then_some(extra),
        })
    }

    /// Look a token up under any accepted spelling: `--folio-accent`,
    /// `folio-accent` or `accent`.
    pub fn var(&self, token: TokenName) -> Option<&str> {
        let full = token.css_var();
        let spellings = [full, &full[2..], &full[CSS_VAR_PREFIX.len()..]];
        spellings
            .iter()
            .find_map(|key| self.vars.get(*key))
            .map(String::as_str)
    }

    pub fn tokens(&self) -> ResolvedTokens {
        ResolvedTokens::from_lookup(|t| self.var(t))
    }

    pub fn theme_id(&self) -> ThemeId {
        ThemeId::Custom(self.id.clone())
    }
}

/// Session catalog of user themes, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    themes: Vec<UserTheme>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a theme and return the id to select it by. Colliding ids are
    /// made unique with a numeric suffix.
    #[instrument(skip(self, theme), fields(name = %theme.name))]
    pub fn add(&mut self, mut theme: UserTheme) -> ThemeId {
        if self.get(&theme.id).is_some() {
            let base = theme.id.clone();
            let mut n = 1;
            while self.get(&format!("{}-{}", base, n)).is_some() {
                n += 1;
            }
            theme.id = format!("{}-{}", base, n);
        }
        info!(id = %theme.id, "imported user theme");
        let id = theme.theme_id();
        self.themes.insert(0, theme);
        id
    }

    pub fn remove(&mut self, id: &str) -> Option<UserTheme> {
        let index = self.themes.iter().position(|t| t.id == id)?;
        info!(id, "removed user theme");
        Some(self.themes.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&UserTheme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn list(&self) -> &[UserTheme] {
        &self.themes
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// All selectable theme ids with display labels, built-ins first.
    pub fn choices(&self) -> Vec<(ThemeId, String)> {
        BUILT_IN_THEMES
            .iter()
            .map(|t| (ThemeId::BuiltIn(t.id), t.label.to_string()))
            .chain(self.themes.iter().map(|t| (t.theme_id(), t.name.clone())))
            .collect()
    }

    /// Extra CSS of a theme, if it has any.
    pub fn extra_css(&self, id: &ThemeId) -> Option<&str> {
        let css = match id {
            ThemeId::BuiltIn(name) => builtin(name).map(|t| t.extra_css),
            ThemeId::Custom(custom) => self.get(custom).and_then(|t| t.extra_css.as_deref()),
        }?;
        let css = css.trim();
        (!css.is_empty()).then_some(css)
    }
}

/// Resolve a theme id to a complete token set. Never fails.
pub fn resolve(id: &ThemeId, catalog: &ThemeCatalog) -> ResolvedTokens {
    match id {
        ThemeId::BuiltIn(name) => match builtin(name) {
            Some(theme) => ResolvedTokens::from_lookup(|t| theme.var(t)),
            None => ResolvedTokens::default(),
        },
        ThemeId::Custom(custom) => match catalog.get(custom) {
            Some(theme) => theme.tokens(),
            None => {
                debug!(id = %custom, "user theme not found, using defaults");
                ResolvedTokens::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme_ids() {
        assert_eq!(ThemeId::parse("warm"), ThemeId::BuiltIn("warm"));
        assert_eq!(ThemeId::parse("custom:42"), ThemeId::Custom("42".to_string()));
        assert_eq!(ThemeId::parse("guofeng"), ThemeId::clean());
        assert_eq!(ThemeId::parse("custom:42").to_string(), "custom:42");
    }

    #[test]
    fn test_builtin_resolution_with_fallback() {
        let catalog = ThemeCatalog::new();
        let tech = resolve(&ThemeId::parse("tech"), &catalog);
        assert_eq!(tech.get(TokenName::Accent), "#0f766e");
        assert_eq!(tech.get(TokenName::PreBg), "rgba(2, 6, 23, 0.06)");
        // tech leaves the quote tokens unset
        assert_eq!(tech.get(TokenName::QuoteBorder), "rgba(0, 0, 0, 0.18)");
    }

    #[test]
    fn test_unknown_custom_theme_resolves_to_defaults() {
        let tokens = resolve(&ThemeId::Custom("missing".into()), &ThemeCatalog::new());
        assert_eq!(tokens, ResolvedTokens::default());
    }

    #[test]
    fn test_user_theme_spellings() {
        let mut vars = BTreeMap::new();
        vars.insert("--folio-accent".to_string(), "#f00".to_string());
        vars.insert("folio-heading".to_string(), "#222".to_string());
        vars.insert("quote-bg".to_string(), "#eee".to_string());
        vars.insert("pre-bg".to_string(), "".to_string());
        let theme = UserTheme {
            id: "1".into(),
            name: "Mine".into(),
            vars,
            extra_css: None,
        };
        let tokens = theme.tokens();
        assert_eq!(tokens.get(TokenName::Accent), "#f00");
        assert_eq!(tokens.get(TokenName::Heading), "#222");
        assert_eq!(tokens.get(TokenName::QuoteBg), "#eee");
        assert_eq!(tokens.get(TokenName::PreBg), "rgba(0,0,0,0.06)");
    }

    #[test]
    fn test_colliding_ids_are_suffixed() {
        let theme = UserTheme {
            id: "7".into(),
            name: "A".into(),
            vars: BTreeMap::new(),
            extra_css: None,
        };
        let mut catalog = ThemeCatalog::new();
        let first = catalog.add(theme.clone());
        let second = catalog.add(theme);
        assert_eq!(first.to_string(), "custom:7");
        assert_eq!(second.to_string(), "custom:7-1");
        assert_eq!(catalog.list()[0].id, "7-1");
    }
}
