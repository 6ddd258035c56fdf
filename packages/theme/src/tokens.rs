use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix shared by every theme custom property.
pub const CSS_VAR_PREFIX: &str = "--folio-";

/// The recognized style token namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenName {
    Accent,
    AccentSoft,
    AccentSofter,
    Heading,
    QuoteBorder,
    QuoteBg,
    PreBg,
}

impl TokenName {
    pub const ALL: [TokenName; 7] = [
        TokenName::Accent,
        TokenName::AccentSoft,
        TokenName::AccentSofter,
        TokenName::Heading,
        TokenName::QuoteBorder,
        TokenName::QuoteBg,
        TokenName::PreBg,
    ];

    /// Name used in `{placeholder}` templates and JSON.
    pub fn key(self) -> &'static str {
        match self {
            TokenName::Accent => "accent",
            TokenName::AccentSoft => "accentSoft",
            TokenName::AccentSofter => "accentSofter",
            TokenName::Heading => "heading",
            TokenName::QuoteBorder => "quoteBorder",
            TokenName::QuoteBg => "quoteBg",
            TokenName::PreBg => "preBg",
        }
    }

    /// Custom property spelling, e.g. `--folio-accent-soft`.
    pub fn css_var(self) -> &'static str {
        match self {
            TokenName::Accent => "--folio-accent",
            TokenName::AccentSoft => "--folio-accent-soft",
            TokenName::AccentSofter => "--folio-accent-softer",
            TokenName::Heading => "--folio-heading",
            TokenName::QuoteBorder => "--folio-quote-border",
            TokenName::QuoteBg => "--folio-quote-bg",
            TokenName::PreBg => "--folio-pre-bg",
        }
    }

    /// Engine-wide fallback used whenever a theme leaves the token unset.
    pub fn default_value(self) -> &'static str {
        match self {
            TokenName::Accent => "#0b57d0",
            TokenName::AccentSoft => "rgba(11, 87, 208, 0.10)",
            TokenName::AccentSofter => "rgba(11, 87, 208, 0.06)",
            TokenName::Heading => "#111",
            TokenName::QuoteBorder => "rgba(0, 0, 0, 0.18)",
            TokenName::QuoteBg => "rgba(0, 0, 0, 0.03)",
            TokenName::PreBg => "rgba(0,0,0,0.06)",
        }
    }

    pub fn from_key(key: &str) -> Option<TokenName> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Accept `--folio-accent-soft`, `folio-accent-soft` or `accent-soft`.
    pub fn from_css_var(name: &str) -> Option<TokenName> {
        let bare = name.trim().trim_start_matches("--");
        let suffix = bare.strip_prefix("folio-").unwrap_or(bare);
        Self::ALL
            .into_iter()
            .find(|t| &t.css_var()[CSS_VAR_PREFIX.len()..] == suffix)
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A complete token set. Every token always has a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTokens {
    values: BTreeMap<TokenName, String>,
}

impl Default for ResolvedTokens {
    fn default() -> Self {
        Self {
            values: TokenName::ALL
                .into_iter()
                .map(|t| (t, t.default_value().to_string()))
                .collect(),
        }
    }
}

impl ResolvedTokens {
    /// Build from a lookup, falling back per token on missing or blank values.
    pub fn from_lookup<'a>(mut lookup: impl FnMut(TokenName) -> Option<&'a str>) -> Self {
        let mut tokens = Self::default();
        for name in TokenName::ALL {
            if let Some(value) = lookup(name).map(str::trim).filter(|v| !v.is_empty()) {
                tokens.values.insert(name, value.to_string());
            }
        }
        tokens
    }

    pub fn get(&self, name: TokenName) -> &str {
        self.values
            .get(&name)
            .map(String::as_str)
            .unwrap_or_else(|| name.default_value())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenName, &str)> {
        TokenName::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    /// Replace `{token}` placeholders with token values.
    ///
    /// Braces that do not name a known token are kept as written.
    pub fn expand(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after
                .find('}')
                .and_then(|close| TokenName::from_key(&after[..close]).map(|t| (t, close)))
            {
                Some((token, close)) => {
                    out.push_str(self.get(token));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_var_spellings() {
        assert_eq!(TokenName::from_css_var("--folio-accent-soft"), Some(TokenName::AccentSoft));
        assert_eq!(TokenName::from_css_var("folio-quote-bg"), Some(TokenName::QuoteBg));
        assert_eq!(TokenName::from_css_var("pre-bg"), Some(TokenName::PreBg));
        assert_eq!(TokenName::from_css_var("--folio-unknown"), None);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let tokens = ResolvedTokens::from_lookup(|t| match t {
            TokenName::Accent => Some("  #123456 "),
            TokenName::Heading => Some("   "),
            _ => None,
        });
        assert_eq!(tokens.get(TokenName::Accent), "#123456");
        assert_eq!(tokens.get(TokenName::Heading), "#111");
        assert_eq!(tokens.get(TokenName::PreBg), "rgba(0,0,0,0.06)");
    }

    #[test]
    fn test_expand_placeholders() {
        let tokens = ResolvedTokens::default();
        assert_eq!(
            tokens.expand("4px solid {accent}; bg {quoteBg} {nope}"),
            "4px solid #0b57d0; bg rgba(0, 0, 0, 0.03) {nope}"
        );
    }
}
