use crate::tokens::TokenName;
use crate::tokens::TokenName::*;

/// A theme shipped with the engine. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltInTheme {
    pub id: &'static str,
    pub label: &'static str,
    pub vars: &'static [(TokenName, &'static str)],
    pub extra_css: &'static str,
}

impl BuiltInTheme {
    pub fn var(&self, name: TokenName) -> Option<&'static str> {
        self.vars.iter().find(|(t, _)| *t == name).map(|(_, v)| *v)
    }
}

const ROYAL_EXTRA_CSS: &str = r#"/* paper-like frame */
.folio-article {
  border: 2px solid rgba(124, 58, 237, 0.55);
  border-radius: 16px;
  padding: 14px 14px 6px;
  background: linear-gradient(180deg, rgba(124, 58, 237, 0.08), rgba(255, 255, 255, 0.0) 26%),
    #fff;
}

.folio-article h1 {
  border: 1px solid rgba(124, 58, 237, 0.22);
  background: linear-gradient(90deg, rgba(124, 58, 237, 0.12), rgba(255, 255, 255, 0.0));
}

.folio-article h2.titlebar {
  border-left-color: rgba(124, 58, 237, 0.95);
}

.folio-article h3.badge {
  border-color: rgba(124, 58, 237, 0.20);
}

.folio-article blockquote.card,
.folio-article blockquote.guide {
  border-color: rgba(124, 58, 237, 0.22);
}

.folio-article p.divider {
  color: rgba(124, 58, 237, 0.55);
}"#;

pub const BUILT_IN_THEMES: &[BuiltInTheme] = &[
    BuiltInTheme {
        id: "clean",
        label: "Clean",
        vars: &[],
        extra_css: "",
    },
    BuiltInTheme {
        id: "warm",
        label: "Warm",
        vars: &[
            (Accent, "#b42318"),
            (AccentSoft, "rgba(180, 35, 24, 0.10)"),
            (AccentSofter, "rgba(180, 35, 24, 0.06)"),
            (Heading, "#7a271a"),
            (QuoteBorder, "rgba(180, 35, 24, 0.35)"),
            (QuoteBg, "rgba(180, 35, 24, 0.06)"),
        ],
        extra_css: "",
    },
    BuiltInTheme {
        id: "tech",
        label: "Tech",
        vars: &[
            (Accent, "#0f766e"),
            (AccentSoft, "rgba(15, 118, 110, 0.10)"),
            (AccentSofter, "rgba(15, 118, 110, 0.06)"),
            (Heading, "#0f172a"),
            (PreBg, "rgba(2, 6, 23, 0.06)"),
        ],
        extra_css: "",
    },
    BuiltInTheme {
        id: "mint",
        label: "Mint",
        vars: &[
            (Accent, "#16a34a"),
            (AccentSoft, "rgba(22, 163, 74, 0.10)"),
            (AccentSofter, "rgba(22, 163, 74, 0.06)"),
            (Heading, "#0f172a"),
            (QuoteBorder, "rgba(22, 163, 74, 0.28)"),
            (QuoteBg, "rgba(22, 163, 74, 0.06)"),
        ],
        extra_css: "",
    },
    BuiltInTheme {
        id: "sunset",
        label: "Sunset",
        vars: &[
            (Accent, "#ea580c"),
            (AccentSoft, "rgba(234, 88, 12, 0.10)"),
            (AccentSofter, "rgba(234, 88, 12, 0.06)"),
            (Heading, "#7c2d12"),
            (QuoteBorder, "rgba(234, 88, 12, 0.32)"),
            (QuoteBg, "rgba(234, 88, 12, 0.06)"),
        ],
        extra_css: "",
    },
    BuiltInTheme {
        id: "grape",
        label: "Grape",
        vars: &[
            (Accent, "#7c3aed"),
            (AccentSoft, "rgba(124, 58, 237, 0.10)"),
            (AccentSofter, "rgba(124, 58, 237, 0.06)"),
            (Heading, "#2e1065"),
            (QuoteBorder, "rgba(124, 58, 237, 0.30)"),
            (QuoteBg, "rgba(124, 58, 237, 0.06)"),
        ],
        extra_css: "",
    },
    BuiltInTheme {
        id: "ink",
        label: "Ink",
        vars: &[
            (Accent, "#111827"),
            (AccentSoft, "rgba(17, 24, 39, 0.08)"),
            (AccentSofter, "rgba(17, 24, 39, 0.05)"),
            (Heading, "#111827"),
            (QuoteBorder, "rgba(17, 24, 39, 0.24)"),
            (QuoteBg, "rgba(17, 24, 39, 0.04)"),
            (PreBg, "rgba(17, 24, 39, 0.06)"),
        ],
        extra_css: "",
    },
    BuiltInTheme {
        id: "royal",
        label: "Royal Frame",
        vars: &[
            (Accent, "#7c3aed"),
            (AccentSoft, "rgba(124, 58, 237, 0.12)"),
            (AccentSofter, "rgba(124, 58, 237, 0.07)"),
            (Heading, "#3b1a6f"),
            (QuoteBorder, "rgba(124, 58, 237, 0.30)"),
            (QuoteBg, "rgba(124, 58, 237, 0.06)"),
            (PreBg, "rgba(124, 58, 237, 0.06)"),
        ],
        extra_css: ROYAL_EXTRA_CSS,
    },
];

pub fn builtin(id: &str) -> Option<&'static BuiltInTheme> {
    BUILT_IN_THEMES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<&str> = BUILT_IN_THEMES.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), BUILT_IN_THEMES.len());
    }

    #[test]
    fn test_clean_has_no_vars() {
        let clean = builtin("clean").unwrap();
        assert!(clean.vars.is_empty());
        assert!(clean.extra_css.is_empty());
    }

    #[test]
    fn test_royal_carries_extra_css() {
        let royal = builtin("royal").unwrap();
        assert_eq!(royal.var(TokenName::Accent), Some("#7c3aed"));
        assert!(royal.extra_css.contains(".folio-article h2.titlebar"));
    }
}
