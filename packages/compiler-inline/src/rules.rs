//! The style rule table.
//!
//! Every visual variant an article can carry is listed here once. The
//! rule-based compiler applies matching rules in table order, and the preview
//! stylesheet is generated from the same table, so the two stay in step.
//! Values may reference theme tokens as `{accent}`, `{heading}` and so on.

/// Extra condition on where an element sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Anywhere,
    /// Some ancestor carries this class.
    InsideClass(&'static str),
    /// Some ancestor has this tag.
    InsideTag(&'static str),
    /// No ancestor has this tag.
    OutsideTag(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRule {
    /// `None` matches any tag.
    pub tag: Option<&'static str>,
    /// Class token the element must carry.
    pub class: Option<&'static str>,
    pub scope: Scope,
    pub declarations: &'static [(&'static str, &'static str)],
}

const fn rule(
    tag: Option<&'static str>,
    class: Option<&'static str>,
    declarations: &'static [(&'static str, &'static str)],
) -> StyleRule {
    StyleRule {
        tag,
        class,
        scope: Scope::Anywhere,
        declarations,
    }
}

const fn scoped(
    tag: Option<&'static str>,
    class: Option<&'static str>,
    scope: Scope,
    declarations: &'static [(&'static str, &'static str)],
) -> StyleRule {
    StyleRule {
        tag,
        class,
        scope,
        declarations,
    }
}

/// Declarations for the article root.
pub const ROOT_DECLARATIONS: &[(&str, &str)] = &[
    ("color", "#111"),
    ("background-color", "#fff"),
    ("font-size", "15px"),
    ("line-height", "1.8"),
    ("word-break", "break-word"),
];

const LANTERN_BASE: &[(&str, &str)] = &[
    ("letter-spacing", "8px"),
    ("font-size", "18px"),
    ("padding", "4px 0"),
    ("border-radius", "10px"),
];

pub const RULES: &[StyleRule] = &[
    rule(
        None,
        Some("frame__scroll"),
        &[
            ("max-height", "360px"),
            ("overflow", "auto"),
            ("-webkit-overflow-scrolling", "touch"),
            ("padding", "10px 10px"),
            ("border-radius", "12px"),
            ("border", "1px solid rgba(0, 0, 0, 0.10)"),
            ("background-color", "rgba(255, 255, 255, 0.85)"),
        ],
    ),
    scoped(
        None,
        Some("frame__scroll"),
        Scope::InsideClass("frame--royal"),
        &[
            ("border-color", "rgba(124, 58, 237, 0.22)"),
            ("background-color", "rgba(124, 58, 237, 0.04)"),
        ],
    ),
    rule(Some("p"), None, &[("margin", "12px 0")]),
    rule(
        Some("p"),
        Some("lead"),
        &[
            ("font-size", "16px"),
            ("color", "rgba(0,0,0,0.62)"),
            ("margin", "10px 0 14px"),
        ],
    ),
    rule(
        Some("p"),
        Some("caption"),
        &[
            ("margin", "6px 0 14px"),
            ("color", "rgba(0,0,0,0.55)"),
            ("font-size", "13px"),
            ("text-align", "center"),
        ],
    ),
    rule(
        Some("p"),
        Some("divider"),
        &[
            ("margin", "16px 0"),
            ("color", "rgba(0,0,0,0.38)"),
            ("text-align", "center"),
            ("letter-spacing", "3px"),
            ("font-size", "14px"),
        ],
    ),
    rule(
        Some("p"),
        Some("divider--flower"),
        &[("letter-spacing", "6px"), ("color", "rgba(0,0,0,0.42)")],
    ),
    rule(
        Some("p"),
        Some("divider--wave"),
        &[
            ("letter-spacing", "2px"),
            ("font-size", "15px"),
            ("color", "rgba(0,0,0,0.40)"),
        ],
    ),
    rule(Some("p"), Some("divider--lantern"), LANTERN_BASE),
    rule(
        Some("p"),
        Some("divider--c-red"),
        &[("background-color", "rgba(220, 38, 38, 0.08)"), ("color", "#b91c1c")],
    ),
    rule(
        Some("p"),
        Some("divider--c-gold"),
        &[("background-color", "rgba(202, 138, 4, 0.10)"), ("color", "#a16207")],
    ),
    rule(
        Some("p"),
        Some("divider--c-purple"),
        &[("background-color", "rgba(124, 58, 237, 0.08)"), ("color", "#6d28d9")],
    ),
    rule(
        Some("p"),
        Some("divider--c-green"),
        &[("background-color", "rgba(22, 163, 74, 0.08)"), ("color", "#15803d")],
    ),
    rule(
        Some("p"),
        Some("divider--c-blue"),
        &[("background-color", "rgba(30, 64, 175, 0.08)"), ("color", "#1e40af")],
    ),
    rule(
        Some("p"),
        Some("divider--c-gray"),
        &[("background-color", "rgba(0, 0, 0, 0.05)"), ("color", "rgba(0,0,0,0.55)")],
    ),
    rule(
        Some("p"),
        Some("card__title"),
        &[("margin", "0 0 6px"), ("color", "{heading}")],
    ),
    rule(
        Some("p"),
        Some("guide__kicker"),
        &[("margin", "0 0 6px"), ("color", "{heading}")],
    ),
    rule(
        Some("p"),
        Some("frame__kicker"),
        &[
            ("margin", "0 0 10px"),
            ("color", "{heading}"),
            ("font-size", "14px"),
        ],
    ),
    rule(
        Some("h1"),
        None,
        &[
            ("margin", "18px 0 10px"),
            ("line-height", "1.35"),
            ("font-weight", "700"),
            ("font-size", "22px"),
            ("color", "{heading}"),
            ("text-align", "center"),
            ("letter-spacing", "0.5px"),
            ("padding", "10px 10px 12px"),
            ("border-radius", "14px"),
            ("border", "1px solid rgba(0, 0, 0, 0.08)"),
            ("background-color", "{accentSofter}"),
        ],
    ),
    rule(
        Some("h2"),
        None,
        &[
            ("margin", "18px 0 10px"),
            ("line-height", "1.35"),
            ("font-weight", "700"),
            ("font-size", "18px"),
            ("color", "{heading}"),
        ],
    ),
    rule(
        Some("h2"),
        Some("section"),
        &[
            ("padding", "10px 12px"),
            ("border-radius", "14px"),
            ("background-color", "{accentSoft}"),
            ("border", "1px solid rgba(0, 0, 0, 0.08)"),
            ("border-left", "4px solid {accent}"),
        ],
    ),
    rule(
        Some("h2"),
        Some("titlebar"),
        &[
            ("padding", "10px 12px"),
            ("border-radius", "14px"),
            ("background-color", "{accentSoft}"),
            ("border", "1px solid rgba(0, 0, 0, 0.08)"),
            ("border-left", "4px solid {accent}"),
        ],
    ),
    rule(
        Some("h3"),
        None,
        &[
            ("margin", "18px 0 10px"),
            ("line-height", "1.35"),
            ("font-weight", "700"),
            ("font-size", "16px"),
            ("color", "{heading}"),
            ("padding-left", "10px"),
            ("border-left", "3px solid {accent}"),
        ],
    ),
    rule(
        Some("h3"),
        Some("badge"),
        &[
            ("display", "inline-block"),
            ("padding", "6px 10px"),
            ("border-radius", "999px"),
            ("background-color", "{accentSofter}"),
            ("border", "1px solid {accentSoft}"),
            ("padding-left", "10px"),
            ("border-left", "none"),
        ],
    ),
    rule(
        Some("a"),
        None,
        &[("color", "{accent}"), ("text-decoration", "none")],
    ),
    rule(
        Some("blockquote"),
        None,
        &[
            ("margin", "14px 0"),
            ("padding", "10px 12px"),
            ("border-left", "4px solid {quoteBorder}"),
            ("background-color", "{quoteBg}"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("quote"),
        &[
            ("border-left", "4px solid {accent}"),
            ("background-color", "rgba(0,0,0,0.02)"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("card"),
        &[
            ("padding", "12px"),
            ("border-radius", "14px"),
            ("border", "1px solid rgba(0, 0, 0, 0.12)"),
            ("background-color", "{accentSofter}"),
            ("border-left", "none"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("guide"),
        &[
            ("padding", "12px"),
            ("border-radius", "14px"),
            ("border", "1px solid rgba(0, 0, 0, 0.12)"),
            ("background-color", "{accentSoft}"),
            ("border-left", "4px solid {accent}"),
        ],
    ),
    rule(Some("ul"), None, &[("margin", "12px 0 12px 24px"), ("padding", "0")]),
    rule(Some("ol"), None, &[("margin", "12px 0 12px 24px"), ("padding", "0")]),
    rule(Some("li"), None, &[("margin", "6px 0")]),
    rule(
        Some("hr"),
        None,
        &[
            ("border", "none"),
            ("height", "0"),
            ("border-top", "1px dashed rgba(0, 0, 0, 0.22)"),
            ("margin", "16px 0"),
        ],
    ),
    rule(
        Some("img"),
        None,
        &[
            ("max-width", "100%"),
            ("height", "auto"),
            ("display", "block"),
            ("margin", "10px auto"),
            ("border-radius", "8px"),
        ],
    ),
    rule(Some("img"), Some("img--rounded"), &[("border-radius", "14px")]),
    rule(
        Some("img"),
        Some("img--shadow"),
        &[
            ("border-radius", "12px"),
            ("box-shadow", "0 14px 34px rgba(0,0,0,0.16)"),
        ],
    ),
    rule(
        Some("img"),
        Some("img--border"),
        &[
            ("border-radius", "12px"),
            ("border", "1px solid rgba(0,0,0,0.14)"),
            ("box-shadow", "0 10px 22px rgba(0,0,0,0.10)"),
        ],
    ),
    rule(Some("img"), Some("img--circle"), &[("border-radius", "999px")]),
    scoped(
        Some("code"),
        None,
        Scope::OutsideTag("pre"),
        &[
            (
                "font-family",
                "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace",
            ),
            ("font-size", "0.92em"),
            ("background-color", "rgba(0,0,0,0.06)"),
            ("padding", "0.1em 0.35em"),
            ("border-radius", "6px"),
        ],
    ),
    rule(
        Some("pre"),
        None,
        &[
            ("overflow", "auto"),
            ("background-color", "{preBg}"),
            ("padding", "12px"),
            ("border-radius", "10px"),
        ],
    ),
    scoped(
        Some("code"),
        None,
        Scope::InsideTag("pre"),
        &[("background-color", "transparent"), ("padding", "0")],
    ),
    rule(
        Some("blockquote"),
        Some("callout"),
        &[
            ("margin", "14px 0"),
            ("padding", "12px"),
            ("border-radius", "12px"),
            ("border", "1px solid rgba(0, 0, 0, 0.12)"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("callout--info"),
        &[
            ("background-color", "rgba(11, 87, 208, 0.06)"),
            ("border-color", "rgba(11, 87, 208, 0.22)"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("callout--warn"),
        &[
            ("background-color", "rgba(245, 158, 11, 0.10)"),
            ("border-color", "rgba(245, 158, 11, 0.28)"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("callout--ok"),
        &[
            ("background-color", "rgba(34, 197, 94, 0.10)"),
            ("border-color", "rgba(34, 197, 94, 0.28)"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("frame"),
        &[
            ("margin", "14px 0"),
            ("padding", "14px 12px"),
            ("border-radius", "16px"),
            ("border", "2px solid rgba(0, 0, 0, 0.10)"),
            ("background-color", "#fff"),
            ("border-left", "none"),
        ],
    ),
    rule(
        Some("blockquote"),
        Some("frame--royal"),
        &[
            ("border-color", "rgba(124, 58, 237, 0.55)"),
            ("box-shadow", "0 10px 26px rgba(124, 58, 237, 0.12)"),
            ("background-color", "{accentSofter}"),
        ],
    ),
];

/// Ancestor of the element being matched, outermost first.
#[derive(Debug, Clone, Copy)]
pub struct Ancestor<'a> {
    pub tag: &'a str,
    pub class: &'a str,
}

fn has_token(class: &str, token: &str) -> bool {
    class.split_whitespace().any(|c| c == token)
}

impl StyleRule {
    /// Tag and class match; class is a whitespace-separated token test.
    pub fn matches(&self, tag: &str, class: &str, ancestors: &[Ancestor]) -> bool {
        if self.tag.is_some_and(|t| !t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        if self.class.is_some_and(|c| !has_token(class, c)) {
            return false;
        }
        match self.scope {
            Scope::Anywhere => true,
            Scope::InsideClass(c) => ancestors.iter().any(|a| has_token(a.class, c)),
            Scope::InsideTag(t) => ancestors.iter().any(|a| a.tag.eq_ignore_ascii_case(t)),
            Scope::OutsideTag(t) => !ancestors.iter().any(|a| a.tag.eq_ignore_ascii_case(t)),
        }
    }
}

/// Rules applying to an element, in table order.
pub fn matching_rules(tag: &str, class: &str, ancestors: &[Ancestor]) -> Vec<&'static StyleRule> {
    RULES
        .iter()
        .filter(|rule| rule.matches(tag, class, ancestors))
        .collect()
}
