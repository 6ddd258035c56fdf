//! Rule-based and ultra-compatible inlining.

use crate::error::CompileResult;
use crate::rules::{matching_rules, Ancestor, ROOT_DECLARATIONS};
use crate::style::StyleDecls;
use folio_common::{walk_element_mut, VisitorMut};
use folio_parser::{parse_fragment, serialize_nodes, Element, Node};
use folio_theme::{ResolvedTokens, ThemeId};
use tracing::{debug, instrument};

/// Attributes that survive export. Everything else is removed.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["style", "href", "src", "alt", "title", "target", "rel"];

const DEMOTED_HEADINGS: &[&str] = &["h1", "h2", "h3"];

/// Wrap body markup in the export root `<section data-theme="...">`.
pub fn article_root(body_html: &str, theme: &ThemeId) -> CompileResult<Element> {
    let mut root = Element::new("section").with_attr("data-theme", theme.to_string());
    root.children = parse_fragment(body_html)?;
    Ok(root)
}

pub(crate) fn append_style<'a>(el: &mut Element, decls: impl IntoIterator<Item = (&'a str, &'a str)>) {
    let mut style = StyleDecls::parse(el.attr("style").unwrap_or(""));
    style.extend(decls);
    if !style.is_empty() {
        el.set_attr("style", style.to_attr());
    }
}

struct RuleInliner<'t> {
    tokens: &'t ResolvedTokens,
    ancestors: Vec<(String, String)>,
    styled: usize,
}

impl VisitorMut for RuleInliner<'_> {
    fn visit_element_mut(&mut self, element: &mut Element) {
        let expanded: Vec<(&str, String)> = {
            let chain: Vec<Ancestor> = self
                .ancestors
                .iter()
                .map(|(tag, class)| Ancestor { tag, class })
                .collect();
            matching_rules(&element.tag, element.class(), &chain)
                .into_iter()
                .flat_map(|rule| rule.declarations.iter())
                .map(|(prop, value)| (*prop, self.tokens.expand(value)))
                .collect()
        };
        if !expanded.is_empty() {
            append_style(element, expanded.iter().map(|(p, v)| (*p, v.as_str())));
            self.styled += 1;
        }

        self.ancestors
            .push((element.tag.clone(), element.class().to_string()));
        walk_element_mut(self, element);
        self.ancestors.pop();
    }
}

/// Apply the root declarations and the rule table to `root` and everything
/// below it, in place.
pub fn apply_rules(root: &mut Element, tokens: &ResolvedTokens) -> usize {
    append_style(root, ROOT_DECLARATIONS.iter().copied());
    let mut inliner = RuleInliner {
        tokens,
        ancestors: vec![(root.tag.clone(), root.class().to_string())],
        styled: 0,
    };
    inliner.visit_nodes_mut(&mut root.children);
    inliner.styled
}

struct HeadingDemoter;

impl VisitorMut for HeadingDemoter {
    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
        if DEMOTED_HEADINGS.contains(&element.tag.as_str()) {
            element.tag = "p".to_string();
            element.retain_attrs(|name| name == "style");
        }
    }
}

struct AttributeStripper;

impl VisitorMut for AttributeStripper {
    fn visit_element_mut(&mut self, element: &mut Element) {
        element.retain_attrs(|name| ALLOWED_ATTRIBUTES.contains(&name));
        walk_element_mut(self, element);
    }
}

/// Remove every attribute outside [`ALLOWED_ATTRIBUTES`] from `root` and its
/// descendants.
pub fn strip_attributes(root: &mut Element) {
    AttributeStripper.visit_element_mut(root);
}

/// Rule-based inlining. Classes and data attributes are kept so the result
/// can still be re-opened; use [`inline_ultra`] for paste targets.
#[instrument(skip(body_html, tokens), fields(theme = %theme, len = body_html.len()))]
pub fn inline_rules(body_html: &str, theme: &ThemeId, tokens: &ResolvedTokens) -> CompileResult<String> {
    let mut root = article_root(body_html, theme)?;
    let styled = apply_rules(&mut root, tokens);
    debug!(styled, "applied style rules");
    Ok(serialize_nodes(&[Node::Element(root)]))
}

/// Rule-based inlining, then headings demoted to paragraphs and every
/// attribute outside the allow-list removed.
#[instrument(skip(body_html, tokens), fields(theme = %theme, len = body_html.len()))]
pub fn inline_ultra(body_html: &str, theme: &ThemeId, tokens: &ResolvedTokens) -> CompileResult<String> {
    let mut root = article_root(body_html, theme)?;
    apply_rules(&mut root, tokens);
    HeadingDemoter.visit_nodes_mut(&mut root.children);
    strip_attributes(&mut root);
    Ok(serialize_nodes(&[Node::Element(root)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> ResolvedTokens {
        ResolvedTokens::default()
    }

    #[test]
    fn test_titlebar_gets_accent_border() {
        let out = inline_rules(
            r#"<h2 class="titlebar">T</h2>"#,
            &ThemeId::clean(),
            &tokens(),
        )
        .unwrap();
        assert!(out.starts_with(r#"<section data-theme="clean" style="color:#111;"#));
        assert!(out.contains("border-left:4px solid #0b57d0"));
        assert!(out.contains(r#"class="titlebar""#));
    }

    #[test]
    fn test_card_drops_quote_border() {
        let out = inline_rules(
            r#"<blockquote class="card"><p>x</p></blockquote>"#,
            &ThemeId::clean(),
            &tokens(),
        )
        .unwrap();
        let style_start = out.find("<blockquote").unwrap();
        let card = &out[style_start..];
        assert!(card.contains("border:1px solid rgba(0, 0, 0, 0.12);background-color:rgba(11, 87, 208, 0.06);border-left:none"));
        assert!(!card[..card.find('>').unwrap()].contains("4px solid"));
    }

    #[test]
    fn test_existing_inline_style_is_kept() {
        let out = inline_rules(r#"<p style="color: red">x</p>"#, &ThemeId::clean(), &tokens()).unwrap();
        assert!(out.contains(r#"<p style="color:red;margin:12px 0">"#));
    }

    #[test]
    fn test_ultra_demotes_and_strips() {
        let out = inline_ultra(
            r#"<h2 class="titlebar" data-comp="titlebarH2" data-props="%7B%7D">T</h2><p><a href="https://x" class="l" onclick="evil()">x</a></p>"#,
            &ThemeId::parse("warm"),
            &tokens(),
        )
        .unwrap();
        assert!(!out.contains("<h2"));
        assert!(out.starts_with("<section style="));
        assert!(!out.contains("data-"));
        assert!(!out.contains("class="));
        assert!(!out.contains("onclick"));
        assert!(out.contains(r#"href="https://x""#));
        assert!(out.contains("<p style=\"margin:18px 0 10px;"));
    }
}
