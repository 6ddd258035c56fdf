//! Computed-snapshot inlining.
//!
//! The article is rendered with its real stylesheet inside a short-lived
//! render context (a browser tab in production), the resolved values of a
//! fixed property list are read back for every element, and those values are
//! written onto the tree as literal inline styles.

use crate::error::{CompileError, CompileResult};
use crate::inline::{append_style, article_root, strip_attributes};
use crate::stylesheet::ACCENT_BAR_SELECTOR;
use folio_common::{walk_element, walk_element_mut, Visitor, VisitorMut};
use folio_parser::{serialize_nodes, Element, Node};
use folio_theme::{ThemeId, ARTICLE_CLASS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Properties captured per element. Nothing outside this list is read.
pub const CAPTURED_PROPERTIES: [&str; 45] = [
    "color",
    "background",
    "background-color",
    "background-image",
    "background-repeat",
    "background-position",
    "background-size",
    "background-clip",
    "font-size",
    "font-weight",
    "font-style",
    "text-decoration-line",
    "line-height",
    "text-align",
    "letter-spacing",
    "word-break",
    "white-space",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border-top-width",
    "border-top-style",
    "border-top-color",
    "border-right-width",
    "border-right-style",
    "border-right-color",
    "border-bottom-width",
    "border-bottom-style",
    "border-bottom-color",
    "border-left-width",
    "border-left-style",
    "border-left-color",
    "border-radius",
    "box-shadow",
    "display",
    "max-width",
    "height",
    "overflow",
    "overflow-x",
    "overflow-y",
];

/// Width of the offscreen host the article is laid out in.
pub const SNAPSHOT_WIDTH_PX: u32 = 420;

const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";
const SPACER_STYLE: &str = "margin:0;line-height:12px;";

/// What a render context is asked to lay out and read back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    /// Serialized article root, including its class and theme attribute.
    pub article_html: String,
    pub css: String,
    pub width_px: u32,
    pub properties: Vec<String>,
    /// Elements whose `::before` accent bar must be read back.
    pub accent_bar_selector: String,
}

/// Generated accent bar of one matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccentBar {
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub width: String,
}

/// Captured values, root first then every descendant element in document
/// order. `accent_bars` follows the document order of the matched elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub elements: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub accent_bars: Vec<AccentBar>,
}

/// An isolated render context. Released exactly once by [`ContextGuard`].
pub trait RenderContext {
    fn capture(&mut self, request: &SnapshotRequest) -> CompileResult<Snapshot>;

    fn release(&mut self) -> CompileResult<()>;
}

/// Something that can hand out fresh render contexts.
pub trait SnapshotBackend {
    type Context: RenderContext;

    fn acquire(&mut self, width_px: u32) -> CompileResult<Self::Context>;
}

/// Releases its context when dropped, on success and failure alike.
pub struct ContextGuard<C: RenderContext> {
    context: Option<C>,
}

impl<C: RenderContext> ContextGuard<C> {
    pub fn new(context: C) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub fn capture(&mut self, request: &SnapshotRequest) -> CompileResult<Snapshot> {
        match self.context.as_mut() {
            Some(context) => context.capture(request),
            None => Err(CompileError::ContextUnavailable("context already released".into())),
        }
    }
}

impl<C: RenderContext> Drop for ContextGuard<C> {
    fn drop(&mut self) {
        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.release() {
                warn!(error = %e, "failed to release render context");
            }
        }
    }
}

/// Collects the elements of a tree in the order a snapshot lists them.
struct ElementOrder<'a> {
    styles: &'a [BTreeMap<String, String>],
    bars: &'a [AccentBar],
    next_element: usize,
    next_bar: usize,
}

fn captured_style(values: &BTreeMap<String, String>) -> Vec<(&'static str, &str)> {
    CAPTURED_PROPERTIES
        .iter()
        .filter_map(|prop| {
            let value = values.get(*prop)?.trim();
            if value.is_empty() {
                return None;
            }
            if matches!(*prop, "background-color" | "box-shadow") && value == TRANSPARENT {
                return None;
            }
            Some((*prop, value))
        })
        .collect()
}

impl ElementOrder<'_> {
    fn write_back(&mut self, element: &mut Element) {
        let values = self.styles.get(self.next_element);
        self.next_element += 1;

        let decls = values.map(captured_style).unwrap_or_default();
        if decls.is_empty() {
            element.remove_attr("style");
        } else {
            element.set_attr(
                "style",
                decls
                    .iter()
                    .map(|(p, v)| format!("{}:{}", p, v))
                    .collect::<Vec<_>>()
                    .join(";"),
            );
        }
    }

    fn convert_accent_bar(&mut self, element: &mut Element) {
        if !is_accent_bar_target(element) {
            return;
        }
        let bar = self.bars.get(self.next_bar).cloned().unwrap_or_default();
        self.next_bar += 1;

        let color = bar.background_color.trim();
        if color.is_empty() || color == TRANSPARENT {
            return;
        }
        let width = match bar.width.trim() {
            "" | "auto" => "4px",
            w => w,
        };
        append_style(
            element,
            [
                ("border-left-width", width),
                ("border-left-style", "solid"),
                ("border-left-color", color),
            ],
        );
    }
}

impl VisitorMut for ElementOrder<'_> {
    fn visit_element_mut(&mut self, element: &mut Element) {
        self.write_back(element);
        self.convert_accent_bar(element);
        walk_element_mut(self, element);
    }
}

fn is_accent_bar_target(element: &Element) -> bool {
    let (tag, class) = ACCENT_BAR_SELECTOR
        .split_once('.')
        .unwrap_or((ACCENT_BAR_SELECTOR, ""));
    element.tag == tag && element.has_class(class)
}

#[derive(Default)]
struct ElementCounter {
    count: usize,
}

impl Visitor for ElementCounter {
    fn visit_element(&mut self, element: &Element) {
        self.count += 1;
        walk_element(self, element);
    }
}

/// The root plus every descendant element, in the order a snapshot lists them.
fn count_elements(root: &Element) -> usize {
    let mut counter = ElementCounter::default();
    counter.visit_element(root);
    counter.count
}

/// Computed-snapshot inlining of `body_html` styled by `css`.
///
/// The render context is acquired from `backend` and released before this
/// returns, whether or not capture succeeded.
#[instrument(skip(backend, body_html, css), fields(theme = %theme, len = body_html.len()))]
pub fn inline_computed<B: SnapshotBackend>(
    backend: &mut B,
    body_html: &str,
    css: &str,
    theme: &ThemeId,
) -> CompileResult<String> {
    let mut root = article_root(body_html, theme)?;
    root.set_attr("class", ARTICLE_CLASS);

    let request = SnapshotRequest {
        article_html: serialize_nodes(&[Node::Element(root.clone())]),
        css: css.to_string(),
        width_px: SNAPSHOT_WIDTH_PX,
        properties: CAPTURED_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        accent_bar_selector: ACCENT_BAR_SELECTOR.to_string(),
    };

    let snapshot = {
        let mut guard = ContextGuard::new(backend.acquire(SNAPSHOT_WIDTH_PX)?);
        guard.capture(&request)?
    };

    let expected = count_elements(&root);
    if snapshot.elements.len() != expected {
        return Err(CompileError::SnapshotMismatch {
            expected,
            captured: snapshot.elements.len(),
        });
    }

    let mut order = ElementOrder {
        styles: &snapshot.elements,
        bars: &snapshot.accent_bars,
        next_element: 0,
        next_bar: 0,
    };
    order.visit_element_mut(&mut root);
    debug!(elements = expected, bars = order.next_bar, "wrote captured styles");

    append_style(&mut root, [("overflow", "visible"), ("padding-top", "6px")]);
    let spacer = Element::new("p")
        .with_attr("style", SPACER_STYLE)
        .with_child(Element::new("br"));
    root.children.insert(0, spacer.into());

    strip_attributes(&mut root);
    info!(elements = expected, "computed-snapshot inlining finished");
    Ok(serialize_nodes(&[Node::Element(root)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_values_are_skipped() {
        let mut values = BTreeMap::new();
        values.insert("background-color".to_string(), TRANSPARENT.to_string());
        values.insert("box-shadow".to_string(), TRANSPARENT.to_string());
        values.insert("color".to_string(), " rgb(17, 17, 17) ".to_string());
        values.insert("float".to_string(), "left".to_string());
        values.insert("display".to_string(), "".to_string());
        assert_eq!(captured_style(&values), vec![("color", "rgb(17, 17, 17)")]);
    }

    #[test]
    fn test_accent_bar_target() {
        assert!(is_accent_bar_target(&Element::new("h2").with_attr("class", "section")));
        assert!(!is_accent_bar_target(&Element::new("h2").with_attr("class", "titlebar")));
        assert!(!is_accent_bar_target(&Element::new("h3").with_attr("class", "section")));
    }

    #[test]
    fn test_property_list_has_no_duplicates() {
        let mut props = CAPTURED_PROPERTIES.to_vec();
        props.sort_unstable();
        props.dedup();
        assert_eq!(props.len(), CAPTURED_PROPERTIES.len());
    }
}
