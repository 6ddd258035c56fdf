//! One-shot structural beautification of a tree.
//!
//! Steps, in order:
//!
//! 1. the first top-level paragraph with at least 12 characters becomes the
//!    lead (labelled paragraphs are skipped, they turn into callouts)
//! 2. unclassed `h2` get `titlebar` (keyword or short) or `section`
//! 3. short or question-like `h3` get `badge`
//! 4. top-level `Tip:`/`Info:`/`Warning:`/`Conclusion:` paragraphs become
//!    callouts
//! 5. plain block quotes get `quote`
//! 6. a wave divider is inserted between adjacent top-level `h2` sections
//!    that have none

use folio_common::{walk_element_mut, VisitorMut};
use folio_parser::{Document, Element, Node};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{info, instrument};

const LEAD_MIN_CHARS: usize = 12;
const SHORT_TITLEBAR_CHARS: usize = 10;
const SHORT_BADGE_CHARS: usize = 18;

const TITLEBAR_KEYWORDS: &[&str] = &[
    "steps",
    "checklist",
    "contents",
    "faq",
    "q&a",
    "summary",
    "conclusion",
    "method",
    "key points",
    "highlights",
    "goals",
];

const WAVE_TEXT: &str = "≈≈≈≈≈";

/// What [`smart_format`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SmartFormatReport {
    pub lead: bool,
    pub headings: usize,
    pub badges: usize,
    pub callouts: usize,
    pub quotes: usize,
    pub dividers: usize,
}

impl SmartFormatReport {
    pub fn changed(&self) -> bool {
        self.lead
            || self.headings + self.badges + self.callouts + self.quotes + self.dividers > 0
    }
}

fn normalized_text(el: &Element) -> String {
    el.text_content().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn add_class(el: &mut Element, class: &str) {
    let existing = el.class().trim().to_string();
    if existing.is_empty() {
        el.set_attr("class", class);
    } else {
        el.set_attr("class", format!("{} {}", existing, class));
    }
}

fn looks_like_question(text: &str) -> bool {
    static QUESTION: OnceLock<Regex> = OnceLock::new();
    QUESTION
        .get_or_init(|| Regex::new(r"(?i)^(q\s*:|q&a|question\s*:)").unwrap())
        .is_match(text)
}

fn h2_style(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if TITLEBAR_KEYWORDS.iter().any(|k| lower.contains(k)) || text.chars().count() <= SHORT_TITLEBAR_CHARS {
        "titlebar"
    } else {
        "section"
    }
}

/// Tree-wide class passes (steps 2, 3 and 5).
#[derive(Default)]
struct ClassPass {
    report: SmartFormatReport,
}

impl VisitorMut for ClassPass {
    fn visit_element_mut(&mut self, el: &mut Element) {
        match el.tag.as_str() {
            "h2" if !el.has_class("section") && !el.has_class("titlebar") => {
                let style = h2_style(&normalized_text(el));
                add_class(el, style);
                self.report.headings += 1;
            }
            "h3" if !el.has_class("badge") => {
                let text = normalized_text(el);
                if looks_like_question(&text) || text.chars().count() <= SHORT_BADGE_CHARS {
                    add_class(el, "badge");
                    self.report.badges += 1;
                }
            }
            "blockquote" if !["quote", "callout", "card"].iter().any(|c| el.has_class(c)) => {
                add_class(el, "quote");
                self.report.quotes += 1;
            }
            _ => {}
        }
        walk_element_mut(self, el);
    }
}

fn callout_for(paragraph: &Element) -> Option<Element> {
    static LABELLED: OnceLock<Regex> = OnceLock::new();
    let labelled = LABELLED.get_or_init(|| Regex::new(r"(?i)^(tip|info|warning|conclusion)\s*:\s*(.+)$").unwrap());

    let text = normalized_text(paragraph);
    let caps = labelled.captures(&text)?;
    let label = caps.get(1)?.as_str();
    let content = caps.get(2)?.as_str();
    let variant = match label.to_ascii_lowercase().as_str() {
        "warning" => "callout--warn",
        "conclusion" => "callout--ok",
        _ => "callout--info",
    };

    Some(
        Element::new("blockquote")
            .with_attr("class", format!("callout {}", variant))
            .with_child(Element::new("p").with_child(Element::new("strong").with_text(label)))
            .with_child(Element::new("p").with_text(content)),
    )
}

fn has_divider(nodes: &[Node]) -> bool {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .any(|el| el.tag == "hr" || (el.tag == "p" && el.has_class("divider")))
}

/// Apply every smart-format step to `doc` in place.
#[instrument(skip(doc), fields(nodes = doc.children.len()))]
pub fn smart_format(doc: &mut Document) -> SmartFormatReport {
    let mut pass = ClassPass::default();
    pass.visit_document_mut(doc);
    let mut report = pass.report;

    let lead = doc.children.iter_mut().filter_map(Node::as_element_mut).find(|el| {
        el.tag == "p" && normalized_text(el).chars().count() >= LEAD_MIN_CHARS && callout_for(el).is_none()
    });
    if let Some(el) = lead {
        if !el.has_class("lead") && !el.has_class("caption") {
            add_class(el, "lead");
            report.lead = true;
        }
    }

    for node in doc.children.iter_mut() {
        let replacement = match node {
            Node::Element(el) if el.tag == "p" => callout_for(el),
            _ => None,
        };
        if let Some(callout) = replacement {
            *node = Node::Element(callout);
            report.callouts += 1;
        }
    }

    let h2_indices: Vec<usize> = doc
        .children
        .iter()
        .enumerate()
        .filter(|(_, n)| n.as_element().is_some_and(|el| el.tag == "h2"))
        .map(|(i, _)| i)
        .collect();
    // Back to front so earlier indices stay valid.
    for pair in h2_indices.windows(2).rev() {
        let (start, end) = (pair[0], pair[1]);
        if has_divider(&doc.children[start + 1..end]) {
            continue;
        }
        let divider = Element::new("p")
            .with_attr("class", "divider divider--wave")
            .with_text(WAVE_TEXT);
        doc.children.insert(end, divider.into());
        report.dividers += 1;
    }

    info!(
        lead = report.lead,
        headings = report.headings,
        badges = report.badges,
        callouts = report.callouts,
        quotes = report.quotes,
        dividers = report.dividers,
        "smart format applied"
    );
    report
}
