//! Instance lookup over the flat-text representation.
//!
//! The flat text is Markdown with component blocks embedded as raw markup.
//! Only opening tags that could start a component are considered: tags named
//! by the inference table and any tag carrying a `data-comp` marker. Spans are
//! found by counting same-name opening and closing tags, so a component whose
//! body holds another element of the same name still closes at the right tag.

use crate::inference::is_inferable_tag;
use crate::instance::{ComponentInstance, InstanceLocation};
use crate::{decode_props, finalize, resolve_definition};
use folio_components::{Registry, SavedDefaults, COMPONENT_ATTR, PROPS_ATTR};
use folio_parser::ast::is_void_tag;
use folio_parser::parse_attributes;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)").unwrap())
}

/// Byte range of one element in the flat text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub tag: String,
    /// Offset of the opening `<`.
    pub start: usize,
    /// Offset just past the opening tag's `>`.
    pub open_end: usize,
    /// Offset just past the matching closing tag (or the opening tag itself
    /// for void and self-closing tags).
    pub end: usize,
}

impl TextSpan {
    pub fn opening_tag<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.open_end]
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

fn tag_end(text: &str, from: usize) -> Option<usize> {
    text[from..].find('>').map(|i| from + i + 1)
}

fn is_self_closing(open_tag: &str) -> bool {
    open_tag.trim_end_matches('>').trim_end().ends_with('/')
}

/// The span of the element whose opening tag starts at `start`.
///
/// Returns `None` when `start` is not an opening tag, the tag never ends,
/// or no matching closing tag exists before the end of the text.
pub fn span_at(text: &str, start: usize) -> Option<TextSpan> {
    let caps = tag_regex().captures(text.get(start..)?)?;
    if caps.get(0)?.start() != 0 || !caps[1].is_empty() {
        return None;
    }
    let tag = caps[2].to_ascii_lowercase();
    let open_end = tag_end(text, start)?;

    if is_void_tag(&tag) || is_self_closing(&text[start..open_end]) {
        return Some(TextSpan {
            tag,
            start,
            open_end,
            end: open_end,
        });
    }

    let mut depth = 1usize;
    for caps in tag_regex().captures_iter(&text[open_end..]) {
        if !caps[2].eq_ignore_ascii_case(&tag) {
            continue;
        }
        let at = open_end + caps.get(0)?.start();
        let after = tag_end(text, at)?;
        if !caps[1].is_empty() {
            depth -= 1;
            if depth == 0 {
                return Some(TextSpan {
                    tag,
                    start,
                    open_end,
                    end: after,
                });
            }
        } else if !is_self_closing(&text[at..after]) {
            depth += 1;
        }
    }
    None
}

/// Opening tags that may start a component, as `(start, open_end)`, in text
/// order, up to and including any tag starting at `limit`.
fn candidate_tags(text: &str, limit: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for caps in tag_regex().captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if m.start() > limit {
            break;
        }
        if !caps[1].is_empty() {
            continue;
        }
        let Some(open_end) = tag_end(text, m.start()) else {
            continue;
        };
        if is_inferable_tag(&caps[2]) || text[m.start()..open_end].contains(COMPONENT_ATTR) {
            out.push((m.start(), open_end));
        }
    }
    out
}

fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn instance_for(
    text: &str,
    span: &TextSpan,
    registry: &Registry,
    saved: &SavedDefaults,
) -> Option<ComponentInstance> {
    let attrs = parse_attributes(span.opening_tag(text));
    let attr = |name: &str| {
        attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.clone())
    };
    let def = resolve_definition(registry, &span.tag, attr)?;
    let decoded = decode_props(attr(PROPS_ATTR));
    Some(ComponentInstance {
        component_id: def.id.clone(),
        location: InstanceLocation::Text {
            start: span.start,
            end: span.end,
        },
        values: finalize(def, decoded, registry, saved),
    })
}

/// Find the innermost editable component whose span contains the byte
/// `offset`. Offsets past the end are clamped, offsets inside a UTF-8
/// sequence move back to its first byte.
pub fn locate_in_text(
    text: &str,
    offset: usize,
    registry: &Registry,
    saved: &SavedDefaults,
) -> Option<ComponentInstance> {
    let offset = clamp_offset(text, offset);

    for (start, _) in candidate_tags(text, offset).into_iter().rev() {
        let Some(span) = span_at(text, start) else {
            trace!(start, "opening tag has no matching close");
            continue;
        };
        if !span.contains(offset) {
            continue;
        }
        if let Some(instance) = instance_for(text, &span, registry, saved) {
            debug!(offset, component = %instance.component_id, start = span.start, end = span.end, "located text instance");
            return Some(instance);
        }
    }
    None
}

/// Every outermost instance of `component_id` in text order.
pub fn instances_in_text(
    text: &str,
    component_id: &str,
    registry: &Registry,
    saved: &SavedDefaults,
) -> Vec<ComponentInstance> {
    let mut found: Vec<ComponentInstance> = Vec::new();
    let mut covered_until = 0;
    for (start, _) in candidate_tags(text, text.len()) {
        if start < covered_until {
            continue;
        }
        let Some(span) = span_at(text, start) else {
            continue;
        };
        if let Some(instance) = instance_for(text, &span, registry, saved) {
            if instance.component_id == component_id {
                covered_until = span.end;
                found.push(instance);
            }
        }
    }
    found
}
