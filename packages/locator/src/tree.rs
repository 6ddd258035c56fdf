use crate::instance::{ComponentInstance, InstanceLocation};
use crate::{decode_props, finalize, resolve_definition};
use folio_components::{Registry, SavedDefaults, PROPS_ATTR};
use folio_parser::{Document, Element};
use tracing::{debug, trace};

fn instance_for(
    el: &Element,
    from: usize,
    registry: &Registry,
    saved: &SavedDefaults,
) -> Option<ComponentInstance> {
    let def = resolve_definition(registry, &el.tag, |name| el.attr(name).map(str::to_string))?;
    let decoded = decode_props(el.attr(PROPS_ATTR).map(str::to_string));
    Some(ComponentInstance {
        component_id: def.id.clone(),
        location: InstanceLocation::Tree {
            from,
            to: from + el.size(),
        },
        values: finalize(def, decoded, registry, saved),
    })
}

/// Find the innermost editable component enclosing tree position `pos`.
///
/// A void element starting exactly at `pos` (a divider rule, an image) is
/// considered first, then the containing elements from the deepest outward.
/// The document root is never a candidate.
pub fn locate_in_tree(
    doc: &Document,
    pos: usize,
    registry: &Registry,
    saved: &SavedDefaults,
) -> Option<ComponentInstance> {
    let resolved = doc.resolve(pos)?;

    let mut candidates = Vec::with_capacity(resolved.depth() + 1);
    let mut indices = Vec::with_capacity(resolved.depth() + 1);
    for step in &resolved.path {
        indices.push(step.index);
        candidates.push((indices.clone(), step.start));
    }
    if let Some(leaf) = resolved.leaf_after {
        let mut leaf_indices = indices.clone();
        leaf_indices.push(leaf.index);
        candidates.push((leaf_indices, leaf.start));
    }

    for (indices, start) in candidates.iter().rev() {
        let Some(el) = doc.element_at(indices) else {
            continue;
        };
        if let Some(instance) = instance_for(el, *start, registry, saved) {
            debug!(pos, component = %instance.component_id, from = start, "located tree instance");
            return Some(instance);
        }
        trace!(pos, tag = %el.tag, "ancestor is not an editable component");
    }
    None
}

/// Every outermost instance of `component_id` in document order. Instances
/// nested inside another match are skipped so the spans never overlap.
pub fn instances_in_tree(
    doc: &Document,
    component_id: &str,
    registry: &Registry,
    saved: &SavedDefaults,
) -> Vec<ComponentInstance> {
    let mut found: Vec<ComponentInstance> = Vec::new();
    doc.for_each_element(|el, from, _to| {
        if let Some((_, last_end)) = found.last().map(|i| i.location.range()) {
            if from < last_end {
                return;
            }
        }
        if let Some(instance) = instance_for(el, from, registry, saved) {
            if instance.component_id == component_id {
                found.push(instance);
            }
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_parser::parse;

    #[test]
    fn test_cursor_in_card_body() {
        let doc = parse(r#"<p>x</p><blockquote class="card"><p>body</p></blockquote>"#).unwrap();
        // <p>x</p> spans 0..3, blockquote opens at 3, inner p at 4, text at 5.
        let hit = locate_in_tree(&doc, 6, Registry::builtin(), &SavedDefaults::new()).unwrap();
        assert_eq!(hit.component_id, "card");
        assert_eq!(hit.location, InstanceLocation::Tree { from: 3, to: 11 });
        assert_eq!(hit.values.get("showTitle").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_plain_prose_is_a_miss() {
        let doc = parse("<p>hello</p>").unwrap();
        assert!(locate_in_tree(&doc, 2, Registry::builtin(), &SavedDefaults::new()).is_none());
        assert!(locate_in_tree(&doc, 99, Registry::builtin(), &SavedDefaults::new()).is_none());
    }

    #[test]
    fn test_unknown_marker_is_not_editable() {
        let doc = parse(r#"<h2 data-comp="fromTheFuture" class="titlebar">T</h2>"#).unwrap();
        assert!(locate_in_tree(&doc, 1, Registry::builtin(), &SavedDefaults::new()).is_none());
    }
}
