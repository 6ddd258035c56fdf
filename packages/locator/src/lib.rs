//! # Folio Locator
//!
//! Given a cursor in either representation of a document, find the
//! component instance that encloses it and decode its current values.
//!
//! - [`locate_in_tree`]: walks ancestors of a tree position outward
//! - [`locate_in_text`]: scans the flat text around a byte offset with
//!   depth-aware tag matching
//!
//! Both resolve the component the same way (explicit `data-comp` marker,
//! else the ordered [`inference`] table) and finish through [`finalize`].

pub mod inference;
pub mod instance;
pub mod text;
pub mod tree;

use folio_components::{
    decode, migrate, ComponentDefinition, PropertyBag, Registry, SavedDefaults, COMPONENT_ATTR,
};

pub use inference::{infer_component, InferenceRule, INFERENCE_RULES};
pub use instance::{ComponentInstance, InstanceLocation};
pub use text::{instances_in_text, locate_in_text, TextSpan};
pub use tree::{instances_in_tree, locate_in_tree};

/// Resolve the editable definition for an element given its tag and
/// attribute lookup. Explicit markers win; an unknown explicit id is not
/// editable and does not fall through to inference.
pub(crate) fn resolve_definition<'r>(
    registry: &'r Registry,
    tag: &str,
    attr: impl Fn(&str) -> Option<String>,
) -> Option<&'r ComponentDefinition> {
    let id = match attr(COMPONENT_ATTR).filter(|id| !id.trim().is_empty()) {
        Some(id) => id.trim().to_string(),
        None => {
            let class = attr("class").unwrap_or_default();
            infer_component(tag, &class)?.to_string()
        }
    };
    registry.get(&id).filter(|def| def.is_editable())
}

/// Effective values of a located instance.
///
/// The decoded payload is migrated on its own first so legacy keys are
/// upgraded before defaults can shadow them, then layered as
/// `defaults <- saved <- decoded` and stamped with the current version.
pub fn finalize(
    def: &ComponentDefinition,
    decoded: Option<PropertyBag>,
    registry: &Registry,
    saved: &SavedDefaults,
) -> PropertyBag {
    let mut values = registry.initial_values(def, saved);
    if let Some(decoded) = decoded {
        values.extend(migrate(&def.id, &decoded, def.schema_version));
    }
    migrate(&def.id, &values, def.schema_version)
}

pub(crate) fn decode_props(raw: Option<String>) -> Option<PropertyBag> {
    raw.as_deref().and_then(decode)
}
