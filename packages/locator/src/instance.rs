use folio_components::PropertyBag;
use serde::Serialize;

/// Where a located instance lives. Tree spans are document positions, text
/// spans are byte offsets into the flat text. Both are half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InstanceLocation {
    Tree { from: usize, to: usize },
    Text { start: usize, end: usize },
}

impl InstanceLocation {
    pub fn range(&self) -> (usize, usize) {
        match *self {
            InstanceLocation::Tree { from, to } => (from, to),
            InstanceLocation::Text { start, end } => (start, end),
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, InstanceLocation::Tree { .. })
    }
}

/// A component occurrence under the cursor. Recomputed on every cursor
/// movement and never kept across a representation switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    pub component_id: String,
    pub location: InstanceLocation,
    pub values: PropertyBag,
}
