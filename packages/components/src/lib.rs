//! # Folio Components
//!
//! The catalog of semantic components (callouts, cards, frames, dividers)
//! and everything needed to carry their properties through a document:
//!
//! - [`Registry`]: static component definitions with field schemas and pure
//!   renderers
//! - [`codec`]: property bag <-> single attribute value
//! - [`migration`]: ordered per-component schema upgrades
//! - [`SavedDefaults`]: last-applied values per component, owned by the host

pub mod builtins;
pub mod codec;
pub mod definition;
pub mod error;
pub mod migration;
pub mod registry;
pub mod saved;
pub mod schema;

use std::collections::BTreeMap;

/// String-only property map. The reserved `_v` key holds the schema version.
pub type PropertyBag = BTreeMap<String, String>;

/// Reserved key carrying the schema version of a property bag.
pub const VERSION_KEY: &str = "_v";

/// Marker attribute naming the component of an instance root.
pub const COMPONENT_ATTR: &str = "data-comp";

/// Marker attribute carrying the encoded property bag of an instance root.
pub const PROPS_ATTR: &str = "data-props";

pub use codec::{decode, encode};
pub use definition::{ComponentDefinition, RenderResult, Renderer};
pub use error::{ComponentError, ComponentResult};
pub use migration::{migrate, read_version, strip_internal, Migration};
pub use registry::Registry;
pub use saved::SavedDefaults;
pub use schema::{
    is_switch_on, Category, ComponentSchema, Condition, FieldOption, FieldRole, FieldSpec,
    FieldType,
};
