use crate::schema::{Category, ComponentSchema};
use crate::PropertyBag;
use folio_parser::Node;
use serde::Serialize;

/// Output of a component renderer. At least one side is populated.
///
/// `fragment` exists for shapes that flat markup cannot carry through the
/// flat-text representation. A component that only produces a fragment
/// cannot be applied while text is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub markup: Option<String>,
    pub fragment: Option<Vec<Node>>,
}

impl RenderResult {
    pub fn markup(markup: impl Into<String>) -> Self {
        Self {
            markup: Some(markup.into()),
            fragment: None,
        }
    }

    pub fn fragment(nodes: Vec<Node>) -> Self {
        Self {
            markup: None,
            fragment: Some(nodes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_none() && self.fragment.is_none()
    }
}

/// Pure render function. Identical values always produce identical output.
pub type Renderer = fn(&PropertyBag) -> RenderResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ComponentSchema>,
    #[serde(skip_serializing_if = "PropertyBag::is_empty")]
    pub default_props: PropertyBag,
    /// Markup inserted as-is for components without a renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_markup: Option<String>,
    #[serde(skip)]
    pub renderer: Option<Renderer>,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            category,
            schema_version: 1,
            schema: None,
            default_props: PropertyBag::new(),
            static_markup: None,
            renderer: None,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = version.max(1);
        self
    }

    pub fn schema(mut self, schema: ComponentSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn default_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_props.insert(key.into(), value.into());
        self
    }

    pub fn static_markup(mut self, markup: impl Into<String>) -> Self {
        self.static_markup = Some(markup.into());
        self
    }

    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Editable components have both a property schema and a renderer.
    pub fn is_editable(&self) -> bool {
        self.schema.is_some() && self.renderer.is_some()
    }
}
