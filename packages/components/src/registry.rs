use crate::builtins;
use crate::definition::{ComponentDefinition, RenderResult};
use crate::error::{ComponentError, ComponentResult};
use crate::saved::SavedDefaults;
use crate::schema::Category;
use crate::{encode, PropertyBag, COMPONENT_ATTR, PROPS_ATTR, VERSION_KEY};
use folio_parser::{parse_fragment, serialize_nodes, Node};
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Immutable catalog of component definitions, in display order.
#[derive(Debug, Clone)]
pub struct Registry {
    definitions: Vec<ComponentDefinition>,
}

impl Registry {
    pub fn new(definitions: Vec<ComponentDefinition>) -> Self {
        Self { definitions }
    }

    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| Registry::new(builtins::definitions()))
    }

    pub fn list(&self) -> &[ComponentDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
        self.definitions.iter().find(|def| def.id == id)
    }

    pub fn require(&self, id: &str) -> ComponentResult<&ComponentDefinition> {
        self.get(id).ok_or_else(|| ComponentError::unknown(id))
    }

    /// Case-insensitive match over name, description and id, optionally
    /// restricted to one category. An empty query matches everything.
    pub fn search(&self, query: &str, category: Option<Category>) -> Vec<&ComponentDefinition> {
        let needle = query.trim().to_lowercase();
        self.definitions
            .iter()
            .filter(|def| category.map_or(true, |c| def.category == c))
            .filter(|def| {
                needle.is_empty()
                    || def.name.to_lowercase().contains(&needle)
                    || def.id.to_lowercase().contains(&needle)
                    || def
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Schema defaults overlaid with `default_props`, stamped with the
    /// current schema version.
    pub fn default_values(&self, def: &ComponentDefinition) -> PropertyBag {
        let mut values = def
            .schema
            .as_ref()
            .map(|schema| schema.defaults())
            .unwrap_or_default();
        values.extend(def.default_props.clone());
        values.insert(VERSION_KEY.to_string(), def.schema_version.to_string());
        values
    }

    /// Defaults overlaid with the values last applied for this component.
    pub fn initial_values(&self, def: &ComponentDefinition, saved: &SavedDefaults) -> PropertyBag {
        let mut values = self.default_values(def);
        if let Some(last) = saved.get(&def.id) {
            values.extend(last.clone());
        }
        values.insert(VERSION_KEY.to_string(), def.schema_version.to_string());
        values
    }

    pub fn style_keys<'a>(&self, def: &'a ComponentDefinition) -> Vec<&'a str> {
        def.schema
            .as_ref()
            .map(|schema| schema.style_keys())
            .unwrap_or_default()
    }

    /// Raw renderer output, or the static markup for components without one.
    pub fn render(&self, def: &ComponentDefinition, values: &PropertyBag) -> ComponentResult<RenderResult> {
        let result = match (def.renderer, &def.static_markup) {
            (Some(render), _) => render(values),
            (None, Some(markup)) => RenderResult::markup(markup.clone()),
            (None, None) => RenderResult::default(),
        };
        if result.is_empty() {
            return Err(ComponentError::EmptyRender { id: def.id.clone() });
        }
        Ok(result)
    }

    /// Render an editable instance: the first root element carries the
    /// component marker and the encoded values.
    #[instrument(skip(self, def, values), fields(component = %def.id))]
    pub fn render_instance(&self, def: &ComponentDefinition, values: &PropertyBag) -> ComponentResult<RenderResult> {
        let rendered = self.render(def, values)?;
        let payload = encode(values);

        let result = if let Some(markup) = rendered.markup {
            let mut nodes = parse_fragment(&markup)?;
            stamp_first_element(&mut nodes, &def.id, &payload);
            RenderResult::markup(serialize_nodes(&nodes))
        } else {
            let mut nodes = rendered.fragment.unwrap_or_default();
            stamp_first_element(&mut nodes, &def.id, &payload);
            RenderResult::fragment(nodes)
        };

        debug!(payload_len = payload.len(), "rendered instance");
        Ok(result)
    }
}

fn stamp_first_element(nodes: &mut [Node], component_id: &str, payload: &str) {
    if let Some(el) = nodes.iter_mut().find_map(Node::as_element_mut) {
        el.set_attr(COMPONENT_ATTR, component_id);
        el.set_attr(PROPS_ATTR, payload);
    }
}
