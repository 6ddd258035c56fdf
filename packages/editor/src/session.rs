//! # Edit Session
//!
//! One open document with both of its representations, the active theme,
//! the component selection and the per-component saved defaults.
//!
//! Exactly one representation is authoritative at a time (see
//! [`FormatState`]). Component edits go to the authoritative one; when that
//! is the flat text, the tree is re-derived right away. Only keystrokes
//! reported through [`EditSession::text_changed`] are debounced.

use crate::errors::{EditorError, EditorResult};
use crate::export::{self, ExportMode};
use crate::format::{Format, FormatState, SyncTiming};
use crate::markdown::{markdown_to_tree, single_line, tree_to_markdown};
use crate::smart::{smart_format, SmartFormatReport};
use folio_common::{FileKind, PersistenceBridge};
use folio_compiler_inline::SnapshotBackend;
use folio_components::{
    ComponentDefinition, ComponentSchema, PropertyBag, RenderResult, Registry, SavedDefaults,
    VERSION_KEY,
};
use folio_locator::text::span_at;
use folio_locator::{
    instances_in_text, instances_in_tree, locate_in_text, locate_in_tree, ComponentInstance,
    InstanceLocation,
};
use folio_parser::{parse, parse_fragment, serialize, Document, Node};
use folio_theme::{ThemeCatalog, ThemeId, UserTheme};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// The selected component as the property panel sees it.
#[derive(Debug, Clone)]
pub struct SelectedSchema<'s> {
    pub definition: &'s ComponentDefinition,
    pub schema: &'s ComponentSchema,
    pub values: &'s PropertyBag,
    pub location: InstanceLocation,
}

pub struct EditSession {
    registry: &'static Registry,
    tree: Document,
    text: String,
    state: FormatState,
    theme: ThemeId,
    catalog: ThemeCatalog,
    saved: SavedDefaults,
    selection: Option<ComponentInstance>,
}

impl EditSession {
    /// Empty document, tree authoritative.
    pub fn new(timing: SyncTiming) -> Self {
        Self {
            registry: Registry::builtin(),
            tree: Document::default(),
            text: String::new(),
            state: FormatState::new(Format::Tree, timing),
            theme: ThemeId::clean(),
            catalog: ThemeCatalog::new(),
            saved: SavedDefaults::new(),
            selection: None,
        }
    }

    /// Open markup with the tree authoritative.
    pub fn from_markup(markup: &str, timing: SyncTiming) -> EditorResult<Self> {
        let mut session = Self::new(timing);
        session.tree = parse(markup)?;
        Ok(session)
    }

    /// Open Markdown with the flat text authoritative.
    pub fn from_markdown(text: &str, timing: SyncTiming) -> EditorResult<Self> {
        let mut session = Self::new(timing);
        session.tree = markdown_to_tree(text)?;
        session.text = text.to_string();
        session.state.enter_text();
        Ok(session)
    }

    /// Open a file through the persistence bridge. Markdown and plain text
    /// open as flat text, markup opens as a tree.
    #[instrument(skip(bridge, path, timing), fields(path = %path.display()))]
    pub fn open<P: PersistenceBridge>(bridge: &P, path: &Path, timing: SyncTiming) -> EditorResult<Self> {
        let kind = FileKind::detect(path).ok_or_else(|| EditorError::UnsupportedFile {
            path: path.to_path_buf(),
        })?;
        let contents = bridge.read(path)?;
        info!(?kind, bytes = contents.len(), "opened document");
        if kind.opens_as_text() {
            Self::from_markdown(&contents, timing)
        } else {
            Self::from_markup(&contents, timing)
        }
    }

    /// Write the document in the representation its extension calls for.
    #[instrument(skip(self, bridge, path), fields(path = %path.display()))]
    pub fn save<P: PersistenceBridge>(&self, bridge: &mut P, path: &Path) -> EditorResult<()> {
        let kind = FileKind::detect(path).ok_or_else(|| EditorError::UnsupportedFile {
            path: path.to_path_buf(),
        })?;
        let contents = if kind.opens_as_text() {
            self.current_markdown()
        } else {
            serialize(&self.current_tree()?)
        };
        bridge.write(path, &contents)?;
        info!(?kind, bytes = contents.len(), "saved document");
        Ok(())
    }

    pub fn with_registry(mut self, registry: &'static Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_saved_defaults(mut self, saved: SavedDefaults) -> Self {
        self.saved = saved;
        self
    }

    pub fn with_theme(mut self, theme: ThemeId) -> Self {
        self.theme = theme;
        self
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    pub fn format(&self) -> Format {
        self.state.authoritative()
    }

    pub fn state(&self) -> &FormatState {
        &self.state
    }

    pub fn tree(&self) -> &Document {
        &self.tree
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn saved_defaults(&self) -> &SavedDefaults {
        &self.saved
    }

    pub fn selection(&self) -> Option<&ComponentInstance> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Number of times the tree was rebuilt from the flat text.
    pub fn rederivations(&self) -> u64 {
        self.state.rederivations()
    }

    /// Up-to-date tree, derived from the text when the text is authoritative.
    pub fn current_tree(&self) -> EditorResult<Document> {
        match self.format() {
            Format::Tree => Ok(self.tree.clone()),
            Format::Text => markdown_to_tree(&self.text),
        }
    }

    /// Up-to-date flat text, derived from the tree when the tree is
    /// authoritative.
    pub fn current_markdown(&self) -> String {
        match self.format() {
            Format::Tree => tree_to_markdown(&self.tree),
            Format::Text => self.text.clone(),
        }
    }

    // ---- representation switching -------------------------------------

    pub fn switch_to_text(&mut self) {
        if self.format() == Format::Text {
            return;
        }
        self.text = tree_to_markdown(&self.tree);
        self.state.enter_text();
        self.selection = None;
        info!(bytes = self.text.len(), "switched to text");
    }

    pub fn switch_to_tree(&mut self) -> EditorResult<()> {
        if self.format() == Format::Tree {
            return Ok(());
        }
        self.tree = markdown_to_tree(&self.text)?;
        self.state.enter_tree();
        self.selection = None;
        info!(nodes = self.tree.children.len(), "switched to tree");
        Ok(())
    }

    /// The user typed: store the text and (re)arm the debounce.
    pub fn text_changed(&mut self, text: impl Into<String>, now: Instant) -> EditorResult<()> {
        if self.format() != Format::Text {
            return Err(EditorError::WrongFormat { expected: Format::Text });
        }
        self.text = text.into();
        self.selection = None;
        self.state.text_changed(now);
        Ok(())
    }

    /// Advance the clock. Returns `true` when the tree was re-derived.
    pub fn tick(&mut self, now: Instant) -> EditorResult<bool> {
        if !self.state.tick(now) {
            return Ok(false);
        }
        self.tree = markdown_to_tree(&self.text)?;
        debug!(rederivations = self.state.rederivations(), "tree re-derived after typing");
        Ok(true)
    }

    /// Replace the tree. While text is authoritative the text follows,
    /// unless the user is typing.
    pub fn set_tree(&mut self, doc: Document) {
        self.tree = doc;
        self.selection = None;
        if self.state.allows_reverse_sync() {
            self.text = tree_to_markdown(&self.tree);
            debug!("text refreshed from tree");
        }
    }

    // ---- component selection ------------------------------------------

    /// Locate the component around `position` in the authoritative
    /// representation: a tree position or a byte offset into the text.
    pub fn select_at(&mut self, position: usize) -> Option<&ComponentInstance> {
        self.selection = match self.format() {
            Format::Tree => locate_in_tree(&self.tree, position, self.registry, &self.saved),
            Format::Text => locate_in_text(&self.text, position, self.registry, &self.saved),
        };
        self.selection.as_ref()
    }

    pub fn selected_schema(&self) -> Option<SelectedSchema<'_>> {
        let selected = self.selection.as_ref()?;
        let definition = self.registry.get(&selected.component_id)?;
        Some(SelectedSchema {
            definition,
            schema: definition.schema.as_ref()?,
            values: &selected.values,
            location: selected.location,
        })
    }

    // ---- component edits ----------------------------------------------

    /// Re-render the selected instance with `values` layered over its
    /// current values, and remember them as this component's defaults.
    #[instrument(skip(self, values))]
    pub fn apply_props(&mut self, values: PropertyBag) -> EditorResult<ComponentInstance> {
        let selected = self.selection.clone().ok_or(EditorError::NoSelection)?;
        let registry = self.registry;
        let def = registry.require(&selected.component_id)?;

        let mut next = selected.values.clone();
        next.extend(values);
        next.insert(VERSION_KEY.to_string(), def.schema_version.to_string());

        let instance = self.replace_instance(def, &selected, next)?;
        self.saved.save(def.id.clone(), instance.values.clone());
        self.after_component_edit()?;
        info!(component = %def.id, "applied properties");
        self.selection = Some(instance.clone());
        Ok(instance)
    }

    /// Re-render the selected instance with its component defaults.
    pub fn reset_defaults(&mut self) -> EditorResult<ComponentInstance> {
        let selected = self.selection.clone().ok_or(EditorError::NoSelection)?;
        let registry = self.registry;
        let def = registry.require(&selected.component_id)?;
        let defaults = registry.default_values(def);

        let instance = self.replace_instance(def, &selected, defaults)?;
        self.after_component_edit()?;
        info!(component = %def.id, "reset to defaults");
        self.selection = Some(instance.clone());
        Ok(instance)
    }

    /// Copy the selected instance's style fields to every other instance
    /// of the same component. Returns how many instances changed.
    #[instrument(skip(self))]
    pub fn copy_style_to_same(&mut self) -> EditorResult<usize> {
        let selected = self.selection.clone().ok_or(EditorError::NoSelection)?;
        let registry = self.registry;
        let def = registry.require(&selected.component_id)?;
        let keys = registry.style_keys(def);
        if keys.is_empty() {
            return Ok(0);
        }
        if self.format() == Format::Text && registry.render(def, &selected.values)?.markup.is_none() {
            return Err(EditorError::unsupported_in_text_mode(&def.id));
        }

        let instances = match self.format() {
            Format::Tree => instances_in_tree(&self.tree, &def.id, registry, &self.saved),
            Format::Text => instances_in_text(&self.text, &def.id, registry, &self.saved),
        };

        let (sel_start, sel_end) = selected.location.range();
        let mut shift: isize = 0;
        let mut updated = 0;
        // Back to front so the ranges still to visit stay valid.
        for instance in instances.into_iter().rev() {
            let (start, end) = instance.location.range();
            if start <= sel_start && sel_end <= end {
                continue;
            }

            let mut values = instance.values.clone();
            let mut changed = false;
            for key in &keys {
                if let Some(value) = selected.values.get(*key) {
                    if values.get(*key) != Some(value) {
                        values.insert(key.to_string(), value.clone());
                        changed = true;
                    }
                }
            }
            if !changed {
                continue;
            }

            let before = self.representation_len();
            self.replace_instance(def, &instance, values)?;
            if end <= sel_start {
                shift += self.representation_len() as isize - before as isize;
            }
            updated += 1;
        }

        if updated > 0 {
            self.after_component_edit()?;
        }
        if shift != 0 {
            let mut moved = selected;
            moved.location = shifted(moved.location, shift);
            self.selection = Some(moved);
        }
        info!(component = %def.id, updated, "copied style to same components");
        Ok(updated)
    }

    /// Insert a component with its saved (or default) values: in the tree
    /// after the top-level block containing `position`, in the text at the
    /// byte offset `position` as its own block.
    #[instrument(skip(self))]
    pub fn insert_component(&mut self, component_id: &str, position: usize) -> EditorResult<ComponentInstance> {
        let registry = self.registry;
        let def = registry.require(component_id)?;
        let values = registry.initial_values(def, &self.saved);
        let rendered = registry.render_instance(def, &values)?;

        let location = match self.format() {
            Format::Tree => {
                let at = self.tree_insertion_point(position);
                let nodes = rendered_nodes(rendered)?;
                let root = first_element_span(&nodes);
                self.tree.replace_range(at, at, nodes)?;
                InstanceLocation::Tree {
                    from: at + root.0,
                    to: at + root.1,
                }
            }
            Format::Text => {
                let markup = rendered
                    .markup
                    .ok_or_else(|| EditorError::unsupported_in_text_mode(&def.id))?;
                let html = single_line(&strip_trailing_empty_paragraph(&markup));
                let at = char_boundary(&self.text, position);
                let lead = leading_separator(&self.text[..at]);
                let trail = block_separator(&self.text[at..]);
                self.text.insert_str(at, &format!("{}{}{}", lead, html, trail));
                let start = at + lead.len();
                InstanceLocation::Text {
                    start,
                    end: text_span_end(&self.text, start, html.len()),
                }
            }
        };

        if def.is_editable() {
            self.saved.save(def.id.clone(), values.clone());
        }
        self.after_component_edit()?;
        info!(component = %def.id, "inserted component");

        let instance = ComponentInstance {
            component_id: def.id.clone(),
            location,
            values,
        };
        self.selection = def.is_editable().then(|| instance.clone());
        Ok(instance)
    }

    /// One-shot structural beautification of the tree.
    pub fn smart_format(&mut self) -> EditorResult<SmartFormatReport> {
        if self.format() != Format::Tree {
            return Err(EditorError::WrongFormat { expected: Format::Tree });
        }
        self.selection = None;
        Ok(smart_format(&mut self.tree))
    }

    fn replace_instance(
        &mut self,
        def: &ComponentDefinition,
        instance: &ComponentInstance,
        values: PropertyBag,
    ) -> EditorResult<ComponentInstance> {
        let rendered = self.registry.render_instance(def, &values)?;

        let location = match instance.location {
            InstanceLocation::Tree { from, to } => {
                let mut nodes = rendered_nodes(rendered)?;
                trim_trailing_empty_paragraph(&mut nodes);
                let root = first_element_span(&nodes);
                self.tree.replace_range(from, to, nodes)?;
                InstanceLocation::Tree {
                    from: from + root.0,
                    to: from + root.1,
                }
            }
            InstanceLocation::Text { start, end } => {
                let markup = rendered
                    .markup
                    .ok_or_else(|| EditorError::unsupported_in_text_mode(&def.id))?;
                let html = single_line(&strip_trailing_empty_paragraph(&markup));
                let sep = block_separator(&self.text[end..]);
                self.text.replace_range(start..end, &format!("{}{}", html, sep));
                InstanceLocation::Text {
                    start,
                    end: text_span_end(&self.text, start, html.len()),
                }
            }
        };

        debug!(component = %def.id, ?location, "replaced instance");
        Ok(ComponentInstance {
            component_id: def.id.clone(),
            location,
            values,
        })
    }

    fn after_component_edit(&mut self) -> EditorResult<()> {
        if self.format() == Format::Text {
            self.tree = markdown_to_tree(&self.text)?;
            self.state.record_rederivation();
        }
        Ok(())
    }

    fn representation_len(&self) -> usize {
        match self.format() {
            Format::Tree => self.tree.content_size(),
            Format::Text => self.text.len(),
        }
    }

    fn tree_insertion_point(&self, position: usize) -> usize {
        let position = position.min(self.tree.content_size());
        let mut start = 0;
        for child in &self.tree.children {
            let end = start + child.size();
            if position > start && position < end {
                return end;
            }
            start = end;
        }
        position
    }

    // ---- themes ---------------------------------------------------------

    pub fn theme(&self) -> &ThemeId {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: ThemeId) {
        info!(theme = %theme, "theme selected");
        self.theme = theme;
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    /// Add a user theme to the catalog and select it.
    pub fn import_theme(&mut self, theme: UserTheme) -> ThemeId {
        let id = self.catalog.add(theme);
        self.set_theme(id.clone());
        id
    }

    /// Import a JSON theme and select it.
    pub fn import_theme_json(&mut self, text: &str) -> EditorResult<ThemeId> {
        Ok(self.import_theme(UserTheme::from_json(text)?))
    }

    /// Import a CSS theme and select it.
    pub fn import_theme_css(&mut self, name: &str, css: &str) -> EditorResult<ThemeId> {
        Ok(self.import_theme(UserTheme::from_css(name, css)?))
    }

    /// Delete a user theme, by catalog id or `custom:` id. The clean theme
    /// takes over if it was active.
    pub fn delete_custom_theme(&mut self, id: &str) -> bool {
        let id = id.strip_prefix("custom:").unwrap_or(id);
        if self.catalog.remove(id).is_none() {
            return false;
        }
        if self.theme == ThemeId::Custom(id.to_string()) {
            self.set_theme(ThemeId::clean());
        }
        true
    }

    // ---- export ---------------------------------------------------------

    fn body_markup(&self) -> EditorResult<String> {
        Ok(serialize(&self.current_tree()?))
    }

    /// `<section class="folio-article" data-theme="...">` around the body.
    pub fn export_body(&self) -> EditorResult<String> {
        Ok(export::article_body(&self.body_markup()?, &self.theme))
    }

    pub fn export_css(&self) -> String {
        export::export_css(&self.theme, &self.catalog)
    }

    pub fn export_clipboard(&self) -> EditorResult<String> {
        Ok(export::clipboard_html(&self.body_markup()?, &self.theme, &self.catalog))
    }

    /// Rule-based or ultra inlined article.
    pub fn export_inlined(&self, mode: ExportMode) -> EditorResult<String> {
        export::inlined_html(mode, &self.body_markup()?, &self.theme, &self.catalog)
    }

    pub fn export_computed<B: SnapshotBackend>(&self, backend: &mut B) -> EditorResult<String> {
        export::computed_html(backend, &self.body_markup()?, &self.theme, &self.catalog)
    }
}

fn rendered_nodes(rendered: RenderResult) -> EditorResult<Vec<Node>> {
    Ok(match rendered.markup {
        Some(markup) => parse_fragment(&markup)?,
        None => rendered.fragment.unwrap_or_default(),
    })
}

/// `(from, to)` of the first element, relative to the start of `nodes`.
fn first_element_span(nodes: &[Node]) -> (usize, usize) {
    let mut offset = 0;
    for node in nodes {
        if node.as_element().is_some() {
            return (offset, offset + node.size());
        }
        offset += node.size();
    }
    (0, offset)
}

/// The empty paragraph renderers append after a block is only wanted on
/// first insertion.
fn trim_trailing_empty_paragraph(nodes: &mut Vec<Node>) {
    let empty_p = matches!(nodes.last(), Some(Node::Element(el)) if el.tag == "p" && el.text_content().trim().is_empty() && el.children.iter().all(|c| c.as_element().is_none()));
    if empty_p && nodes.len() > 1 {
        nodes.pop();
    }
}

fn strip_trailing_empty_paragraph(markup: &str) -> String {
    static TRAILING_P: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_P.get_or_init(|| Regex::new(r"(?i)<p>\s*</p>\s*$").unwrap());
    re.replace(markup, "").trim().to_string()
}

fn char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Blank line needed after a raw block so Markdown ends it there.
fn block_separator(rest: &str) -> &'static str {
    if rest.is_empty() || rest.starts_with("\n\n") {
        ""
    } else if rest.starts_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}

/// Blank line needed before a raw block so it starts a block of its own.
fn leading_separator(before: &str) -> &'static str {
    if before.is_empty() || before.ends_with("\n\n") {
        ""
    } else if before.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}

fn text_span_end(text: &str, start: usize, fallback_len: usize) -> usize {
    span_at(text, start).map(|span| span.end).unwrap_or(start + fallback_len)
}

fn shifted(location: InstanceLocation, by: isize) -> InstanceLocation {
    let apply = |n: usize| (n as isize + by).max(0) as usize;
    match location {
        InstanceLocation::Tree { from, to } => InstanceLocation::Tree {
            from: apply(from),
            to: apply(to),
        },
        InstanceLocation::Text { start, end } => InstanceLocation::Text {
            start: apply(start),
            end: apply(end),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        assert_eq!(block_separator(""), "");
        assert_eq!(block_separator("\n\nnext"), "");
        assert_eq!(block_separator("\nnext"), "\n");
        assert_eq!(block_separator("next"), "\n\n");
        assert_eq!(leading_separator("para"), "\n\n");
        assert_eq!(leading_separator("para\n"), "\n");
    }

    #[test]
    fn test_strip_trailing_empty_paragraph() {
        assert_eq!(strip_trailing_empty_paragraph("<hr /><P></P>\n"), "<hr />");
        assert_eq!(strip_trailing_empty_paragraph("<p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_tree_insertion_point_skips_to_block_end() {
        let session = EditSession::from_markup("<p>abc</p><hr />", SyncTiming::default()).unwrap();
        assert_eq!(session.tree_insertion_point(0), 0);
        assert_eq!(session.tree_insertion_point(2), 5);
        assert_eq!(session.tree_insertion_point(5), 5);
        assert_eq!(session.tree_insertion_point(99), 6);
    }

    #[test]
    fn test_first_element_span() {
        let nodes = parse_fragment("x<p>ab</p><p></p>").unwrap();
        assert_eq!(first_element_span(&nodes), (1, 5));
    }

    #[test]
    fn test_shifted() {
        assert_eq!(
            shifted(InstanceLocation::Text { start: 10, end: 20 }, -4),
            InstanceLocation::Text { start: 6, end: 16 }
        );
    }
}
