use folio_components::{
    decode, encode, migrate, strip_internal, Category, PropertyBag, Registry, COMPONENT_ATTR,
    PROPS_ATTR,
};
use folio_parser::{parse_fragment, Node};

fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_renderers_are_pure() {
    let registry = Registry::builtin();
    for def in registry.list() {
        let values = registry.default_values(def);
        let first = registry.render(def, &values).unwrap();
        let second = registry.render(def, &values).unwrap();
        assert_eq!(first, second, "{} rendered differently twice", def.id);
    }
}

#[test]
fn test_instances_carry_markers_on_first_root() {
    let registry = Registry::builtin();
    for def in registry.list().iter().filter(|d| d.is_editable()) {
        let values = registry.default_values(def);
        let rendered = registry.render_instance(def, &values).unwrap();
        let nodes = match (&rendered.markup, rendered.fragment) {
            (Some(markup), _) => parse_fragment(markup).unwrap(),
            (None, Some(nodes)) => nodes,
            (None, None) => panic!("{} rendered nothing", def.id),
        };

        let root = nodes.iter().find_map(Node::as_element).unwrap();
        assert_eq!(root.attr(COMPONENT_ATTR), Some(def.id.as_str()));
        let decoded = decode(root.attr(PROPS_ATTR).unwrap()).unwrap();
        assert_eq!(decoded, values, "{} payload does not round-trip", def.id);

        let marked = nodes
            .iter()
            .filter_map(Node::as_element)
            .filter(|el| el.attr(COMPONENT_ATTR).is_some())
            .count();
        assert_eq!(marked, 1);
    }
}

#[test]
fn test_schema_defaults_survive_the_attribute() {
    let registry = Registry::builtin();
    for def in registry.list().iter().filter(|d| d.is_editable()) {
        let values = registry.default_values(def);
        let decoded = decode(&encode(&values)).unwrap();
        let upgraded = migrate(&def.id, &decoded, def.schema_version);
        assert_eq!(strip_internal(&upgraded), strip_internal(&values));
    }
}

#[test]
fn test_legacy_callout_renders_with_kind() {
    let registry = Registry::builtin();
    let def = registry.get("calloutInfo").unwrap();
    let legacy = bag(&[("variant", "warn"), ("title", "Heads up"), ("body", "Careful"), ("_v", "1")]);

    let values = migrate(&def.id, &legacy, def.schema_version);
    assert_eq!(values.get("kind").map(String::as_str), Some("warn"));

    let markup = registry
        .render_instance(def, &values)
        .unwrap()
        .markup
        .unwrap();
    assert!(markup.starts_with("<blockquote class=\"callout callout--warn\" data-comp=\"calloutInfo\""));
    assert!(markup.contains("<strong>Heads up</strong>"));
}

#[test]
fn test_scroll_frame_stays_a_fragment() {
    let registry = Registry::builtin();
    let def = registry.get("royalFrameScroll").unwrap();
    let rendered = registry
        .render_instance(def, &registry.default_values(def))
        .unwrap();
    assert!(rendered.markup.is_none());
    let nodes = rendered.fragment.unwrap();
    assert_eq!(
        nodes[0].as_element().unwrap().attr(COMPONENT_ATTR),
        Some("royalFrameScroll")
    );
}

#[test]
fn test_search_by_text_and_category() {
    let registry = Registry::builtin();

    let ids = |query: &str, category: Option<Category>| -> Vec<String> {
        registry
            .search(query, category)
            .into_iter()
            .map(|d| d.id.clone())
            .collect()
    };

    assert_eq!(ids("", None).len(), registry.list().len());
    assert_eq!(ids("ROYAL", None), vec!["royalFrame", "royalFrameScroll"]);
    assert_eq!(ids("", Some(Category::List)), vec!["checklist", "steps"]);
    assert_eq!(ids("divider", Some(Category::Separator)), Vec::<String>::new());
    assert_eq!(ids("announcements", None), vec!["royalFrame"]);
}

#[test]
fn test_style_keys_of_catalog() {
    let registry = Registry::builtin();
    let keys = |id: &str| registry.style_keys(registry.get(id).unwrap());
    assert_eq!(keys("calloutInfo"), vec!["kind"]);
    assert_eq!(keys("dividerFancy"), vec!["pattern", "count"]);
    assert_eq!(keys("separatorLantern"), vec!["color"]);
    assert!(keys("card").is_empty());
    assert!(keys("dividerLine").is_empty());
}
