use folio_components::{strip_internal, PropertyBag, Registry, SavedDefaults};
use folio_locator::{
    instances_in_text, instances_in_tree, locate_in_text, locate_in_tree, InstanceLocation,
};
use folio_parser::{parse, serialize};
use proptest::prelude::*;

fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_titlebar_probe_in_flat_text() {
    let text = r#"Intro

<h2 data-comp="titlebarH2" data-props="%7B%22text%22%3A%22Hi%22%7D">Hi</h2>

Outro"#;
    let offset = text.find(">Hi<").unwrap() + 2;
    let hit = locate_in_text(text, offset, Registry::builtin(), &SavedDefaults::new()).unwrap();

    assert_eq!(hit.component_id, "titlebarH2");
    assert_eq!(hit.values, bag(&[("text", "Hi"), ("_v", "1")]));
    let InstanceLocation::Text { start, end } = hit.location else {
        panic!("expected a text location");
    };
    assert!(text[start..end].starts_with("<h2 data-comp"));
    assert!(text[start..end].ends_with("</h2>"));
}

#[test]
fn test_cursor_outside_any_component() {
    let text = "Intro\n\n<h2 class=\"titlebar\">T</h2>\n\nOutro";
    let registry = Registry::builtin();
    let saved = SavedDefaults::new();
    assert!(locate_in_text(text, 2, registry, &saved).is_none());
    assert!(locate_in_text(text, text.len(), registry, &saved).is_none());
}

#[test]
fn test_nested_same_tag_resolves_to_outer_span() {
    let text = concat!(
        r#"<blockquote class="card"><p>body</p>"#,
        r#"<blockquote>nested quote</blockquote>"#,
        r#"<p>after the nested one</p></blockquote>"#,
        "\n\ntrailing"
    );
    let offset = text.find("after the nested").unwrap();
    let hit = locate_in_text(text, offset, Registry::builtin(), &SavedDefaults::new()).unwrap();

    assert_eq!(hit.component_id, "card");
    let expected_end = text.find("\n\ntrailing").unwrap();
    assert_eq!(hit.location, InstanceLocation::Text { start: 0, end: expected_end });
}

#[test]
fn test_inner_component_wins_and_outer_is_fallback() {
    let registry = Registry::builtin();
    let saved = SavedDefaults::new();
    let text = concat!(
        r#"<blockquote class="card"><p>card body</p>"#,
        r#"<blockquote class="callout callout--warn"><p>inner</p></blockquote>"#,
        r#"<p>more card</p></blockquote>"#
    );

    let inner = locate_in_text(text, text.find("inner").unwrap(), registry, &saved).unwrap();
    assert_eq!(inner.component_id, "calloutInfo");

    let outer = locate_in_text(text, text.find("more card").unwrap(), registry, &saved).unwrap();
    assert_eq!(outer.component_id, "card");
}

#[test]
fn test_non_editable_marker_walks_outward() {
    let text = concat!(
        r#"<blockquote class="callout"><p>x</p>"#,
        r#"<hr data-comp="dividerLine" />"#,
        r#"</blockquote>"#
    );
    let offset = text.find("<hr").unwrap() + 1;
    let hit = locate_in_text(text, offset, Registry::builtin(), &SavedDefaults::new()).unwrap();
    assert_eq!(hit.component_id, "calloutInfo");
}

#[test]
fn test_saved_defaults_fill_missing_keys() {
    let mut saved = SavedDefaults::new();
    saved.save("calloutInfo", bag(&[("kind", "ok"), ("title", "Saved title"), ("_v", "2")]));

    let doc = parse(r#"<blockquote class="callout"><p>legacy</p></blockquote>"#).unwrap();
    let hit = locate_in_tree(&doc, 3, Registry::builtin(), &saved).unwrap();
    assert_eq!(hit.values.get("kind").map(String::as_str), Some("ok"));
    assert_eq!(hit.values.get("title").map(String::as_str), Some("Saved title"));
    assert_eq!(hit.values.get("_v").map(String::as_str), Some("2"));
}

#[test]
fn test_legacy_payload_is_migrated_before_merge() {
    let registry = Registry::builtin();
    let saved = SavedDefaults::new();
    let legacy = folio_components::encode(&bag(&[("variant", "warn"), ("_v", "1")]));
    let text = format!(
        r#"<blockquote class="callout callout--warn" data-comp="calloutInfo" data-props="{}"><p>x</p></blockquote>"#,
        legacy
    );

    let hit = locate_in_text(&text, text.find("x</p>").unwrap(), registry, &saved).unwrap();
    assert_eq!(hit.values.get("kind").map(String::as_str), Some("warn"));
    assert!(!hit.values.contains_key("variant"));
}

#[test]
fn test_tree_and_text_agree_on_rendered_instances() {
    let registry = Registry::builtin();
    let saved = SavedDefaults::new();

    for def in registry.list().iter().filter(|d| d.is_editable()) {
        let mut values = registry.default_values(def);
        if let Some(first) = def.schema.as_ref().and_then(|s| s.fields.first()) {
            if first.options.is_empty() && !matches!(first.field_type, folio_components::FieldType::Switch) {
                values.insert(first.key.clone(), "Custom <value> & \"quotes\"".to_string());
            }
        }

        let rendered = registry.render_instance(def, &values).unwrap();
        let Some(markup) = rendered.markup else {
            continue;
        };

        let text = format!("Before\n\n{}\n\nAfter", markup);
        let start = text.find('<').unwrap();
        let end = start + markup.find("<p></p>").unwrap_or(markup.len());
        let mid = start + (end - start) / 2;
        let from_text = locate_in_text(&text, mid, registry, &saved)
            .unwrap_or_else(|| panic!("{} not found in text", def.id));
        assert_eq!(from_text.component_id, def.id);
        assert_eq!(strip_internal(&from_text.values), strip_internal(&values));

        let doc = parse(&markup).unwrap();
        let from_tree = locate_in_tree(&doc, 1, registry, &saved)
            .unwrap_or_else(|| panic!("{} not found in tree", def.id));
        assert_eq!(from_tree.values, from_text.values);
    }
}

#[test]
fn test_enumerating_same_component_instances() {
    let registry = Registry::builtin();
    let saved = SavedDefaults::new();
    let markup = concat!(
        r#"<blockquote class="callout callout--info"><p>a</p></blockquote>"#,
        r#"<p>prose</p>"#,
        r#"<blockquote class="card"><blockquote class="callout"><p>nested</p></blockquote></blockquote>"#,
        r#"<blockquote class="callout callout--ok"><p>b</p></blockquote>"#
    );

    let in_text = instances_in_text(markup, "calloutInfo", registry, &saved);
    assert_eq!(in_text.len(), 3);

    let doc = parse(markup).unwrap();
    let in_tree = instances_in_tree(&doc, "calloutInfo", registry, &saved);
    assert_eq!(in_tree.len(), 3);
    assert!(in_tree.iter().all(|i| i.location.is_tree()));
    assert_eq!(serialize(&doc), markup);
}

fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        any::<String>(),
        "[a-z \n\r\"'<>&%]{0,24}",
        "(Line one|\n\n|标题|</h2>|&amp;){0,5}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn text_and_tree_agree_for_any_field_value(
        component in prop::sample::select(vec![
            ("titlebarH2", "text"),
            ("badgeH3", "text"),
            ("calloutInfo", "title"),
            ("calloutInfo", "body"),
        ]),
        value in field_value(),
    ) {
        let registry = Registry::builtin();
        let saved = SavedDefaults::new();
        let def = registry.get(component.0).unwrap();
        let mut values = registry.default_values(def);
        values.insert(component.1.to_string(), value);

        let markup = registry.render_instance(def, &values).unwrap().markup.unwrap();
        let text = format!("Before\n\n{}\n\nAfter", markup);
        let start = text.find('<').unwrap();
        let end = start + markup.find("<p></p>").unwrap_or(markup.len());
        let from_text = locate_in_text(&text, start + (end - start) / 2, registry, &saved);
        let from_text = from_text.expect("instance found in text");
        prop_assert_eq!(&from_text.component_id, &def.id);
        prop_assert_eq!(strip_internal(&from_text.values), strip_internal(&values));

        let doc = parse(&markup).unwrap();
        let from_tree = locate_in_tree(&doc, 1, registry, &saved).expect("instance found in tree");
        prop_assert_eq!(from_tree.values, from_text.values);
    }
}
