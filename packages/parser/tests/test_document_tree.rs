use folio_parser::{parse, parse_fragment, serialize, serialize_nodes, Element, Node};

const ARTICLE: &str = r#"<h2 class="titlebar" data-comp="titlebarH2" data-props="%7B%22text%22%3A%22Hi%22%7D">Hi</h2>
<p></p>
<blockquote class="callout callout--info"><p><strong>Note</strong></p><p>Body</p></blockquote>
<p>Plain <em>text</em></p>
<hr />"#;

#[test]
fn test_article_structure() {
    let doc = parse(ARTICLE).unwrap();
    let tags: Vec<&str> = doc
        .children
        .iter()
        .filter_map(Node::as_element)
        .map(|el| el.tag.as_str())
        .collect();
    assert_eq!(tags, vec!["h2", "p", "blockquote", "p", "hr"]);

    let h2 = doc.children[0].as_element().unwrap();
    assert_eq!(h2.attr("data-comp"), Some("titlebarH2"));
    assert_eq!(
        h2.attr("data-props"),
        Some("%7B%22text%22%3A%22Hi%22%7D")
    );
}

#[test]
fn test_serialize_then_parse_is_stable() {
    let doc = parse(ARTICLE).unwrap();
    let once = serialize(&doc);
    let twice = serialize(&parse(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn test_spans_match_sizes() {
    let doc = parse(ARTICLE).unwrap();
    let mut last_top_end = 0;
    doc.for_each_element(|el, from, to| {
        assert_eq!(to - from, el.size());
        if from >= last_top_end {
            last_top_end = to;
        }
    });
    assert_eq!(last_top_end, doc.content_size());
}

#[test]
fn test_replace_callout_with_fragment() {
    let mut doc = parse(ARTICLE).unwrap();
    let mut span = None;
    doc.for_each_element(|el, from, to| {
        if el.has_class("callout") {
            span = Some((from, to));
        }
    });
    let (from, to) = span.unwrap();
    let replacement = parse_fragment(r#"<blockquote class="card"><p>Swapped</p></blockquote>"#).unwrap();
    doc.replace_range(from, to, replacement).unwrap();

    assert!(serialize(&doc).contains(r#"<blockquote class="card"><p>Swapped</p></blockquote>"#));
    assert!(!serialize(&doc).contains("callout"));
}

#[test]
fn test_nodes_serialize_as_tagged_json() {
    let node: Node = Element::new("p").with_text("x").into();
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["type"], "Element");
    assert_eq!(json["children"][0]["type"], "Text");
    assert_eq!(json["children"][0]["content"], "x");

    let back: Node = serde_json::from_value(json).unwrap();
    assert_eq!(serialize_nodes(&[back]), "<p>x</p>");
}
