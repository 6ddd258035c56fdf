use crate::ast::*;

/// Serializer converts the tree back to markup.
///
/// Output is compact (no added whitespace) so that positions in the
/// serialized text stay predictable for callers that splice into it.
/// Void elements are written as `<tag ... />`.
#[derive(Debug, Default)]
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize(mut self, doc: &Document) -> String {
        self.write_nodes(&doc.children);
        self.output
    }

    pub fn serialize_nodes(mut self, nodes: &[Node]) -> String {
        self.write_nodes(nodes);
        self.output
    }

    fn write_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.write_node(node);
        }
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Text { content } => self.output.push_str(&escape_text(content)),
            Node::Element(el) => self.write_element(el),
        }
    }

    fn write_element(&mut self, el: &Element) {
        self.output.push('<');
        self.output.push_str(&el.tag);
        for attr in &el.attributes {
            self.output.push(' ');
            self.output.push_str(&attr.name);
            self.output.push_str("=\"");
            self.output.push_str(&escape_attr(&attr.value));
            self.output.push('"');
        }

        if el.is_leaf() {
            self.output.push_str(" />");
            return;
        }

        self.output.push('>');
        self.write_nodes(&el.children);
        self.output.push_str("</");
        self.output.push_str(&el.tag);
        self.output.push('>');
    }
}

/// Serialize a whole document to markup.
pub fn serialize(doc: &Document) -> String {
    Serializer::new().serialize(doc)
}

/// Serialize a node list to markup.
pub fn serialize_nodes(nodes: &[Node]) -> String {
    Serializer::new().serialize_nodes(nodes)
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_serialize_roundtrip_shape() {
        let source = r#"<blockquote class="card"><p>a &amp; b</p></blockquote><hr class="x" />"#;
        let doc = parse(source).unwrap();
        assert_eq!(serialize(&doc), source);
    }

    #[test]
    fn test_attribute_escaping() {
        let el = Element::new("a").with_attr("title", "say \"hi\" & 'bye'");
        let out = serialize_nodes(&[el.into()]);
        assert_eq!(out, r#"<a title="say &quot;hi&quot; &amp; &#39;bye&#39;"></a>"#);
        let reparsed = crate::parse_fragment(&out).unwrap();
        assert_eq!(
            reparsed[0].as_element().unwrap().attr("title"),
            Some("say \"hi\" & 'bye'")
        );
    }
}
