//! Document tree.
//!
//! The tree is addressed with integer positions: a text node occupies one
//! position per character, a leaf (void) element occupies one position, and
//! any other element occupies its content plus one position for each of its
//! opening and closing boundaries. Position `0` is the start of the document
//! content.

use crate::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};

/// Elements that never have children.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Element(Element),
    Text { content: String },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Node::Text { content } => content.chars().count(),
            Node::Element(el) => el.size(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Node::Text { content } => content.clone(),
            Node::Element(el) => el.text_content(),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(Node::text(content))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping its original position when it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(&name))
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).value)
    }

    pub fn retain_attrs(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.attributes.retain(|a| keep(&a.name.to_ascii_lowercase()));
    }

    pub fn class(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Whitespace-separated class token match.
    pub fn has_class(&self, class: &str) -> bool {
        self.class().split_whitespace().any(|c| c == class)
    }

    /// Substring match against the raw class attribute.
    pub fn class_contains(&self, needle: &str) -> bool {
        self.class().contains(needle)
    }

    pub fn is_leaf(&self) -> bool {
        is_void_tag(&self.tag)
    }

    pub fn size(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            2 + self.children.iter().map(Node::size).sum::<usize>()
        }
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }
}

/// One step of a resolved path: the element at `index` inside its parent,
/// whose opening boundary sits at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub index: usize,
    pub start: usize,
}

/// A position resolved against the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    /// Enclosing elements, outermost first. Empty means the document root.
    pub path: Vec<PathStep>,
    /// Leaf element starting exactly at `pos` in the deepest container.
    pub leaf_after: Option<PathStep>,
}

impl ResolvedPos {
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn content_size(&self) -> usize {
        self.children.iter().map(Node::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Resolve a position into the chain of elements that contain it.
    pub fn resolve(&self, pos: usize) -> Option<ResolvedPos> {
        if pos > self.content_size() {
            return None;
        }

        let mut path = Vec::new();
        let mut leaf_after = None;
        let mut children: &[Node] = &self.children;
        let mut offset = 0;

        'descend: loop {
            let mut start = offset;
            for (index, child) in children.iter().enumerate() {
                let size = child.size();
                if pos == start {
                    if let Node::Element(el) = child {
                        if el.is_leaf() {
                            leaf_after = Some(PathStep { index, start });
                        }
                    }
                    break 'descend;
                }
                if pos < start + size {
                    match child {
                        Node::Element(el) if !el.is_leaf() => {
                            path.push(PathStep { index, start });
                            children = &el.children;
                            offset = start + 1;
                            continue 'descend;
                        }
                        _ => break 'descend,
                    }
                }
                start += size;
            }
            break;
        }

        Some(ResolvedPos {
            pos,
            path,
            leaf_after,
        })
    }

    /// Element reached by following child indices from the root.
    pub fn element_at(&self, indices: &[usize]) -> Option<&Element> {
        let (first, rest) = indices.split_first()?;
        let mut current = self.children.get(*first)?.as_element()?;
        for index in rest {
            current = current.children.get(*index)?.as_element()?;
        }
        Some(current)
    }

    /// Replace the nodes covering `from..to` with `nodes`.
    ///
    /// Both ends must fall on sibling boundaries inside the same container.
    /// `from == to` inserts at that boundary.
    pub fn replace_range(&mut self, from: usize, to: usize, nodes: Vec<Node>) -> ParseResult<()> {
        if from > to || to > self.content_size() {
            return Err(ParseError::invalid_range(from, to, "out of bounds"));
        }
        let mut pending = Some(nodes);
        if splice_children(&mut self.children, 0, from, to, &mut pending) {
            Ok(())
        } else {
            Err(ParseError::invalid_range(
                from,
                to,
                "range does not cover whole sibling nodes",
            ))
        }
    }

    /// Visit every element with its `(from, to)` span, in document order.
    pub fn for_each_element(&self, mut f: impl FnMut(&Element, usize, usize)) {
        fn walk(children: &[Node], offset: usize, f: &mut dyn FnMut(&Element, usize, usize)) {
            let mut start = offset;
            for child in children {
                let size = child.size();
                if let Node::Element(el) = child {
                    f(el, start, start + size);
                    if !el.is_leaf() {
                        walk(&el.children, start + 1, f);
                    }
                }
                start += size;
            }
        }
        walk(&self.children, 0, &mut f);
    }
}

fn splice_children(
    children: &mut Vec<Node>,
    offset: usize,
    from: usize,
    to: usize,
    pending: &mut Option<Vec<Node>>,
) -> bool {
    let mut boundaries = Vec::with_capacity(children.len() + 1);
    let mut cursor = offset;
    for child in children.iter() {
        boundaries.push(cursor);
        cursor += child.size();
    }
    boundaries.push(cursor);

    let start_index = boundaries.iter().position(|b| *b == from);
    let end_index = boundaries.iter().rposition(|b| *b == to);
    if let (Some(i), Some(j)) = (start_index, end_index) {
        if i <= j {
            let replacement = pending.take().unwrap_or_default();
            children.splice(i..j, replacement);
            return true;
        }
    }

    for (index, child) in children.iter_mut().enumerate() {
        let child_start = boundaries[index];
        let child_end = boundaries[index + 1];
        if from > child_start && to < child_end {
            if let Node::Element(el) = child {
                if !el.is_leaf() {
                    return splice_children(&mut el.children, child_start + 1, from, to, pending);
                }
            }
            return false;
        }
    }

    false
}
