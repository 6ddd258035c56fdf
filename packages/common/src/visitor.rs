use folio_parser::ast::*;

/// Visitor pattern for traversing the document tree immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_text(&mut self, _content: &str) {
        // Leaf node, no children to walk
    }
}

/// Mutable visitor pattern for transforming the tree
///
/// Similar to Visitor, but provides mutable access to nodes.
/// Use this when you need to modify the tree during traversal.
pub trait VisitorMut: Sized {
    fn visit_document_mut(&mut self, doc: &mut Document) {
        walk_document_mut(self, doc);
    }

    fn visit_nodes_mut(&mut self, nodes: &mut Vec<Node>) {
        walk_nodes_mut(self, nodes);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_text_mut(&mut self, _content: &mut String) {
        // Leaf node, no children to walk
    }
}

// Default walk implementations for immutable visitor

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    for node in &doc.children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Element(element) => visitor.visit_element(element),
        Node::Text { content } => visitor.visit_text(content),
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for child in &element.children {
        visitor.visit_node(child);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_document_mut<V: VisitorMut>(visitor: &mut V, doc: &mut Document) {
    visitor.visit_nodes_mut(&mut doc.children);
}

pub fn walk_nodes_mut<V: VisitorMut>(visitor: &mut V, nodes: &mut Vec<Node>) {
    for node in nodes.iter_mut() {
        match node {
            Node::Element(element) => visitor.visit_element_mut(element),
            Node::Text { content } => visitor.visit_text_mut(content),
        }
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    visitor.visit_nodes_mut(&mut element.children);
}
