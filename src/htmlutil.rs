//! Read-only queries over a parsed HTML tree.
//!
//! Knows nothing about forecasts. Nodes are `markup5ever_rcdom` handles
//! produced by `parse_html`; every function here only borrows them.

use std::default::Default;
use std::io;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

pub const ATTRIBUTE_KEY_CLASS: &str = "class";
pub const ATTRIBUTE_KEY_ID: &str = "id";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a complete HTML document from raw bytes.
pub fn parse_html(bytes: &[u8]) -> io::Result<RcDom> {
    let mut reader = bytes;
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut reader)
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A predicate over a single node. A slice of conditions is a conjunction.
pub type Condition = Box<dyn Fn(&Node) -> bool>;

fn meets_conditions(node: &Node, conditions: &[Condition]) -> bool {
    conditions.iter().all(|c| c(node))
}

pub fn with_class_equal(value: &str) -> Condition {
    let value = value.to_string();
    Box::new(move |n| class_equals(n, &value))
}

/// Matches when the class attribute contains every value as a substring.
pub fn with_class_containing(values: &[&str]) -> Condition {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    Box::new(move |n| values.iter().all(|v| attribute_contains(n, ATTRIBUTE_KEY_CLASS, v)))
}

pub fn with_attribute_equal(key: &str, value: &str) -> Condition {
    let key = key.to_string();
    let value = value.to_string();
    Box::new(move |n| attribute_equals(n, &key, &value))
}

pub fn with_attribute_containing(key: &str, value: &str) -> Condition {
    let key = key.to_string();
    let value = value.to_string();
    Box::new(move |n| attribute_contains(n, &key, &value))
}

/// Matches when the attribute is present, whatever its value.
pub fn with_attribute(key: &str) -> Condition {
    let key = key.to_string();
    Box::new(move |n| attribute(n, &key).is_some())
}

pub fn with_id_equal(value: &str) -> Condition {
    with_attribute_equal(ATTRIBUTE_KEY_ID, value)
}

pub fn class_equals(node: &Node, value: &str) -> bool {
    attribute_equals(node, ATTRIBUTE_KEY_CLASS, value)
}

pub fn class_contains(node: &Node, values: &[&str]) -> bool {
    values
        .iter()
        .all(|v| attribute_contains(node, ATTRIBUTE_KEY_CLASS, v))
}

pub fn attribute_equals(node: &Node, key: &str, value: &str) -> bool {
    attribute(node, key).is_some_and(|v| v == value)
}

pub fn attribute_contains(node: &Node, key: &str, value: &str) -> bool {
    attribute(node, key).is_some_and(|v| v.contains(value))
}

/// Value of the first attribute named `key`, if the node is an element
/// carrying it.
pub fn attribute(node: &Node, key: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// What a `walk` visitor wants to happen next.
#[derive(Debug, PartialEq)]
pub enum Visit<E> {
    Continue,
    /// Halt the walk; `walk` still returns `Ok`.
    Stop,
    /// Halt the walk and return the error.
    Abort(E),
}

/// Pre-order depth-first walk over `root` and all of its descendants.
pub fn walk<E, F>(root: &Handle, mut visitor: F) -> Result<(), E>
where
    F: FnMut(&Handle) -> Visit<E>,
{
    match walk_node(root, &mut visitor) {
        Visit::Abort(err) => Err(err),
        Visit::Continue | Visit::Stop => Ok(()),
    }
}

fn walk_node<E, F>(node: &Handle, visitor: &mut F) -> Visit<E>
where
    F: FnMut(&Handle) -> Visit<E>,
{
    match visitor(node) {
        Visit::Continue => {}
        other => return other,
    }

    for child in node.children.borrow().iter() {
        match walk_node(child, visitor) {
            Visit::Continue => {}
            other => return other,
        }
    }

    Visit::Continue
}

/// Every node (root included) meeting all conditions, in document order.
pub fn find_all(root: &Handle, conditions: &[Condition]) -> Vec<Handle> {
    let mut found = Vec::new();
    let result: Result<(), std::convert::Infallible> = walk(root, |n| {
        if meets_conditions(n, conditions) {
            found.push(n.clone());
        }
        Visit::Continue
    });
    match result {
        Ok(()) => found,
        Err(never) => match never {},
    }
}

/// First node (root included) meeting all conditions.
pub fn find_first(root: &Handle, conditions: &[Condition]) -> Option<Handle> {
    let mut found = None;
    let result: Result<(), std::convert::Infallible> = walk(root, |n| {
        if meets_conditions(n, conditions) {
            found = Some(n.clone());
            return Visit::Stop;
        }
        Visit::Continue
    });
    match result {
        Ok(()) => found,
        Err(never) => match never {},
    }
}

// ---------------------------------------------------------------------------
// Navigation and text
// ---------------------------------------------------------------------------

pub fn is_element(node: &Node) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

pub fn tag_name(node: &Node) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Element children only; whitespace and comment nodes between tags are
/// skipped.
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| is_element(c))
        .cloned()
        .collect()
}

pub fn first_element_child(node: &Handle) -> Option<Handle> {
    node.children.borrow().iter().find(|c| is_element(c)).cloned()
}

pub fn last_element_child(node: &Handle) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .rev()
        .find(|c| is_element(c))
        .cloned()
}

pub fn nth_element_child(node: &Handle, index: usize) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| is_element(c))
        .nth(index)
        .cloned()
}

/// Concatenation of every text node under `node`, in document order.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    let result: Result<(), std::convert::Infallible> = walk(node, |n| {
        if let NodeData::Text { ref contents } = n.data {
            text.push_str(&contents.borrow());
        }
        Visit::Continue
    });
    match result {
        Ok(()) => text,
        Err(never) => match never {},
    }
}
