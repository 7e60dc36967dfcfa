//! Values produced by evaluating a path expression.

use indextree::NodeId;

use super::ast::format_number;
use crate::dom::{Document, NodeKind};

/// An item in a node-set.
///
/// The tree has no attribute nodes, so attributes are addressed through their
/// owner element and their position in its attribute map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XNode {
    Node(NodeId),
    Attr { owner: NodeId, index: usize },
}

impl XNode {
    /// The tree node, if this item is not an attribute.
    pub fn node_id(self) -> Option<NodeId> {
        match self {
            XNode::Node(id) => Some(id),
            XNode::Attr { .. } => None,
        }
    }

    /// The string-value of this item.
    pub fn string_value(self, doc: &Document) -> String {
        match self {
            XNode::Node(id) => match &doc.get(id).kind {
                NodeKind::Text(text) | NodeKind::Comment(text) => text.to_string(),
                NodeKind::Element(_) | NodeKind::Document => doc.text_content(id),
            },
            XNode::Attr { owner, index } => doc
                .element(owner)
                .and_then(|elem| elem.attrs.get_index(index))
                .map(|(_, value)| value.to_string())
                .unwrap_or_default(),
        }
    }

    /// Element or attribute name; empty for other nodes.
    pub fn name(self, doc: &Document) -> String {
        match self {
            XNode::Node(id) => doc.tag_name(id).unwrap_or_default().to_string(),
            XNode::Attr { owner, index } => doc
                .element(owner)
                .and_then(|elem| elem.attrs.get_index(index))
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
        }
    }
}

/// The four value types of the path language.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Nodes in document order, without duplicates.
    NodeSet(Vec<XNode>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Value {
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::NodeSet(nodes) => !nodes.is_empty(),
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    pub fn to_number(&self, doc: &Document) -> f64 {
        match self {
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            _ => string_to_number(&self.to_string_value(doc)),
        }
    }

    pub fn to_string_value(&self, doc: &Document) -> String {
        match self {
            Value::NodeSet(nodes) => nodes
                .first()
                .map(|n| n.string_value(doc))
                .unwrap_or_default(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
        }
    }

    /// Tree nodes of a node-set, skipping attributes. Other values yield nothing.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Value::NodeSet(nodes) => nodes.iter().filter_map(|n| n.node_id()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Strict number parsing: optional `-`, digits, optional fraction. Anything
/// else (including exponents and `inf`) is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'));
    let digits = s.strip_prefix('-').unwrap_or(s);
    let valid = !digits.is_empty()
        && digits != "."
        && digits.chars().filter(|&c| c == '.').count() <= 1
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.');
    if valid {
        s.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 42 "), 42.0);
        assert_eq!(string_to_number("-1.5"), -1.5);
        assert_eq!(string_to_number(".5"), 0.5);
        assert!(string_to_number("1e3").is_nan());
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("").is_nan());
        assert!(string_to_number(".").is_nan());
    }

    #[test]
    fn test_boolean_conversion() {
        assert!(!Value::NodeSet(vec![]).to_boolean());
        assert!(!Value::Number(f64::NAN).to_boolean());
        assert!(Value::String("false".into()).to_boolean());
        assert!(!Value::String(String::new()).to_boolean());
    }
}
