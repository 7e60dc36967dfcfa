//! HTML5 serializer for the arena tree.
//!
//! Follows the HTML5 fragment serialization rules:
//!
//! - Void elements never get end tags
//! - Text content escapes `&`, `<`, `>` and U+00A0
//! - Attribute values escape `&`, `"` and U+00A0 and are always double-quoted
//! - Raw text elements (script, style, ...) are written as-is
//!
//! The output is what the middleware pipeline decodes on save, so it has to be
//! stable: the same tree always serializes to the same bytes.

use crate::dom::{Document, ElementData, NodeKind, is_void_element};
use indextree::NodeId;
use std::fmt::Write;

/// Options for HTML serialization.
#[derive(Clone, Debug, Default)]
pub struct SerializeOptions {
    /// Whether to sort attributes alphabetically (default: false, declaration order).
    pub sort_attributes: bool,
}

impl SerializeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable sorting attributes alphabetically.
    pub fn sort_attributes(mut self) -> Self {
        self.sort_attributes = true;
        self
    }
}

/// Serialize a whole document: doctype, then every top-level node.
pub fn serialize_document(doc: &Document, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, doc, opts);
    ser.write_document();
    out
}

/// Serialize one node (outer form for elements).
pub fn serialize_node(doc: &Document, id: NodeId, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, doc, opts);
    ser.write_node(id, None);
    out
}

/// Raw text elements - content is not escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
];

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

struct Serializer<'a, W: Write> {
    out: &'a mut W,
    doc: &'a Document,
    options: &'a SerializeOptions,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(out: &'a mut W, doc: &'a Document, options: &'a SerializeOptions) -> Self {
        Self { out, doc, options }
    }

    /// Escape text content for normal HTML elements.
    fn write_text_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '<' => self.out.write_str("&lt;"),
                '>' => self.out.write_str("&gt;"),
                '\u{a0}' => self.out.write_str("&nbsp;"),
                _ => self.out.write_char(c),
            };
        }
    }

    /// Escape attribute value (written double-quoted by the caller).
    fn write_attr_value_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '"' => self.out.write_str("&quot;"),
                '\u{a0}' => self.out.write_str("&nbsp;"),
                _ => self.out.write_char(c),
            };
        }
    }

    fn write_attr(&mut self, name: &str, value: &str) {
        let _ = write!(self.out, " {}=\"", name);
        self.write_attr_value_escaped(value);
        let _ = write!(self.out, "\"");
    }

    fn write_document(&mut self) {
        let doc = self.doc;
        if let Some(doctype) = &doc.doctype {
            let _ = write!(self.out, "<!DOCTYPE {}>", doctype);
        }
        self.write_children(doc.document);
    }

    fn write_children(&mut self, id: NodeId) {
        let doc = self.doc;
        let parent_tag = doc.tag_name(id);
        for child in doc.children(id) {
            self.write_node(child, parent_tag);
        }
    }

    fn write_node(&mut self, id: NodeId, parent_tag: Option<&str>) {
        let doc = self.doc;
        match &doc.get(id).kind {
            NodeKind::Document => self.write_children(id),
            NodeKind::Element(elem) => self.write_element(id, elem),
            NodeKind::Text(text) => {
                if parent_tag.is_some_and(is_raw_text_element) {
                    let _ = self.out.write_str(text);
                } else {
                    self.write_text_escaped(text);
                }
            }
            NodeKind::Comment(text) => {
                let _ = write!(self.out, "<!--{}-->", text);
            }
        }
    }

    fn write_element(&mut self, id: NodeId, elem: &ElementData) {
        let tag = elem.tag.as_ref();
        let _ = write!(self.out, "<{}", tag);

        if self.options.sort_attributes {
            let mut attrs: Vec<_> = elem.attrs.iter().collect();
            attrs.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in attrs {
                self.write_attr(name, value);
            }
        } else {
            for (name, value) in &elem.attrs {
                self.write_attr(name, value);
            }
        }

        let _ = write!(self.out, ">");

        if is_void_element(tag) {
            return;
        }

        self.write_children(id);
        let _ = write!(self.out, "</{}>", tag);
    }
}
