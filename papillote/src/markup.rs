//! Outer and inner markup of single nodes.
//!
//! This is not the engine serializer. Attributes come out in declaration
//! order, and void elements (built-in ones and custom tags the author wrote
//! self-closing) come out in the style the document was written in.

use indextree::NodeId;

use crate::dom::{Document, NodeKind, is_void_element};
use crate::format::{AttrValue, format_attributes};
use crate::middleware::{DoctypeMode, VOID_TAG_MARKER, marker_gap};
use crate::serialize::{SerializeOptions, serialize_node};

/// Markup for `node` itself and everything below it.
///
/// Void elements render as `<tag attrs>` in [`DoctypeMode::Implied`] documents
/// and as `<tag attrs />` in [`DoctypeMode::Declared`] ones. Elements carrying
/// [`VOID_TAG_MARKER`] count as void; the marker itself is not rendered.
pub fn outer_markup(tree: &Document, node: NodeId, mode: DoctypeMode) -> String {
    let mut out = String::new();
    write_outer(tree, node, mode, &mut out);
    out
}

/// Markup for the children of `node`, in order. Empty for a childless node.
pub fn inner_markup(tree: &Document, node: NodeId, mode: DoctypeMode) -> String {
    let mut out = String::new();
    write_inner(tree, node, mode, &mut out);
    out
}

fn write_inner(tree: &Document, node: NodeId, mode: DoctypeMode, out: &mut String) {
    for child in tree.children(node) {
        write_outer(tree, child, mode, out);
    }
}

fn write_outer(tree: &Document, node: NodeId, mode: DoctypeMode, out: &mut String) {
    let elem = match &tree.get(node).kind {
        NodeKind::Element(elem) => elem,
        NodeKind::Text(text) => {
            out.push_str(text);
            return;
        }
        NodeKind::Document => {
            write_inner(tree, node, mode, out);
            return;
        }
        NodeKind::Comment(_) => {
            out.push_str(&serialize_node(tree, node, &SerializeOptions::new()));
            return;
        }
    };

    let marked_void = elem
        .attrs
        .get(VOID_TAG_MARKER)
        .is_some_and(|v| marker_gap(v).is_some());

    let attrs = elem
        .attrs
        .iter()
        .filter(|(name, _)| !(marked_void && name.as_str() == VOID_TAG_MARKER))
        .map(|(name, value)| (name.as_str(), attr_value(value)));
    let attrs = format_attributes(attrs);

    let tag = &*elem.tag;
    out.push('<');
    out.push_str(tag);
    if !attrs.is_empty() {
        out.push(' ');
        out.push_str(&attrs);
    }

    if marked_void || is_void_element(tag) {
        out.push_str(match mode {
            DoctypeMode::Implied => ">",
            DoctypeMode::Declared => " />",
        });
        return;
    }

    out.push('>');
    write_inner(tree, node, mode, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Empty values are boolean-style attributes and render as the bare name.
fn attr_value(value: &str) -> AttrValue {
    if value.is_empty() {
        AttrValue::Flag(true)
    } else {
        AttrValue::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn first_in_body(doc: &Document) -> NodeId {
        doc.body()
            .and_then(|body| doc.first_child(body))
            .expect("body has a child")
    }

    #[test]
    fn test_void_element_follows_mode() {
        let doc = parse(r#"<input type="text">"#);
        let input = first_in_body(&doc);
        assert_eq!(
            outer_markup(&doc, input, DoctypeMode::Implied),
            r#"<input type="text">"#
        );
        assert_eq!(
            outer_markup(&doc, input, DoctypeMode::Declared),
            r#"<input type="text" />"#
        );
        assert_eq!(inner_markup(&doc, input, DoctypeMode::Implied), "");
    }

    #[test]
    fn test_nested_markup() {
        let doc = parse(r#"<ul lang="en"><li>1</li><li>2</li></ul>"#);
        let ul = first_in_body(&doc);
        assert_eq!(
            outer_markup(&doc, ul, DoctypeMode::Implied),
            r#"<ul lang="en"><li>1</li><li>2</li></ul>"#
        );
        assert_eq!(
            inner_markup(&doc, ul, DoctypeMode::Implied),
            "<li>1</li><li>2</li>"
        );
    }

    #[test]
    fn test_boolean_attributes_render_bare() {
        let doc = parse(r#"<input checked="" disabled value="x">"#);
        let input = first_in_body(&doc);
        assert_eq!(
            outer_markup(&doc, input, DoctypeMode::Implied),
            r#"<input checked disabled value="x">"#
        );
    }

    #[test]
    fn test_text_is_raw_and_comments_kept() {
        let doc = parse("<p>a &amp; b<!-- note --></p>");
        let p = first_in_body(&doc);
        assert_eq!(
            inner_markup(&doc, p, DoctypeMode::Implied),
            "a & b<!-- note -->"
        );
    }

    #[test]
    fn test_marked_custom_void_is_void() {
        let mut doc = parse(r#"<x-icon data-is-void-tag="compact" name="a"></x-icon>"#);
        let icon = first_in_body(&doc);
        doc.set_attr(icon, "size", "2").unwrap();
        assert_eq!(
            outer_markup(&doc, icon, DoctypeMode::Implied),
            r#"<x-icon name="a" size="2">"#
        );
        assert_eq!(
            outer_markup(&doc, icon, DoctypeMode::Declared),
            r#"<x-icon name="a" size="2" />"#
        );
    }

    #[test]
    fn test_unrecognized_marker_value_renders_normally() {
        let doc = parse(r#"<x-icon data-is-void-tag="no"></x-icon>"#);
        let icon = first_in_body(&doc);
        assert_eq!(
            outer_markup(&doc, icon, DoctypeMode::Declared),
            r#"<x-icon data-is-void-tag="no"></x-icon>"#
        );
    }
}
