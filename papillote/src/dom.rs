//! Arena-based HTML tree built by html5ever.
//!
//! This is the tree engine the rest of papillote sits on:
//! - **html5ever** runs the HTML5 tree construction algorithm (error recovery included)
//! - **indextree Arena** stores every node in contiguous memory
//! - **StrTendril** strings share the source buffer via refcounting
//!
//! The engine knows nothing about middleware or selectors. It parses, navigates,
//! reads and writes attributes, and moves nodes around.

use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName, parse_document};
use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use tendril::{StrTendril, TendrilSink};

use crate::{Error, trace};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Returns true for the fixed HTML void-element set (case-insensitive).
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// A parsed HTML tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeData>,

    /// The invisible document node, parent of `<html>` and any top-level comments
    pub document: NodeId,

    /// DOCTYPE name if one was parsed (usually "html")
    pub doctype: Option<StrTendril>,
}

impl Default for Document {
    fn default() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData {
            kind: NodeKind::Document,
            ns: Namespace::Html,
        });
        Document {
            arena,
            document,
            doctype: None,
        }
    }
}

impl Document {
    /// An empty document: just the document node, no doctype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    /// The topmost ancestor of `id` (the document node for attached nodes).
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        id.ancestors(&self.arena).last().unwrap_or(id)
    }

    /// The `<html>` element, if present.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.document)
            .find(|&id| self.get(id).is_element())
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.child_element(self.document_element()?, "body")
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.child_element(self.document_element()?, "head")
    }

    fn child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .find(|&id| self.tag_name(id) == Some(tag))
    }

    /// Element data, or `None` for text, comments and the document node.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id).kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, Error> {
        match &mut self.get_mut(id).kind {
            NodeKind::Element(elem) => Ok(elem),
            _ => Err(Error::precondition("node is not an element")),
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|elem| elem.tag.as_ref())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name).map(|v| v.as_ref())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute. Existing attributes keep their position; new ones go last.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), Error> {
        self.element_mut(id)?
            .attrs
            .insert(name.to_string(), StrTendril::from(value));
        Ok(())
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<StrTendril> {
        match &mut self.get_mut(id).kind {
            NodeKind::Element(elem) => elem.attrs.shift_remove(name),
            _ => None,
        }
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in id.descendants(&self.arena) {
            if let NodeKind::Text(text) = &self.get(node).kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the data of a text or comment node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), Error> {
        match &mut self.get_mut(id).kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => {
                *t = StrTendril::from(text);
                Ok(())
            }
            _ => Err(Error::precondition("node is not a text or comment node")),
        }
    }

    /// Create a detached element in the HTML namespace.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                tag: StrTendril::from(tag),
                attrs: IndexMap::new(),
            }),
            ns: Namespace::Html,
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Text(StrTendril::from(text)),
            ns: Namespace::Html,
        })
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Comment(StrTendril::from(text)),
            ns: Namespace::Html,
        })
    }

    /// Append `child` (detaching it first) as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        child.detach(&mut self.arena);
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|e| Error::precondition(format!("cannot append child: {e}")))
    }

    /// Insert `new_node` (detaching it first) right before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) -> Result<(), Error> {
        if self.parent(sibling).is_none() {
            return Err(Error::precondition(
                "cannot insert before a node that has no parent node",
            ));
        }
        new_node.detach(&mut self.arena);
        sibling
            .checked_insert_before(new_node, &mut self.arena)
            .map_err(|e| Error::precondition(format!("cannot insert node: {e}")))
    }

    /// Detach a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Put `replacement` where `node` is, detaching `node`.
    pub fn replace(&mut self, node: NodeId, replacement: NodeId) -> Result<(), Error> {
        if self.parent(node).is_none() {
            return Err(Error::precondition(
                "cannot replace a node in its parent if there is no parent node",
            ));
        }
        if node == replacement {
            return Ok(());
        }
        self.insert_before(node, replacement)?;
        node.detach(&mut self.arena);
        Ok(())
    }

    /// Deep-copy the subtree at `id` from `other` into this arena, detached.
    pub fn import(&mut self, other: &Document, id: NodeId) -> NodeId {
        let copy = self.arena.new_node(other.get(id).clone());
        for child in other.children(id) {
            let child_copy = self.import(other, child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    /// Walk the subtree below `node`, letting `f` inspect or swap each node.
    ///
    /// `f` returns `Some(id)` to keep going (a different id replaces the visited
    /// node in its parent) or `None` to leave the node alone and skip its subtree.
    pub fn map_recursive<F>(&mut self, node: NodeId, mut f: F) -> Result<(), Error>
    where
        F: FnMut(&mut Document, NodeId) -> Option<NodeId>,
    {
        self.map_children(node, &mut f)
    }

    fn map_children<F>(&mut self, node: NodeId, f: &mut F) -> Result<(), Error>
    where
        F: FnMut(&mut Document, NodeId) -> Option<NodeId>,
    {
        let children: Vec<NodeId> = node.children(&self.arena).collect();
        for child in children {
            let Some(mapped) = f(self, child) else {
                continue;
            };
            if mapped != child {
                self.replace(child, mapped)?;
            }
            self.map_children(mapped, f)?;
        }
        Ok(())
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub ns: Namespace,
}

impl NodeData {
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content (StrTendril is refcounted - cheap to clone)
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

/// Element data (tag + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, lowercase for parsed HTML elements
    pub tag: StrTendril,

    /// Attributes in declaration order. Keys are String (to avoid clippy
    /// mutable_key_type), values are StrTendril.
    pub attrs: IndexMap<String, StrTendril>,
}

/// XML namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Html,
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

/// Parse HTML into an arena-backed [`Document`].
pub fn parse(html: &str) -> Document {
    let sink = ArenaSink::new();
    // html5ever creates subtendrils that share this buffer via refcounting
    let tendril = StrTendril::from(html);
    parse_document(sink, Default::default()).one(tendril)
}

/// A parsed fragment and the nodes its top level produced.
#[derive(Debug)]
pub struct Fragment {
    pub document: Document,
    pub roots: Vec<NodeId>,
}

/// Parse a markup fragment.
///
/// The fragment goes through the full document algorithm, so its top-level
/// nodes end up under the implied `<head>` and `<body>`; those are collected in
/// order. A fragment that spells out its own `<html>` has that as its only root.
pub fn parse_fragment(html: &str) -> Fragment {
    let document = parse(html);
    let explicit_html = starts_with_ignore_ascii_case(skip_doctype(html), "<html");

    let roots = if explicit_html {
        document.document_element().into_iter().collect()
    } else {
        let head = document.head().into_iter().flat_map(|h| document.children(h));
        let body = document.body().into_iter().flat_map(|b| document.children(b));
        head.chain(body).collect()
    };
    Fragment { document, roots }
}

fn starts_with_ignore_ascii_case(text: &str, prefix: &str) -> bool {
    text.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// `html` past leading whitespace and an optional `<!doctype ...>`.
fn skip_doctype(html: &str) -> &str {
    let html = html.trim_start();
    if starts_with_ignore_ascii_case(html, "<!doctype")
        && let Some(end) = html.find('>')
    {
        return html[end + 1..].trim_start();
    }
    html
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation for building the arena
struct ArenaSink {
    arena: RefCell<Arena<NodeData>>,

    /// Document node (parent of `<html>`)
    document: NodeId,

    doctype: RefCell<Option<StrTendril>>,
}

impl ArenaSink {
    fn new() -> Self {
        let Document {
            arena, document, ..
        } = Document::new();

        ArenaSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
        }
    }

    fn new_text(arena: &mut Arena<NodeData>, text: StrTendril) -> NodeId {
        arena.new_node(NodeData {
            kind: NodeKind::Text(text),
            ns: Namespace::Html,
        })
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        Document {
            arena: self.arena.into_inner(),
            document: self.document,
            doctype: self.doctype.into_inner(),
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        // html5ever recovers on its own; keep the message around for debugging
        trace!("html5ever parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        let node = arena[*target].get();

        let local = match &node.kind {
            NodeKind::Element(elem) => LocalName::from(elem.tag.as_ref()),
            _ => LocalName::from(""),
        };

        OwnedElemName(QualName {
            prefix: None,
            ns: html5ever::Namespace::from(node.ns.url()),
            local,
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let tag = StrTendril::from(name.local.as_ref());
        let ns = Namespace::from_url(name.ns.as_ref());

        // First occurrence wins for duplicated attribute names
        let mut attr_map: IndexMap<String, StrTendril> = IndexMap::with_capacity(attrs.len());
        for attr in attrs {
            let key = match &attr.name.prefix {
                Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                None => attr.name.local.to_string(),
            };
            attr_map.entry(key).or_insert(attr.value);
        }

        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                tag,
                attrs: attr_map,
            }),
            ns,
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(text),
            ns: Namespace::Html,
        })
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Processing instructions - create empty comment
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(StrTendril::new()),
            ns: Namespace::Html,
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node, like browsers do
                let last_child = arena[*parent].last_child();
                if let Some(last_child) = last_child
                    && let NodeKind::Text(existing) = &mut arena[last_child].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = Self::new_text(&mut arena, text);
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                let previous = arena[*sibling].previous_sibling();
                if let Some(previous) = previous
                    && let NodeKind::Text(existing) = &mut arena[previous].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = Self::new_text(&mut arena, text);
                sibling.insert_before(text_node, &mut arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents live directly under the <template> element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = &mut arena[*target].get_mut().kind {
            for attr in attrs {
                let key = attr.name.local.to_string();
                elem.attrs.entry(key).or_insert(attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element_child(doc: &Document, id: NodeId) -> NodeId {
        doc.children(id)
            .find(|&c| doc.get(c).is_element())
            .expect("element child")
    }

    #[test]
    fn test_parse_simple_html() {
        let doc = parse("<html><body><p>Hello</p></body></html>");

        let root = doc.document_element().expect("should have <html>");
        assert_eq!(doc.tag_name(root), Some("html"));

        let body = doc.body().expect("should have body");
        let p = first_element_child(&doc, body);
        assert_eq!(doc.tag_name(p), Some("p"));
        assert_eq!(doc.text_content(p), "Hello");
    }

    #[test]
    fn test_attributes_keep_declaration_order() {
        let doc = parse(r#"<div id="one" class="two three" data-x="4"></div>"#);
        let div = first_element_child(&doc, doc.body().unwrap());
        let names: Vec<&str> = doc
            .element(div)
            .unwrap()
            .attrs
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(names, ["id", "class", "data-x"]);
    }

    #[test]
    fn test_parse_doctype() {
        let doc = parse("<!DOCTYPE html><html><body></body></html>");
        assert_eq!(doc.doctype.as_ref().map(|d| d.as_ref()), Some("html"));

        let doc = parse("<html><body></body></html>");
        assert!(doc.doctype.is_none());
    }

    #[test]
    fn test_head_and_body_are_implied() {
        let doc = parse("<p>loose</p>");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_set_and_remove_attributes() {
        let mut doc = parse("<div id=\"one\"></div>");
        let div = first_element_child(&doc, doc.body().unwrap());

        doc.set_attr(div, "class", "x").unwrap();
        assert_eq!(doc.attr(div, "class"), Some("x"));

        assert_eq!(doc.remove_attr(div, "id").as_deref(), Some("one"));
        assert!(!doc.has_attr(div, "id"));

        let text = doc.create_text("hi");
        assert!(doc.set_attr(text, "class", "x").is_err());
    }

    #[test]
    fn test_replace_requires_parent() {
        let mut doc = Document::new();
        let orphan = doc.create_element("div");
        let other = doc.create_element("span");
        let err = doc.replace(orphan, other).unwrap_err();
        assert!(matches!(err, Error::Precondition { .. }));
    }

    #[test]
    fn test_replace_swaps_in_place() {
        let mut doc = parse("<div><em>a</em><b>b</b></div>");
        let div = first_element_child(&doc, doc.body().unwrap());
        let em = first_element_child(&doc, div);
        let strong = doc.create_element("strong");
        doc.replace(em, strong).unwrap();

        let tags: Vec<_> = doc
            .children(div)
            .filter_map(|c| doc.tag_name(c).map(str::to_string))
            .collect();
        assert_eq!(tags, ["strong", "b"]);
        assert!(doc.parent(em).is_none());
    }

    #[test]
    fn test_import_copies_subtree() {
        let source = parse("<ul><li>1</li><li>2</li></ul>");
        let ul = first_element_child(&source, source.body().unwrap());

        let mut target = Document::new();
        let copy = target.import(&source, ul);
        assert_eq!(target.tag_name(copy), Some("ul"));
        assert_eq!(target.children(copy).count(), 2);
        assert_eq!(target.text_content(copy), "12");
        assert!(target.parent(copy).is_none());
    }

    #[test]
    fn test_map_recursive_replaces_and_skips() {
        let mut doc = parse("<div><span>Foo</span><p>Foo <u>Foo</u></p></div>");
        let div = first_element_child(&doc, doc.body().unwrap());

        doc.map_recursive(div, |doc, node| {
            if doc.tag_name(node) == Some("span") {
                return None;
            }
            if let NodeKind::Text(t) = &doc.get(node).kind {
                let replaced = t.replace("Foo", "Bar");
                doc.set_text(node, &replaced).ok()?;
            }
            if doc.tag_name(node) == Some("u") {
                let strong = doc.create_element("strong");
                let text = doc.text_content(node);
                let text = doc.create_text(&text);
                doc.append_child(strong, text).ok()?;
                return Some(strong);
            }
            Some(node)
        })
        .unwrap();

        assert_eq!(doc.text_content(div), "FooBar Bar");
        let p = doc.children(div).nth(1).unwrap();
        assert_eq!(doc.tag_name(doc.children(p).nth(1).unwrap()), Some("strong"));
    }

    #[test]
    fn test_void_elements() {
        for tag in ["br", "img", "input", "meta", "IMG"] {
            assert!(is_void_element(tag), "{tag} should be void");
        }
        for tag in ["div", "html", "p", "something-weird"] {
            assert!(!is_void_element(tag), "{tag} should not be void");
        }
    }

    #[test]
    fn test_fragment_roots() {
        let frag = parse_fragment("Foo<div>Bar</div>Baz");
        assert_eq!(frag.roots.len(), 3);

        let frag = parse_fragment("<input><button></button>");
        let tags: Vec<_> = frag
            .roots
            .iter()
            .map(|&id| frag.document.tag_name(id))
            .collect();
        assert_eq!(tags, [Some("input"), Some("button")]);
    }

    #[test]
    fn test_fragment_with_explicit_html() {
        let frag = parse_fragment("<html lang=\"en\"><p>x</p></html>");
        assert_eq!(frag.roots.len(), 1);
        assert_eq!(frag.document.tag_name(frag.roots[0]), Some("html"));

        let frag = parse_fragment("<!DOCTYPE html>\n<HTML><p>x</p></HTML>");
        assert_eq!(frag.roots.len(), 1);

        let frag = parse_fragment("<!DOCTYPE html><p>x</p>");
        assert_eq!(frag.document.tag_name(frag.roots[0]), Some("p"));
    }
}
