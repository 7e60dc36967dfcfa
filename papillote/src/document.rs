//! The document type: a tree, the pipeline that produced it, and the doctype
//! mode it was loaded with.

use indextree::NodeId;

use crate::dom::{self, Document};
use crate::markup::{inner_markup, outer_markup};
use crate::middleware::{Context, DoctypeMode, Pipeline, Transform};
use crate::serialize::{SerializeOptions, serialize_document, serialize_node};
use crate::xpath::{self, Value};
use crate::{Error, debug, selector};

/// How a document builds its pipeline.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Install the default transforms (default: true).
    pub middleware: bool,
    /// Attribute-name prefix the parser would reject (default: `@`).
    pub attribute_prefix: String,
    /// What the prefix is spelled as while parsing (default: `x-on:`).
    pub attribute_placeholder: String,
    /// Tags whose spans are hidden from the parser, one transform each.
    pub opaque_tags: Vec<String>,
    /// Inject `<!DOCTYPE html>` into sources without one (default: true).
    pub inject_doctype: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            middleware: true,
            attribute_prefix: "@".to_string(),
            attribute_placeholder: "x-on:".to_string(),
            opaque_tags: Vec::new(),
            inject_doctype: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an empty pipeline.
    pub fn without_middleware(mut self) -> Self {
        self.middleware = false;
        self
    }

    pub fn attribute_prefix(mut self, prefix: &str, placeholder: &str) -> Self {
        self.attribute_prefix = prefix.to_string();
        self.attribute_placeholder = placeholder.to_string();
        self
    }

    /// Hide every `<tag>...</tag>` span from the parser.
    pub fn opaque_tag(mut self, tag: &str) -> Self {
        self.opaque_tags.push(tag.to_string());
        self
    }

    pub fn inject_doctype(mut self, inject: bool) -> Self {
        self.inject_doctype = inject;
        self
    }
}

/// Matches of a query, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList(Vec<NodeId>);

impl NodeList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }
}

impl From<Vec<NodeId>> for NodeList {
    fn from(nodes: Vec<NodeId>) -> Self {
        NodeList(nodes)
    }
}

impl IntoIterator for NodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// An HTML document that survives a load/save cycle with template syntax
/// intact.
///
/// ```
/// use papillote::HtmlDocument;
///
/// let source = r#"<ul><li @click="pick(1)">one</li><x-divider /><li>two</li></ul>"#;
/// let doc = HtmlDocument::from_html(source);
///
/// let items = doc.query_selector_all("ul > li").unwrap();
/// assert_eq!(items.len(), 2);
/// assert_eq!(
///     doc.outer_html(items.first().unwrap()).unwrap(),
///     r#"<li @click="pick(1)">one</li>"#
/// );
/// ```
#[derive(Debug)]
pub struct HtmlDocument {
    tree: Document,
    pipeline: Pipeline,
    mode: DoctypeMode,
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlDocument {
    /// An empty document with the default pipeline.
    pub fn new() -> Self {
        Self::with_options(LoadOptions::default())
    }

    pub fn with_options(options: LoadOptions) -> Self {
        let pipeline = if options.middleware {
            Pipeline::with_defaults(&options)
        } else {
            Pipeline::new()
        };
        Self {
            tree: Document::new(),
            pipeline,
            mode: DoctypeMode::default(),
        }
    }

    /// Parse `source` with the default pipeline.
    pub fn from_html(source: &str) -> Self {
        let mut doc = Self::new();
        doc.load_html(source);
        doc
    }

    /// Drop every transform. Loads and saves after this see the raw parser.
    pub fn without_middleware(mut self) -> Self {
        self.pipeline.reset();
        self
    }

    /// Replace the tree with `source`, encoded through the pipeline.
    ///
    /// The doctype mode is taken from `source` itself, before any transform
    /// had a chance to add one.
    pub fn load_html(&mut self, source: &str) -> &mut Self {
        self.mode = DoctypeMode::detect(source);
        let encoded = self.pipeline.encode(source, &Context::document(self.mode));
        debug!(
            "loading document ({:?}): {} bytes, {} after encode",
            self.mode,
            source.len(),
            encoded.len()
        );
        self.tree = dom::parse(&encoded);
        self
    }

    /// Serialize the whole document and decode it through the pipeline.
    pub fn save_html(&self) -> Result<String, Error> {
        self.save_html_with(&SerializeOptions::new())
    }

    /// [`HtmlDocument::save_html`] with explicit engine serializer options.
    pub fn save_html_with(&self, options: &SerializeOptions) -> Result<String, Error> {
        let html = serialize_document(&self.tree, options);
        self.pipeline.decode(&html, &Context::document(self.mode))
    }

    /// Serialize one node with the engine serializer and decode it as a fragment.
    pub fn save_node_html(&self, node: NodeId) -> Result<String, Error> {
        let html = serialize_node(&self.tree, node, &SerializeOptions::new());
        self.pipeline.decode(&html, &Context::fragment(self.mode))
    }

    /// Whether the last loaded source declared a doctype.
    pub fn mode(&self) -> DoctypeMode {
        self.mode
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    /// Append a transform to this document's pipeline.
    pub fn attach(&mut self, transform: impl Transform + 'static) -> &mut Self {
        self.pipeline.attach(transform);
        self
    }

    pub fn tree(&self) -> &Document {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Document {
        &mut self.tree
    }

    /// First element in the document matching `css`.
    pub fn query_selector(&self, css: &str) -> Result<Option<NodeId>, Error> {
        self.query_selector_in(self.tree.document, css)
    }

    /// Every element in the document matching `css`, in document order.
    pub fn query_selector_all(&self, css: &str) -> Result<NodeList, Error> {
        self.query_selector_all_in(self.tree.document, css)
    }

    /// First element strictly inside `node` matching `css`.
    pub fn query_selector_in(&self, node: NodeId, css: &str) -> Result<Option<NodeId>, Error> {
        Ok(self.query_selector_all_in(node, css)?.first())
    }

    /// Every element strictly inside `node` matching `css`.
    pub fn query_selector_all_in(&self, node: NodeId, css: &str) -> Result<NodeList, Error> {
        let expr = selector::compile(css)?;
        xpath::select(&self.tree, node, &expr).map(NodeList::from)
    }

    /// Evaluate a path expression against the document node.
    pub fn xpath(&self, expression: &str) -> Result<NodeList, Error> {
        self.query(self.tree.document, expression)
    }

    /// Evaluate a path expression with `node` as the context node.
    pub fn query(&self, node: NodeId, expression: &str) -> Result<NodeList, Error> {
        xpath::query(&self.tree, node, expression).map(NodeList::from)
    }

    /// Evaluate a path expression to any value type.
    pub fn evaluate(&self, node: NodeId, expression: &str) -> Result<Value, Error> {
        xpath::evaluate(&self.tree, node, expression)
    }

    /// Markup of `node` and its subtree, decoded through the pipeline.
    pub fn outer_html(&self, node: NodeId) -> Result<String, Error> {
        let markup = outer_markup(&self.tree, node, self.mode);
        self.pipeline.decode(&markup, &Context::fragment(self.mode))
    }

    /// Markup of the children of `node`, decoded through the pipeline.
    pub fn inner_html(&self, node: NodeId) -> Result<String, Error> {
        let markup = inner_markup(&self.tree, node, self.mode);
        self.pipeline.decode(&markup, &Context::fragment(self.mode))
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Parse `fragment` through the pipeline and return every root node,
    /// detached, in this document.
    pub fn create_nodes_from_html(&mut self, fragment: &str) -> NodeList {
        let encoded = self
            .pipeline
            .encode(fragment, &Context::fragment(self.mode));
        let parsed = dom::parse_fragment(&encoded);
        parsed
            .roots
            .iter()
            .map(|&root| self.tree.import(&parsed.document, root))
            .collect::<Vec<_>>()
            .into()
    }

    /// Like [`HtmlDocument::create_nodes_from_html`], but the fragment must
    /// have exactly one root node.
    pub fn create_element_from_html(&mut self, fragment: &str) -> Result<NodeId, Error> {
        let nodes = self.create_nodes_from_html(fragment);
        match nodes.as_slice() {
            [root] => Ok(*root),
            roots => Err(Error::precondition(format!(
                "fragment must have exactly one root node, found {}",
                roots.len()
            ))),
        }
    }

    /// Put `replacement` where `node` is. `node` must have a parent.
    pub fn replace(&mut self, node: NodeId, replacement: NodeId) -> Result<(), Error> {
        self.tree.replace(node, replacement)
    }

    /// Walk the subtree below `node`; see [`Document::map_recursive`].
    pub fn map_recursive<F>(&mut self, node: NodeId, f: F) -> Result<(), Error>
    where
        F: FnMut(&mut Document, NodeId) -> Option<NodeId>,
    {
        self.tree.map_recursive(node, f)
    }
}
