//! Reversible source rewriting around the HTML5 parser.
//!
//! html5ever implements the HTML5 tree construction algorithm faithfully, which
//! means it drops or rearranges things template authors rely on: `@click=`
//! attribute names, `<x-icon />` self-closing custom tags, `<esi:include>`
//! namespaced tags, and whatever is inside `<script>` blocks. Each
//! [`Transform`] hides one of those from the parser on the way in (`encode`)
//! and restores it on the way out (`decode`).
//!
//! Transforms are stacked in a [`Pipeline`]. Encoding runs front to back and
//! decoding runs back to front, so each transform sees on decode exactly the
//! text shape it produced on encode.

mod at_attributes;
mod doctype;
mod namespaced_tags;
mod opaque_tag;
mod void_tags;

pub use at_attributes::AttributePrefix;
pub use doctype::DefaultDoctype;
pub use namespaced_tags::NamespacedTags;
pub use opaque_tag::OpaqueTag;
pub use void_tags::{CustomVoidTags, VOID_TAG_MARKER};
pub(crate) use void_tags::marker_gap;

use crate::document::LoadOptions;
use crate::{Error, debug};

/// Whether the source a document was loaded from declared a doctype.
///
/// Recorded once at load time. Re-deriving it from serialized text would see
/// the doctype that [`DefaultDoctype`] injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoctypeMode {
    /// No doctype in the original source; parsed as implied HTML5
    #[default]
    Implied,
    /// The original source declared a doctype
    Declared,
}

impl DoctypeMode {
    /// Look for a `<!doctype` declaration (case-insensitive) at the start of
    /// `source`, past any leading whitespace and comments.
    pub fn detect(source: &str) -> Self {
        if doctype::has_leading_doctype(source) {
            DoctypeMode::Declared
        } else {
            DoctypeMode::Implied
        }
    }
}

/// What a piece of text being encoded or decoded represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A whole document, as loaded or saved
    Document,
    /// The markup of a single node or a fragment
    Fragment,
}

/// Per-call information passed to every transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub mode: DoctypeMode,
    pub scope: Scope,
}

impl Context {
    pub fn document(mode: DoctypeMode) -> Self {
        Context {
            mode,
            scope: Scope::Document,
        }
    }

    pub fn fragment(mode: DoctypeMode) -> Self {
        Context {
            mode,
            scope: Scope::Fragment,
        }
    }
}

/// One reversible rewrite of source text.
///
/// `encode` never fails: text without the transform's trigger pattern passes
/// through unchanged. `decode` may fail only when the transform's own state no
/// longer matches the text it is handed.
pub trait Transform {
    /// Short name used in logs and [`Pipeline::names`].
    fn name(&self) -> &'static str;

    /// Rewrite `source` before it reaches the parser.
    fn encode(&mut self, source: &str, cx: &Context) -> String;

    /// Undo [`Transform::encode`] on serialized output.
    fn decode(&self, source: &str, cx: &Context) -> Result<String, Error>;
}

/// An ordered stack of transforms, owned by one document.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("transforms", &self.names())
            .finish()
    }
}

impl Pipeline {
    /// An empty pipeline: encode and decode are the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default stack for `options`.
    pub fn with_defaults(options: &LoadOptions) -> Self {
        let mut pipeline = Self::new();
        pipeline.use_defaults(options);
        pipeline
    }

    /// Append a transform; it encodes after and decodes before everything
    /// already attached.
    pub fn attach(&mut self, transform: impl Transform + 'static) -> &mut Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Remove every transform, dropping their state.
    pub fn reset(&mut self) -> &mut Self {
        self.transforms.clear();
        self
    }

    /// Replace the stack with the default ordering:
    /// attribute prefix, namespaced tags, custom void tags, one opaque-tag
    /// extraction per configured tag, then doctype injection.
    ///
    /// Namespaced tags must be mangled before void-tag normalization looks at
    /// tag names (`<esi:include />` is not a valid tag name until it is
    /// `<esi--include />`), and doctype injection must see the fully rewritten
    /// text.
    pub fn use_defaults(&mut self, options: &LoadOptions) -> &mut Self {
        self.reset();
        self.attach(AttributePrefix::new(
            &options.attribute_prefix,
            &options.attribute_placeholder,
        ));
        self.attach(NamespacedTags);
        self.attach(CustomVoidTags);
        for tag in &options.opaque_tags {
            self.attach(OpaqueTag::new(tag));
        }
        if options.inject_doctype {
            self.attach(DefaultDoctype);
        }
        self
    }

    /// Run every transform's `encode`, first to last.
    pub fn encode(&mut self, source: &str, cx: &Context) -> String {
        let mut text = source.to_string();
        for transform in &mut self.transforms {
            text = transform.encode(&text, cx);
            debug!("encode {}: {} bytes", transform.name(), text.len());
        }
        text
    }

    /// Run every transform's `decode`, last to first, stopping at the first error.
    pub fn decode(&self, source: &str, cx: &Context) -> Result<String, Error> {
        let mut text = source.to_string();
        for transform in self.transforms.iter().rev() {
            text = transform.decode(&text, cx)?;
            debug!("decode {}: {} bytes", transform.name(), text.len());
        }
        Ok(text)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transform names in encode order.
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
pub(crate) fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() {
        return Some(0);
    }
    h.windows(n.len()).position(|w| w.eq_ignore_ascii_case(n))
}
