//! HTML documents that come back out the way they went in.
//!
//! papillote wraps an html5ever-built tree with:
//! - **Middleware**: reversible source rewrites that hide template syntax
//!   (`@click=`, `<x-icon />`, `<esi:include>`, script bodies, a missing
//!   doctype) from the parser and restore it on save
//! - **Selectors**: a CSS subset compiled to path expressions
//! - **Path queries**: an XPath 1.0 subset evaluated over the tree
//! - **Markup**: outer/inner HTML of single nodes that the middleware can decode
//!
//! # Example
//!
//! ```rust
//! use papillote::HtmlDocument;
//!
//! let source = r#"<div><button @click="open = true">Open</button><x-icon name="star" /></div>"#;
//! let mut doc = HtmlDocument::from_html(source);
//!
//! let button = doc.query_selector("div > button").unwrap().unwrap();
//! doc.tree_mut().set_attr(button, "class", "primary").unwrap();
//!
//! assert_eq!(
//!     doc.save_html().unwrap(),
//!     r#"<html><head></head><body><div><button @click="open = true" class="primary">Open</button><x-icon name="star" /></div></body></html>"#
//! );
//! ```

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace, warn};

pub mod document;
pub mod dom;
mod error;
pub mod format;
pub mod markup;
pub mod middleware;
pub mod selector;
pub mod serialize;
pub mod xpath;

pub use document::{HtmlDocument, LoadOptions, NodeList};
pub use error::Error;
pub use format::{AttrValue, count_root_nodes, css_classes, format_attribute, format_attributes};
pub use markup::{inner_markup, outer_markup};
pub use middleware::{Context, DoctypeMode, Pipeline, Scope, Transform};
pub use selector::compile_selector;

pub use indextree::NodeId;
pub use tendril::StrTendril;
