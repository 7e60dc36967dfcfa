//! Path-query engine over the arena tree.
//!
//! Covers the parts of XPath 1.0 that selector compilation and hand-written
//! queries need: every axis except `namespace`, name/wildcard/`node()`/`text()`/
//! `comment()` tests, predicates, unions, the usual operators and the core
//! string, number and boolean functions. Variables are not supported.
//!
//! ```
//! use papillote::{dom, xpath};
//!
//! let doc = dom::parse("<ul><li>1</li><li>2</li></ul>");
//! let items = xpath::query(&doc, doc.document, "//li").unwrap();
//! assert_eq!(items.len(), 2);
//! ```

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Expr;
pub use eval::Evaluator;
pub use parser::parse;
pub use value::{Value, XNode};

use indextree::NodeId;

use crate::Error;
use crate::dom::Document;

/// Parse and evaluate `expression` with `context` as the context node.
pub fn evaluate(doc: &Document, context: NodeId, expression: &str) -> Result<Value, Error> {
    let expr = parse(expression)?;
    evaluate_expr(doc, context, &expr)
}

/// Evaluate an already-parsed expression.
pub fn evaluate_expr(doc: &Document, context: NodeId, expr: &Expr) -> Result<Value, Error> {
    Evaluator::new(doc, context).evaluate(expr, context)
}

/// Evaluate `expression` and return the tree nodes it selects, in document
/// order. Attribute items are skipped. A result that is not a node-set is an
/// evaluation error.
pub fn query(doc: &Document, context: NodeId, expression: &str) -> Result<Vec<NodeId>, Error> {
    let expr = parse(expression)?;
    select(doc, context, &expr)
}

/// [`query`] for an already-parsed expression.
pub fn select(doc: &Document, context: NodeId, expr: &Expr) -> Result<Vec<NodeId>, Error> {
    match evaluate_expr(doc, context, expr)? {
        value @ Value::NodeSet(_) => Ok(value.nodes()),
        _ => Err(Error::evaluation(format!(
            "expression `{expr}` does not evaluate to a node-set"
        ))),
    }
}
