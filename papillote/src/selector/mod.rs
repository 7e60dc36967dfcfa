//! CSS selectors, compiled to path expressions.
//!
//! Only the parts of CSS that map cleanly onto the path language are
//! supported: type, universal, `#id`, `.class`, attribute predicates with all
//! six operators, the four combinators, selector lists, and the
//! `:first-child`/`:last-child`/`:only-child`/`:nth-child(n)` pseudo-classes.
//!
//! ```
//! use papillote::compile_selector;
//!
//! assert_eq!(
//!     compile_selector("head > title").unwrap(),
//!     "descendant::head/child::title"
//! );
//! ```

pub mod ast;
mod parser;
mod translate;

pub use ast::SelectorList;
pub use parser::parse;
pub use translate::to_xpath;

use crate::xpath::Expr;
use crate::{Error, debug};

/// Parse and translate `css` into a path expression tree.
pub fn compile(css: &str) -> Result<Expr, Error> {
    let list = parse(css)?;
    let expr = to_xpath(&list);
    debug!("compiled selector `{}` to `{}`", css, expr);
    Ok(expr)
}

/// Compile `css` and render the resulting path expression.
pub fn compile_selector(css: &str) -> Result<String, Error> {
    compile(css).map(|expr| expr.to_string())
}
