//! Parsed form of a CSS selector.

use facet::Facet;
use smallvec::SmallVec;

/// `a, b, c`: a comma-separated list of complex selectors. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct SelectorList {
    pub head: ComplexSelector,
    pub rest: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Every complex selector in source order.
    pub fn iter(&self) -> impl Iterator<Item = &ComplexSelector> {
        std::iter::once(&self.head).chain(self.rest.iter())
    }
}

/// Compound selectors joined by combinators: `ul > li.active + li`.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ComplexSelector {
    pub head: CompoundSelector,
    pub links: Vec<Link>,
}

/// A combinator and the compound selector to its right.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Link {
    pub combinator: Combinator,
    pub compound: CompoundSelector,
}

/// An optional type selector followed by zero or more predicates:
/// `input[type=text]:first-child`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Facet)]
pub struct CompoundSelector {
    /// Lowercased tag name. `None` for `*` or an omitted type.
    pub element: Option<String>,
    pub predicates: SmallVec<[Predicate; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum Predicate {
    /// `#value`
    Id(String),
    /// `.value`
    Class(String),
    /// `[name]` or `[name op value]`
    Attribute {
        name: String,
        matcher: Option<AttrMatcher>,
    },
    /// `:first-child` and friends
    Pseudo(PseudoClass),
}

/// The `op value` half of an attribute predicate.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct AttrMatcher {
    pub op: AttrOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum AttrOp {
    /// `=`
    Equals,
    /// `~=`: one of the whitespace-separated words
    Includes,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
    /// `|=`: exactly the value, or the value followed by `-`
    DashMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    /// `:nth-child(n)`, 1-based
    NthChild(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum Combinator {
    /// whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}
