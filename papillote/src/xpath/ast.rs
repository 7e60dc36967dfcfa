//! Syntax tree for path expressions.
//!
//! The selector compiler builds these directly and renders them through
//! [`Display`](std::fmt::Display); the parser builds them from text. Rendering
//! always uses the unabbreviated axis syntax (`child::p`, never `p`) and adds
//! parentheses only where precedence requires them, so a rendered expression
//! parses back to the same tree.

use std::fmt;

/// A path-language expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal (`42`, `3.5`).
    Number(f64),

    /// A string literal (`'hello'`).
    Literal(String),

    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary negation (`-x`).
    Negate(Box<Expr>),

    /// `name(args...)`
    Function { name: String, args: Vec<Expr> },

    /// A relative location path (`child::p/child::a`).
    Path { steps: Vec<Step> },

    /// An absolute location path. Empty `steps` is the bare `/`.
    RootPath { steps: Vec<Step> },

    /// A primary expression with predicates (`(a | b)[1]`).
    Filter {
        expr: Box<Expr>,
        predicates: Vec<Expr>,
    },

    /// A filter expression continued by a relative path (`(a | b)/child::c`).
    FilterPath { filter: Box<Expr>, steps: Vec<Step> },

    /// `left | right`
    Union(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn function(name: &str, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.to_string(),
            args,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Relative path made of a single step.
    pub fn step(axis: Axis, node_test: NodeTest) -> Self {
        Expr::Path {
            steps: vec![Step::new(axis, node_test)],
        }
    }

    /// `@name`, spelled out as `attribute::name`.
    pub fn attribute(name: &str) -> Self {
        Expr::step(Axis::Attribute, NodeTest::Name(name.to_string()))
    }

    /// Binding strength used to decide where parentheses go when rendering.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Negate(_) => 7,
            Expr::Union(..) => 8,
            Expr::Path { .. } | Expr::RootPath { .. } | Expr::FilterPath { .. } => 9,
            Expr::Number(_)
            | Expr::Literal(_)
            | Expr::Function { .. }
            | Expr::Filter { .. } => 10,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Literal(s) => write_literal(f, s),
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                left.fmt_operand(f, prec)?;
                write!(f, " {op} ")?;
                right.fmt_operand(f, prec + 1)
            }
            Expr::Negate(inner) => {
                f.write_str("-")?;
                inner.fmt_operand(f, 7)
            }
            Expr::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Path { steps } => write_steps(f, steps),
            Expr::RootPath { steps } => {
                f.write_str("/")?;
                write_steps(f, steps)
            }
            Expr::Filter { expr, predicates } => {
                // Only primaries may carry predicates without parentheses
                if matches!(**expr, Expr::Function { .. }) {
                    write!(f, "{expr}")?;
                } else {
                    write!(f, "({expr})")?;
                }
                for pred in predicates {
                    write!(f, "[{pred}]")?;
                }
                Ok(())
            }
            Expr::FilterPath { filter, steps } => {
                filter.fmt_operand(f, 10)?;
                f.write_str("/")?;
                write_steps(f, steps)
            }
            Expr::Union(left, right) => {
                left.fmt_operand(f, 8)?;
                f.write_str(" | ")?;
                right.fmt_operand(f, 9)
            }
        }
    }
}

fn write_steps(f: &mut fmt::Formatter<'_>, steps: &[Step]) -> fmt::Result {
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            f.write_str("/")?;
        }
        write!(f, "{step}")?;
    }
    Ok(())
}

/// Quote a literal. The grammar has no escapes, so a value holding both quote
/// kinds becomes a `concat()` of pieces.
fn write_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if !s.contains('\'') {
        return write!(f, "'{s}'");
    }
    if !s.contains('"') {
        return write!(f, "\"{s}\"");
    }
    f.write_str("concat(")?;
    for (i, piece) in s.split('\'').enumerate() {
        if i > 0 {
            f.write_str(", \"'\", ")?;
        }
        write!(f, "'{piece}'")?;
    }
    f.write_str(")")
}

/// Render a number the way the path language stringifies it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        // Integral values print without a fractional part; -0 prints as 0
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Neq => 3,
            BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 6,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
        })
    }
}

/// One step of a location path: `axis::test[pred]...`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    pub fn new(axis: Axis, node_test: NodeTest) -> Self {
        Step {
            axis,
            node_test,
            predicates: Vec::new(),
        }
    }

    pub fn with_predicate(mut self, predicate: Expr) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.axis, self.node_test)?;
        for pred in &self.predicates {
            write!(f, "[{pred}]")?;
        }
        Ok(())
    }
}

/// Direction of node selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    Attribute,
    SelfAxis,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Following => "following",
            Axis::Preceding => "preceding",
            Axis::Attribute => "attribute",
            Axis::SelfAxis => "self",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "following" => Axis::Following,
            "preceding" => Axis::Preceding,
            "attribute" => Axis::Attribute,
            "self" => Axis::SelfAxis,
            _ => return None,
        })
    }

    /// Reverse axes number their predicate positions nearest-first.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent
                | Axis::Ancestor
                | Axis::AncestorOrSelf
                | Axis::PrecedingSibling
                | Axis::Preceding
        )
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a step keeps from its axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Nodes of the axis' principal type with this name.
    Name(String),
    /// `*`: any node of the axis' principal type.
    Wildcard,
    /// `node()`
    Node,
    /// `text()`
    Text,
    /// `comment()`
    Comment,
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Name(name) => f.write_str(name),
            NodeTest::Wildcard => f.write_str("*"),
            NodeTest::Node => f.write_str("node()"),
            NodeTest::Text => f.write_str("text()"),
            NodeTest::Comment => f.write_str("comment()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_roundtrip() {
        let axes = [
            Axis::Child,
            Axis::Descendant,
            Axis::DescendantOrSelf,
            Axis::Parent,
            Axis::Ancestor,
            Axis::AncestorOrSelf,
            Axis::FollowingSibling,
            Axis::PrecedingSibling,
            Axis::Following,
            Axis::Preceding,
            Axis::Attribute,
            Axis::SelfAxis,
        ];
        for axis in axes {
            assert_eq!(Axis::parse(axis.as_str()), Some(axis));
        }
        assert_eq!(Axis::parse("children"), None);
    }

    #[test]
    fn test_step_display() {
        let step = Step::new(Axis::Descendant, NodeTest::Name("h1".into())).with_predicate(
            Expr::binary(BinaryOp::Eq, Expr::attribute("id"), Expr::literal("title")),
        );
        assert_eq!(step.to_string(), "descendant::h1[attribute::id = 'title']");
    }

    #[test]
    fn test_literal_quoting() {
        assert_eq!(Expr::literal("a").to_string(), "'a'");
        assert_eq!(Expr::literal("it's").to_string(), "\"it's\"");
        assert_eq!(
            Expr::literal("a'b\"c").to_string(),
            "concat('a', \"'\", 'b\"c')"
        );
    }

    #[test]
    fn test_parentheses_follow_precedence() {
        let or = Expr::binary(BinaryOp::Or, Expr::Number(1.0), Expr::Number(2.0));
        let and = Expr::binary(BinaryOp::And, or.clone(), Expr::Number(3.0));
        assert_eq!(and.to_string(), "(1 or 2) and 3");

        let sub = Expr::binary(
            BinaryOp::Sub,
            Expr::Number(5.0),
            Expr::binary(BinaryOp::Sub, Expr::Number(2.0), Expr::Number(1.0)),
        );
        assert_eq!(sub.to_string(), "5 - (2 - 1)");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
