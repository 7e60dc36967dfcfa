//! Expression evaluation against the arena tree.

use std::collections::HashMap;

use indextree::NodeId;

use super::ast::{Axis, BinaryOp, Expr, NodeTest, Step};
use super::value::{Value, XNode, string_to_number};
use crate::dom::{Document, NodeKind};
use crate::{Error, trace};

/// Evaluation state shared by every sub-expression of one query.
pub struct Evaluator<'a> {
    doc: &'a Document,
    root: NodeId,
    /// Preorder index of every node in the context node's tree
    order: HashMap<NodeId, usize>,
}

#[derive(Clone, Copy)]
struct Context {
    node: XNode,
    position: usize,
    size: usize,
}

impl<'a> Evaluator<'a> {
    /// Prepare to evaluate relative to `context`'s tree.
    pub fn new(doc: &'a Document, context: NodeId) -> Self {
        let root = doc.tree_root(context);
        let order = root
            .descendants(&doc.arena)
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        Self { doc, root, order }
    }

    /// Evaluate `expr` with `context` as the context node.
    pub fn evaluate(&self, expr: &Expr, context: NodeId) -> Result<Value, Error> {
        let cx = Context {
            node: XNode::Node(context),
            position: 1,
            size: 1,
        };
        self.eval(expr, cx)
    }

    fn eval(&self, expr: &Expr, cx: Context) -> Result<Value, Error> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Literal(s) => Ok(Value::String(s.clone())),
            Expr::Negate(inner) => Ok(Value::Number(-self.eval(inner, cx)?.to_number(self.doc))),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, cx),
            Expr::Function { name, args } => self.call(name, args, cx),
            Expr::Path { steps } => {
                let nodes = self.walk(vec![cx.node], steps)?;
                Ok(Value::NodeSet(nodes))
            }
            Expr::RootPath { steps } => {
                let nodes = self.walk(vec![XNode::Node(self.root)], steps)?;
                Ok(Value::NodeSet(nodes))
            }
            Expr::Filter { expr, predicates } => {
                let nodes = self.node_set(expr, cx)?;
                let nodes = self.apply_predicates(nodes, predicates)?;
                Ok(Value::NodeSet(nodes))
            }
            Expr::FilterPath { filter, steps } => {
                let start = self.node_set(filter, cx)?;
                Ok(Value::NodeSet(self.walk(start, steps)?))
            }
            Expr::Union(left, right) => {
                let mut nodes = self.node_set(left, cx)?;
                nodes.extend(self.node_set(right, cx)?);
                self.sort_dedup(&mut nodes);
                Ok(Value::NodeSet(nodes))
            }
        }
    }

    fn node_set(&self, expr: &Expr, cx: Context) -> Result<Vec<XNode>, Error> {
        match self.eval(expr, cx)? {
            Value::NodeSet(nodes) => Ok(nodes),
            _ => Err(Error::evaluation(format!(
                "expression `{expr}` does not evaluate to a node-set"
            ))),
        }
    }

    /// Apply each step to the current node-set in turn.
    fn walk(&self, start: Vec<XNode>, steps: &[Step]) -> Result<Vec<XNode>, Error> {
        let mut current = start;
        for step in steps {
            let mut next = Vec::new();
            for &node in &current {
                let candidates: Vec<XNode> = self
                    .axis(node, step.axis)
                    .into_iter()
                    .filter(|&n| self.matches_test(n, step.axis, &step.node_test))
                    .collect();
                next.extend(self.apply_predicates(candidates, &step.predicates)?);
            }
            self.sort_dedup(&mut next);
            trace!("step {} selected {} nodes", step, next.len());
            current = next;
        }
        Ok(current)
    }

    /// Filter `nodes` (already in axis order) through each predicate in turn.
    fn apply_predicates(
        &self,
        mut nodes: Vec<XNode>,
        predicates: &[Expr],
    ) -> Result<Vec<XNode>, Error> {
        for pred in predicates {
            let size = nodes.len();
            let mut kept = Vec::with_capacity(size);
            for (i, node) in nodes.into_iter().enumerate() {
                let cx = Context {
                    node,
                    position: i + 1,
                    size,
                };
                let keep = match self.eval(pred, cx)? {
                    Value::Number(n) => n == (i + 1) as f64,
                    other => other.to_boolean(),
                };
                if keep {
                    kept.push(node);
                }
            }
            nodes = kept;
        }
        Ok(nodes)
    }

    fn sort_key(&self, node: XNode) -> (usize, usize) {
        match node {
            XNode::Node(id) => (self.order.get(&id).copied().unwrap_or(usize::MAX), 0),
            XNode::Attr { owner, index } => (
                self.order.get(&owner).copied().unwrap_or(usize::MAX),
                index + 1,
            ),
        }
    }

    fn sort_dedup(&self, nodes: &mut Vec<XNode>) {
        nodes.sort_by_key(|&n| self.sort_key(n));
        nodes.dedup();
    }

    /// Nodes along `axis` from `node`, nearest first for reverse axes.
    fn axis(&self, node: XNode, axis: Axis) -> Vec<XNode> {
        let arena = &self.doc.arena;
        let id = match node {
            XNode::Node(id) => id,
            XNode::Attr { owner, .. } => {
                return match axis {
                    Axis::SelfAxis => vec![node],
                    Axis::Parent => vec![XNode::Node(owner)],
                    Axis::Ancestor => wrap(owner.ancestors(arena)),
                    Axis::AncestorOrSelf => {
                        let mut out = vec![node];
                        out.extend(owner.ancestors(arena).map(XNode::Node));
                        out
                    }
                    Axis::Following => {
                        let mut out = wrap(owner.descendants(arena).skip(1));
                        out.extend(self.following(owner));
                        out
                    }
                    Axis::Preceding => self.preceding(owner),
                    _ => Vec::new(),
                };
            }
        };

        match axis {
            Axis::Child => wrap(id.children(arena)),
            Axis::Descendant => wrap(id.descendants(arena).skip(1)),
            Axis::DescendantOrSelf => wrap(id.descendants(arena)),
            Axis::Parent => wrap(self.doc.parent(id).into_iter()),
            Axis::Ancestor => wrap(id.ancestors(arena).skip(1)),
            Axis::AncestorOrSelf => wrap(id.ancestors(arena)),
            Axis::FollowingSibling => wrap(id.following_siblings(arena).skip(1)),
            Axis::PrecedingSibling => wrap(id.preceding_siblings(arena).skip(1)),
            Axis::Following => self.following(id),
            Axis::Preceding => self.preceding(id),
            Axis::SelfAxis => vec![node],
            Axis::Attribute => match self.doc.element(id) {
                Some(elem) => (0..elem.attrs.len())
                    .map(|index| XNode::Attr { owner: id, index })
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    /// Everything after `id` in document order, minus its descendants.
    fn following(&self, id: NodeId) -> Vec<XNode> {
        let arena = &self.doc.arena;
        let mut out = Vec::new();
        // Innermost ancestor first keeps the result in document order
        for ancestor in id.ancestors(arena) {
            for sibling in ancestor.following_siblings(arena).skip(1) {
                out.extend(sibling.descendants(arena).map(XNode::Node));
            }
        }
        out
    }

    /// Everything before `id` in document order, minus its ancestors; nearest first.
    fn preceding(&self, id: NodeId) -> Vec<XNode> {
        let arena = &self.doc.arena;
        let Some(&own) = self.order.get(&id) else {
            return Vec::new();
        };
        let ancestors: Vec<NodeId> = id.ancestors(arena).collect();
        let mut out: Vec<XNode> = self
            .root
            .descendants(arena)
            .filter(|n| self.order.get(n).is_some_and(|&o| o < own) && !ancestors.contains(n))
            .map(XNode::Node)
            .collect();
        out.reverse();
        out
    }

    fn matches_test(&self, node: XNode, axis: Axis, test: &NodeTest) -> bool {
        match node {
            XNode::Attr { .. } => match test {
                NodeTest::Node => true,
                NodeTest::Wildcard => axis == Axis::Attribute,
                NodeTest::Name(name) => {
                    axis == Axis::Attribute && node.name(self.doc).eq_ignore_ascii_case(name)
                }
                NodeTest::Text | NodeTest::Comment => false,
            },
            XNode::Node(id) => {
                let kind = &self.doc.get(id).kind;
                match test {
                    NodeTest::Node => true,
                    NodeTest::Text => matches!(kind, NodeKind::Text(_)),
                    NodeTest::Comment => matches!(kind, NodeKind::Comment(_)),
                    NodeTest::Wildcard => {
                        axis != Axis::Attribute && matches!(kind, NodeKind::Element(_))
                    }
                    NodeTest::Name(name) => {
                        axis != Axis::Attribute
                            && matches!(kind, NodeKind::Element(e) if e.tag.eq_ignore_ascii_case(name))
                    }
                }
            }
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        cx: Context,
    ) -> Result<Value, Error> {
        match op {
            BinaryOp::Or => {
                let b = self.eval(left, cx)?.to_boolean() || self.eval(right, cx)?.to_boolean();
                Ok(Value::Boolean(b))
            }
            BinaryOp::And => {
                let b = self.eval(left, cx)?.to_boolean() && self.eval(right, cx)?.to_boolean();
                Ok(Value::Boolean(b))
            }
            BinaryOp::Eq
            | BinaryOp::Neq
            | BinaryOp::Lt
            | BinaryOp::Lte
            | BinaryOp::Gt
            | BinaryOp::Gte => {
                let l = self.eval(left, cx)?;
                let r = self.eval(right, cx)?;
                Ok(Value::Boolean(self.compare(op, &l, &r)))
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                let l = self.eval(left, cx)?.to_number(self.doc);
                let r = self.eval(right, cx)?.to_number(self.doc);
                Ok(Value::Number(match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    _ => l % r,
                }))
            }
        }
    }

    /// Comparison with node-set existential semantics.
    fn compare(&self, op: BinaryOp, left: &Value, right: &Value) -> bool {
        let doc = self.doc;
        match (left, right) {
            (Value::NodeSet(l), Value::NodeSet(r)) => {
                let rs: Vec<String> = r.iter().map(|n| n.string_value(doc)).collect();
                l.iter().any(|a| {
                    let a = a.string_value(doc);
                    rs.iter().any(|b| {
                        compare_atoms(op, &Value::String(a.clone()), &Value::String(b.clone()), doc)
                    })
                })
            }
            (Value::NodeSet(nodes), other) => match other {
                Value::Boolean(_) => {
                    compare_atoms(op, &Value::Boolean(left.to_boolean()), other, doc)
                }
                _ => nodes
                    .iter()
                    .any(|n| compare_atoms(op, &Value::String(n.string_value(doc)), other, doc)),
            },
            (other, Value::NodeSet(nodes)) => match other {
                Value::Boolean(_) => {
                    compare_atoms(op, other, &Value::Boolean(right.to_boolean()), doc)
                }
                _ => nodes
                    .iter()
                    .any(|n| compare_atoms(op, other, &Value::String(n.string_value(doc)), doc)),
            },
            _ => compare_atoms(op, left, right, doc),
        }
    }

    fn call(&self, name: &str, args: &[Expr], cx: Context) -> Result<Value, Error> {
        let arity = |min: usize, max: usize| -> Result<(), Error> {
            if args.len() < min || args.len() > max {
                Err(Error::evaluation(format!(
                    "function {name}() takes {} arguments, got {}",
                    if min == max {
                        min.to_string()
                    } else if max == usize::MAX {
                        format!("at least {min}")
                    } else {
                        format!("{min} to {max}")
                    },
                    args.len()
                )))
            } else {
                Ok(())
            }
        };
        let doc = self.doc;
        let string_arg = |i: usize| -> Result<String, Error> {
            match args.get(i) {
                Some(arg) => Ok(self.eval(arg, cx)?.to_string_value(doc)),
                None => Ok(cx.node.string_value(doc)),
            }
        };
        let number_arg = |i: usize| -> Result<f64, Error> {
            match args.get(i) {
                Some(arg) => Ok(self.eval(arg, cx)?.to_number(doc)),
                None => Ok(string_to_number(&cx.node.string_value(doc))),
            }
        };

        let value = match name {
            "last" => {
                arity(0, 0)?;
                Value::Number(cx.size as f64)
            }
            "position" => {
                arity(0, 0)?;
                Value::Number(cx.position as f64)
            }
            "count" => {
                arity(1, 1)?;
                Value::Number(self.node_set(&args[0], cx)?.len() as f64)
            }
            "name" | "local-name" => {
                arity(0, 1)?;
                let node = match args.first() {
                    Some(arg) => self.node_set(arg, cx)?.first().copied(),
                    None => Some(cx.node),
                };
                let qualified = node.map(|n| n.name(doc)).unwrap_or_default();
                if name == "local-name" {
                    let local = qualified.rsplit(':').next().unwrap_or_default();
                    Value::String(local.to_string())
                } else {
                    Value::String(qualified)
                }
            }
            "string" => {
                arity(0, 1)?;
                Value::String(string_arg(0)?)
            }
            "concat" => {
                arity(2, usize::MAX)?;
                let mut out = String::new();
                for i in 0..args.len() {
                    out.push_str(&string_arg(i)?);
                }
                Value::String(out)
            }
            "starts-with" => {
                arity(2, 2)?;
                Value::Boolean(string_arg(0)?.starts_with(&string_arg(1)?))
            }
            "ends-with" => {
                arity(2, 2)?;
                Value::Boolean(string_arg(0)?.ends_with(&string_arg(1)?))
            }
            "contains" => {
                arity(2, 2)?;
                Value::Boolean(string_arg(0)?.contains(&string_arg(1)?))
            }
            "substring-before" => {
                arity(2, 2)?;
                let haystack = string_arg(0)?;
                let needle = string_arg(1)?;
                let before = haystack
                    .find(&needle)
                    .map(|i| haystack[..i].to_string())
                    .unwrap_or_default();
                Value::String(before)
            }
            "substring-after" => {
                arity(2, 2)?;
                let haystack = string_arg(0)?;
                let needle = string_arg(1)?;
                let after = haystack
                    .find(&needle)
                    .map(|i| haystack[i + needle.len()..].to_string())
                    .unwrap_or_default();
                Value::String(after)
            }
            "substring" => {
                arity(2, 3)?;
                let s = string_arg(0)?;
                let start = number_arg(1)?;
                let length = if args.len() == 3 {
                    Some(number_arg(2)?)
                } else {
                    None
                };
                Value::String(substring(&s, start, length))
            }
            "string-length" => {
                arity(0, 1)?;
                Value::Number(string_arg(0)?.chars().count() as f64)
            }
            "normalize-space" => {
                arity(0, 1)?;
                let s = string_arg(0)?;
                Value::String(s.split_ascii_whitespace().collect::<Vec<_>>().join(" "))
            }
            "translate" => {
                arity(3, 3)?;
                let s = string_arg(0)?;
                let from: Vec<char> = string_arg(1)?.chars().collect();
                let to: Vec<char> = string_arg(2)?.chars().collect();
                let out = s
                    .chars()
                    .filter_map(|c| match from.iter().position(|&f| f == c) {
                        Some(i) => to.get(i).copied(),
                        None => Some(c),
                    })
                    .collect();
                Value::String(out)
            }
            "boolean" => {
                arity(1, 1)?;
                Value::Boolean(self.eval(&args[0], cx)?.to_boolean())
            }
            "not" => {
                arity(1, 1)?;
                Value::Boolean(!self.eval(&args[0], cx)?.to_boolean())
            }
            "true" => {
                arity(0, 0)?;
                Value::Boolean(true)
            }
            "false" => {
                arity(0, 0)?;
                Value::Boolean(false)
            }
            "number" => {
                arity(0, 1)?;
                Value::Number(number_arg(0)?)
            }
            "sum" => {
                arity(1, 1)?;
                let total = self
                    .node_set(&args[0], cx)?
                    .iter()
                    .map(|n| string_to_number(&n.string_value(doc)))
                    .sum();
                Value::Number(total)
            }
            "floor" => {
                arity(1, 1)?;
                Value::Number(number_arg(0)?.floor())
            }
            "ceiling" => {
                arity(1, 1)?;
                Value::Number(number_arg(0)?.ceil())
            }
            "round" => {
                arity(1, 1)?;
                Value::Number(round_half_up(number_arg(0)?))
            }
            _ => return Err(Error::evaluation(format!("unknown function {name}()"))),
        };
        Ok(value)
    }
}

fn wrap(nodes: impl Iterator<Item = NodeId>) -> Vec<XNode> {
    nodes.map(XNode::Node).collect()
}

fn compare_atoms(op: BinaryOp, left: &Value, right: &Value, doc: &Document) -> bool {
    match op {
        BinaryOp::Eq | BinaryOp::Neq => {
            let equal = match (left, right) {
                (Value::Boolean(_), _) | (_, Value::Boolean(_)) => {
                    left.to_boolean() == right.to_boolean()
                }
                (Value::Number(_), _) | (_, Value::Number(_)) => {
                    left.to_number(doc) == right.to_number(doc)
                }
                _ => left.to_string_value(doc) == right.to_string_value(doc),
            };
            if op == BinaryOp::Eq { equal } else { !equal }
        }
        _ => {
            let l = left.to_number(doc);
            let r = right.to_number(doc);
            match op {
                BinaryOp::Lt => l < r,
                BinaryOp::Lte => l <= r,
                BinaryOp::Gt => l > r,
                _ => l >= r,
            }
        }
    }
}

/// `substring()` with the language's 1-based, rounding semantics.
fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let start = round_half_up(start);
    let end = match length {
        Some(len) => start + round_half_up(len),
        None => f64::INFINITY,
    };
    s.chars()
        .enumerate()
        .filter(|&(i, _)| {
            let pos = (i + 1) as f64;
            pos >= start && pos < end
        })
        .map(|(_, c)| c)
        .collect()
}

fn round_half_up(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() {
        n
    } else {
        (n + 0.5).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;
    use crate::xpath::parser;

    fn eval(html: &str, expr: &str) -> (Document, Value) {
        let doc = parse(html);
        let expr = parser::parse(expr).unwrap();
        let value = Evaluator::new(&doc, doc.document)
            .evaluate(&expr, doc.document)
            .unwrap();
        (doc, value)
    }

    fn texts(doc: &Document, value: &Value) -> Vec<String> {
        value.nodes().iter().map(|&n| doc.text_content(n)).collect()
    }

    #[test]
    fn test_descendants_in_document_order() {
        let (doc, value) = eval(
            "<ul><li>1</li><li>2<ul><li>2.1</li></ul></li><li>3</li></ul>",
            "descendant::li",
        );
        assert_eq!(texts(&doc, &value), ["1", "22.1", "2.1", "3"]);
    }

    #[test]
    fn test_union_sorts_and_dedups() {
        let (doc, value) = eval(
            "<p>a</p><div>b</div><p>c</p>",
            "descendant::p | descendant::div | descendant::p",
        );
        assert_eq!(texts(&doc, &value), ["a", "b", "c"]);
    }

    #[test]
    fn test_positional_predicates() {
        let (doc, value) = eval("<p>a</p><p>b</p><p>c</p>", "descendant::p[2]");
        assert_eq!(texts(&doc, &value), ["b"]);

        let (doc, value) = eval("<p>a</p><p>b</p><p>c</p>", "descendant::p[last()]");
        assert_eq!(texts(&doc, &value), ["c"]);
    }

    #[test]
    fn test_reverse_axis_positions() {
        let (doc, value) = eval(
            "<p>a</p><p>b</p><p id=\"x\">c</p>",
            "descendant::p[@id = 'x']/preceding-sibling::p[1]",
        );
        assert_eq!(texts(&doc, &value), ["b"]);
    }

    #[test]
    fn test_following_sibling_first() {
        let (doc, value) = eval(
            "<h1>t</h1><p>a</p><p>b</p>",
            "descendant::h1/following-sibling::*[1][self::p]",
        );
        assert_eq!(texts(&doc, &value), ["a"]);
    }

    #[test]
    fn test_attribute_values() {
        let (doc, value) = eval("<a href=\"/x\">x</a>", "string(descendant::a/@href)");
        assert_eq!(value.to_string_value(&doc), "/x");
    }

    #[test]
    fn test_string_functions() {
        let (doc, value) = eval(
            "<p class=\"  a   b \"></p>",
            "concat('[', normalize-space(descendant::p/@class), ']')",
        );
        assert_eq!(value.to_string_value(&doc), "[a b]");

        let (doc, value) = eval("<p></p>", "substring('12345', 2, 3)");
        assert_eq!(value.to_string_value(&doc), "234");

        let (doc, value) = eval("<p></p>", "translate('bar', 'abc', 'ABC')");
        assert_eq!(value.to_string_value(&doc), "BAr");
    }

    #[test]
    fn test_node_set_comparisons() {
        let (_, value) = eval("<p>1</p><p>2</p>", "descendant::p = 2");
        assert_eq!(value, Value::Boolean(true));

        let (_, value) = eval("<p>1</p><p>2</p>", "descendant::p > 5");
        assert_eq!(value, Value::Boolean(false));
    }

    #[test]
    fn test_unknown_function_errors() {
        let doc = parse("<p></p>");
        let expr = parser::parse("frobnicate()").unwrap();
        let err = Evaluator::new(&doc, doc.document)
            .evaluate(&expr, doc.document)
            .unwrap_err();
        assert!(matches!(err, Error::PathEvaluation { .. }));
    }

    #[test]
    fn test_union_of_non_node_sets_errors() {
        let doc = parse("<p></p>");
        let expr = parser::parse("1 | descendant::p").unwrap();
        assert!(
            Evaluator::new(&doc, doc.document)
                .evaluate(&expr, doc.document)
                .is_err()
        );
    }
}
