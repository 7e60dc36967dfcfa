//! Selector AST to path-expression AST.

use super::ast::{
    AttrMatcher, AttrOp, Combinator, ComplexSelector, CompoundSelector, Predicate, PseudoClass,
    SelectorList,
};
use crate::xpath::ast::{Axis, BinaryOp, Expr, NodeTest, Step};

/// Translate a selector list into a relative path expression. Evaluated with
/// a node as context, it selects the matching elements strictly inside it.
pub fn to_xpath(list: &SelectorList) -> Expr {
    list.rest.iter().fold(complex_path(&list.head), |acc, next| {
        Expr::Union(Box::new(acc), Box::new(complex_path(next)))
    })
}

fn complex_path(selector: &ComplexSelector) -> Expr {
    let mut steps = vec![compound_step(Axis::Descendant, &selector.head)];
    for link in &selector.links {
        let step = match link.combinator {
            Combinator::Descendant => compound_step(Axis::Descendant, &link.compound),
            Combinator::Child => compound_step(Axis::Child, &link.compound),
            Combinator::SubsequentSibling => {
                compound_step(Axis::FollowingSibling, &link.compound)
            }
            Combinator::NextSibling => next_sibling_step(&link.compound),
        };
        steps.push(step);
    }
    Expr::Path { steps }
}

fn compound_step(axis: Axis, compound: &CompoundSelector) -> Step {
    let node_test = match &compound.element {
        Some(name) => NodeTest::Name(name.clone()),
        None => NodeTest::Wildcard,
    };
    let mut step = Step::new(axis, node_test);
    step.predicates
        .extend(compound.predicates.iter().map(predicate));
    step
}

/// `following-sibling::*[1][self::name]...`: the type test has to come after
/// the position, or it would pick the first sibling of that type instead.
fn next_sibling_step(compound: &CompoundSelector) -> Step {
    let mut step =
        Step::new(Axis::FollowingSibling, NodeTest::Wildcard).with_predicate(Expr::Number(1.0));
    if let Some(name) = &compound.element {
        step = step.with_predicate(Expr::step(Axis::SelfAxis, NodeTest::Name(name.clone())));
    }
    step.predicates
        .extend(compound.predicates.iter().map(predicate));
    step
}

fn predicate(predicate: &Predicate) -> Expr {
    match predicate {
        Predicate::Id(id) => Expr::binary(
            BinaryOp::Eq,
            Expr::attribute("id"),
            Expr::literal(id.as_str()),
        ),
        Predicate::Class(class) => contains_word("class", class),
        Predicate::Attribute {
            name,
            matcher: None,
        } => Expr::attribute(name),
        Predicate::Attribute {
            name,
            matcher: Some(matcher),
        } => attribute_match(name, matcher),
        Predicate::Pseudo(pseudo) => pseudo_class(*pseudo),
    }
}

/// `contains(concat(' ', normalize-space(@name), ' '), ' word ')`
fn contains_word(name: &str, word: &str) -> Expr {
    Expr::function(
        "contains",
        vec![
            Expr::function(
                "concat",
                vec![
                    Expr::literal(" "),
                    Expr::function("normalize-space", vec![Expr::attribute(name)]),
                    Expr::literal(" "),
                ],
            ),
            Expr::literal(format!(" {word} ")),
        ],
    )
}

fn attribute_match(name: &str, matcher: &AttrMatcher) -> Expr {
    let value = matcher.value.as_str();
    let attr = || Expr::attribute(name);

    // Every operator but `=` and `|=` matches nothing for an empty value
    let never = || Expr::function("false", Vec::new());

    match matcher.op {
        AttrOp::Equals => Expr::binary(BinaryOp::Eq, attr(), Expr::literal(value)),
        AttrOp::Includes => {
            if value.is_empty() || value.chars().any(|c| c.is_ascii_whitespace()) {
                never()
            } else {
                contains_word(name, value)
            }
        }
        AttrOp::Prefix if value.is_empty() => never(),
        AttrOp::Prefix => Expr::function("starts-with", vec![attr(), Expr::literal(value)]),
        AttrOp::Suffix if value.is_empty() => never(),
        AttrOp::Suffix => {
            // substring(@a, string-length(@a) - (len - 1)) = 'value'
            let offset = value.chars().count() - 1;
            let start = Expr::binary(
                BinaryOp::Sub,
                Expr::function("string-length", vec![attr()]),
                Expr::Number(offset as f64),
            );
            Expr::binary(
                BinaryOp::Eq,
                Expr::function("substring", vec![attr(), start]),
                Expr::literal(value),
            )
        }
        AttrOp::Substring if value.is_empty() => never(),
        AttrOp::Substring => Expr::function("contains", vec![attr(), Expr::literal(value)]),
        AttrOp::DashMatch => Expr::binary(
            BinaryOp::Or,
            Expr::binary(BinaryOp::Eq, attr(), Expr::literal(value)),
            Expr::function(
                "starts-with",
                vec![attr(), Expr::literal(format!("{value}-"))],
            ),
        ),
    }
}

fn sibling_count_is(axis: Axis, count: u32) -> Expr {
    Expr::binary(
        BinaryOp::Eq,
        Expr::function("count", vec![Expr::step(axis, NodeTest::Wildcard)]),
        Expr::Number(f64::from(count)),
    )
}

fn pseudo_class(pseudo: PseudoClass) -> Expr {
    match pseudo {
        PseudoClass::FirstChild => sibling_count_is(Axis::PrecedingSibling, 0),
        PseudoClass::LastChild => sibling_count_is(Axis::FollowingSibling, 0),
        PseudoClass::OnlyChild => Expr::binary(
            BinaryOp::And,
            sibling_count_is(Axis::PrecedingSibling, 0),
            sibling_count_is(Axis::FollowingSibling, 0),
        ),
        PseudoClass::NthChild(n) => sibling_count_is(Axis::PrecedingSibling, n - 1),
    }
}
