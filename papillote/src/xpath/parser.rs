//! Recursive descent parser for path expressions.
//!
//! Operator precedence, lowest to highest:
//! `or`, `and`, equality, relational, additive, multiplicative, unary `-`,
//! `|`, then paths and filter expressions.

use super::ast::{Axis, BinaryOp, Expr, NodeTest, Step};
use super::lexer::{Lexer, Spanned, Token};
use crate::Error;

const NODE_TYPES: &[&str] = &["node", "text", "comment"];

/// Parse an expression string into an [`Expr`].
pub fn parse(expression: &str) -> Result<Expr, Error> {
    let tokens = Lexer::new(expression).tokenize()?;
    let mut parser = Parser {
        expression,
        tokens,
        pos: 0,
    };

    if parser.tokens.is_empty() {
        return Err(parser.error("empty expression"));
    }

    let expr = parser.parse_or_expr()?;
    if let Some(token) = parser.peek() {
        let message = format!("unexpected '{token}' after expression");
        return Err(parser.error(&message));
    }
    Ok(expr)
}

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), Error> {
        if self.eat(token) {
            Ok(())
        } else {
            let message = format!("expected '{token}', found {}", self.describe_current());
            Err(self.error(&message))
        }
    }

    fn describe_current(&self) -> String {
        self.peek()
            .map_or_else(|| "end of expression".to_string(), |t| format!("'{t}'"))
    }

    fn error(&self, reason: &str) -> Error {
        let position = self
            .tokens
            .get(self.pos)
            .map_or(self.expression.len(), |t| t.pos);
        Error::PathSyntax {
            expression: self.expression.to_string(),
            position,
            reason: reason.to_string(),
        }
    }

    /// Left-associative run of binary operators at one precedence level.
    fn parse_binary(
        &mut self,
        ops: &[(Token, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, Error>,
    ) -> Result<Expr, Error> {
        let mut left = next(self)?;
        'outer: loop {
            for (token, op) in ops {
                if self.eat(token) {
                    let right = next(self)?;
                    left = Expr::binary(*op, left, right);
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn parse_or_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(&[(Token::Or, BinaryOp::Or)], Self::parse_and_expr)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(&[(Token::And, BinaryOp::And)], Self::parse_equality_expr)
    }

    fn parse_equality_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(
            &[
                (Token::Equal, BinaryOp::Eq),
                (Token::NotEqual, BinaryOp::Neq),
            ],
            Self::parse_relational_expr,
        )
    }

    fn parse_relational_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(
            &[
                (Token::LessThan, BinaryOp::Lt),
                (Token::LessThanEqual, BinaryOp::Lte),
                (Token::GreaterThan, BinaryOp::Gt),
                (Token::GreaterThanEqual, BinaryOp::Gte),
            ],
            Self::parse_additive_expr,
        )
    }

    fn parse_additive_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
            Self::parse_multiplicative_expr,
        )
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(
            &[
                (Token::Star, BinaryOp::Mul),
                (Token::Div, BinaryOp::Div),
                (Token::Mod, BinaryOp::Mod),
            ],
            Self::parse_unary_expr,
        )
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, Error> {
        if self.eat(&Token::Minus) {
            let inner = self.parse_unary_expr()?;
            return Ok(Expr::Negate(Box::new(inner)));
        }
        self.parse_union_expr()
    }

    fn parse_union_expr(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_path_expr()?;
        while self.eat(&Token::Pipe) {
            let right = self.parse_path_expr()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// A name followed by `(` that is not a node type test is a function call.
    fn at_function_call(&self) -> bool {
        matches!(
            (self.peek(), self.peek_at(1)),
            (Some(Token::Name(name)), Some(Token::LeftParen)) if !NODE_TYPES.contains(&name.as_str())
        )
    }

    fn parse_path_expr(&mut self) -> Result<Expr, Error> {
        let starts_filter = self.at_function_call()
            || matches!(
                self.peek(),
                Some(Token::Literal(_) | Token::Number(_) | Token::LeftParen)
            );

        if !starts_filter {
            return self.parse_location_path();
        }

        let primary = self.parse_primary_expr()?;
        let predicates = self.parse_predicates()?;
        let filter = if predicates.is_empty() {
            primary
        } else {
            Expr::Filter {
                expr: Box::new(primary),
                predicates,
            }
        };

        let mut steps = Vec::new();
        if self.eat(&Token::DoubleSlash) {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
        } else if !self.eat(&Token::Slash) {
            return Ok(filter);
        }
        self.parse_relative_path_into(&mut steps)?;
        Ok(Expr::FilterPath {
            filter: Box::new(filter),
            steps,
        })
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, Error> {
        match self.peek().cloned() {
            Some(Token::Literal(value)) => {
                self.pos += 1;
                Ok(Expr::Literal(value))
            }
            Some(Token::Number(value)) => {
                self.pos += 1;
                Ok(Expr::Number(value))
            }
            Some(Token::LeftParen) => {
                self.pos += 1;
                let expr = self.parse_or_expr()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }
            Some(Token::Name(name)) => {
                self.pos += 1;
                self.expect(&Token::LeftParen)?;
                let mut args = Vec::new();
                if !self.check(&Token::RightParen) {
                    args.push(self.parse_or_expr()?);
                    while self.eat(&Token::Comma) {
                        args.push(self.parse_or_expr()?);
                    }
                }
                self.expect(&Token::RightParen)?;
                Ok(Expr::Function { name, args })
            }
            _ => {
                let message = format!("expected expression, found {}", self.describe_current());
                Err(self.error(&message))
            }
        }
    }

    fn parse_location_path(&mut self) -> Result<Expr, Error> {
        if self.eat(&Token::Slash) {
            let mut steps = Vec::new();
            if self.is_step_start() {
                self.parse_relative_path_into(&mut steps)?;
            }
            return Ok(Expr::RootPath { steps });
        }

        if self.eat(&Token::DoubleSlash) {
            let mut steps = vec![Step::new(Axis::DescendantOrSelf, NodeTest::Node)];
            self.parse_relative_path_into(&mut steps)?;
            return Ok(Expr::RootPath { steps });
        }

        if !self.is_step_start() {
            let message = format!("expected expression, found {}", self.describe_current());
            return Err(self.error(&message));
        }

        let mut steps = Vec::new();
        self.parse_relative_path_into(&mut steps)?;
        Ok(Expr::Path { steps })
    }

    fn parse_relative_path_into(&mut self, steps: &mut Vec<Step>) -> Result<(), Error> {
        steps.push(self.parse_step()?);
        loop {
            if self.eat(&Token::DoubleSlash) {
                steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
                steps.push(self.parse_step()?);
            } else if self.eat(&Token::Slash) {
                steps.push(self.parse_step()?);
            } else {
                return Ok(());
            }
        }
    }

    fn is_step_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Dot | Token::DotDot | Token::At | Token::Name(_))
        )
    }

    fn parse_step(&mut self) -> Result<Step, Error> {
        if self.eat(&Token::Dot) {
            return Ok(Step::new(Axis::SelfAxis, NodeTest::Node));
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step::new(Axis::Parent, NodeTest::Node));
        }

        let axis = self.parse_axis_specifier()?;
        let node_test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;
        Ok(Step {
            axis,
            node_test,
            predicates,
        })
    }

    fn parse_axis_specifier(&mut self) -> Result<Axis, Error> {
        if self.eat(&Token::At) {
            return Ok(Axis::Attribute);
        }
        if let (Some(Token::Name(name)), Some(Token::ColonColon)) = (self.peek(), self.peek_at(1))
        {
            let Some(axis) = Axis::parse(name) else {
                let message = format!("unknown axis '{name}'");
                return Err(self.error(&message));
            };
            self.pos += 2;
            return Ok(axis);
        }
        Ok(Axis::Child)
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, Error> {
        let Some(Token::Name(name)) = self.peek().cloned() else {
            let message = format!("expected node test, found {}", self.describe_current());
            return Err(self.error(&message));
        };
        self.pos += 1;

        if NODE_TYPES.contains(&name.as_str()) && self.check(&Token::LeftParen) {
            self.pos += 1;
            self.expect(&Token::RightParen)?;
            return Ok(match name.as_str() {
                "text" => NodeTest::Text,
                "comment" => NodeTest::Comment,
                _ => NodeTest::Node,
            });
        }

        if name == "*" {
            Ok(NodeTest::Wildcard)
        } else {
            Ok(NodeTest::Name(name))
        }
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>, Error> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LeftBracket) {
            predicates.push(self.parse_or_expr()?);
            self.expect(&Token::RightBracket)?;
        }
        Ok(predicates)
    }
}
