//! Hand-written parser for the supported CSS subset.
//!
//! ```text
//! list      := complex ( "," complex )*
//! complex   := compound ( combinator compound )*
//! combinator:= whitespace | ">" | "+" | "~"
//! compound  := [ ident | "*" ] ( "#" ident | "." ident | attribute | pseudo )*
//! attribute := "[" ident [ op ( ident | string ) ] "]"
//! pseudo    := ":first-child" | ":last-child" | ":only-child" | ":nth-child(" n ")"
//! ```

use smallvec::SmallVec;

use super::ast::{
    AttrMatcher, AttrOp, Combinator, ComplexSelector, CompoundSelector, Link, Predicate,
    PseudoClass, SelectorList,
};
use crate::Error;

/// Parse `selector` into a [`SelectorList`].
pub fn parse(selector: &str) -> Result<SelectorList, Error> {
    let mut parser = Parser {
        selector,
        pos: 0,
    };

    parser.skip_whitespace();
    if parser.at_end() {
        return Err(parser.error("empty selector"));
    }

    let head = parser.parse_complex()?;
    let mut rest = Vec::new();
    while parser.eat(',') {
        parser.skip_whitespace();
        rest.push(parser.parse_complex()?);
    }

    if let Some(c) = parser.peek() {
        return Err(parser.error(&format!("unexpected '{c}'")));
    }
    Ok(SelectorList { head, rest })
}

struct Parser<'a> {
    selector: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.selector[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.selector[self.pos..].chars().nth(offset)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.selector.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), Error> {
        if self.eat(expected) {
            return Ok(());
        }
        let found = self
            .peek()
            .map_or_else(|| "end of selector".to_string(), |c| format!("'{c}'"));
        Err(self.error(&format!("expected '{expected}', found {found}")))
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn error(&self, reason: &str) -> Error {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, position: usize, reason: &str) -> Error {
        Error::SelectorSyntax {
            selector: self.selector.to_string(),
            position,
            reason: reason.to_string(),
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, Error> {
        let head = self.parse_compound()?;
        let mut links = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                None | Some(',') => break,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(c) => return Err(self.error(&format!("unexpected '{c}'"))),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            let compound = self.parse_compound()?;
            links.push(Link {
                combinator,
                compound,
            });
        }

        Ok(ComplexSelector { head, links })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, Error> {
        let start = self.pos;
        let mut compound = CompoundSelector::default();
        let mut has_type = false;

        if self.eat('*') {
            has_type = true;
        } else if self.peek().is_some_and(is_ident_start) {
            compound.element = Some(self.parse_ident()?.to_ascii_lowercase());
            has_type = true;
        }

        let mut predicates: SmallVec<[Predicate; 4]> = SmallVec::new();
        loop {
            match self.peek() {
                Some('#') => {
                    let at = self.pos;
                    self.pos += 1;
                    let id = self.parse_ident()?;
                    if predicates.iter().any(|p| matches!(p, Predicate::Id(_))) {
                        return Err(
                            self.error_at(at, "a compound selector may have only one id")
                        );
                    }
                    predicates.push(Predicate::Id(id));
                }
                Some('.') => {
                    self.pos += 1;
                    predicates.push(Predicate::Class(self.parse_ident()?));
                }
                Some('[') => predicates.push(self.parse_attribute()?),
                Some(':') => predicates.push(Predicate::Pseudo(self.parse_pseudo()?)),
                Some('*') => {
                    return Err(self.error("'*' must come first in a compound selector"));
                }
                Some(c) if is_ident_start(c) => {
                    return Err(self.error("a type selector must come first in a compound selector"));
                }
                _ => break,
            }
        }

        if !has_type && predicates.is_empty() {
            let reason = match self.peek() {
                Some(c) => format!("expected a selector, found '{c}'"),
                None => "expected a selector, found end of selector".to_string(),
            };
            return Err(self.error_at(start, &reason));
        }

        compound.predicates = predicates;
        Ok(compound)
    }

    /// An identifier; `\x` takes `x` literally.
    fn parse_ident(&mut self) -> Result<String, Error> {
        let start = self.pos;
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                let Some(escaped) = self.bump() else {
                    return Err(self.error("dangling '\\' at end of selector"));
                };
                ident.push(escaped);
            } else if is_ident_char(c) {
                ident.push(c);
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.error_at(start, "expected an identifier"));
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<Predicate, Error> {
        self.expect('[')?;
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(Predicate::Attribute {
                name,
                matcher: None,
            });
        }

        let op = match (self.peek(), self.peek_at(1)) {
            (Some('='), _) => AttrOp::Equals,
            (Some('~'), Some('=')) => AttrOp::Includes,
            (Some('^'), Some('=')) => AttrOp::Prefix,
            (Some('$'), Some('=')) => AttrOp::Suffix,
            (Some('*'), Some('=')) => AttrOp::Substring,
            (Some('|'), Some('=')) => AttrOp::DashMatch,
            _ => return Err(self.error("expected an attribute operator or ']'")),
        };
        self.pos += if op == AttrOp::Equals { 1 } else { 2 };
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote)?,
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();
        self.expect(']')?;

        Ok(Predicate::Attribute {
            name,
            matcher: Some(AttrMatcher { op, value }),
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String, Error> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => break,
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(self.error_at(start, "unterminated string"))
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, Error> {
        let start = self.pos;
        self.expect(':')?;
        if self.peek() == Some(':') {
            return Err(self.error_at(start, "pseudo-elements are not supported"));
        }
        let name = self.parse_ident()?.to_ascii_lowercase();

        match name.as_str() {
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "nth-child" => {
                self.expect('(')?;
                self.skip_whitespace();
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let index = self.selector[digits_start..self.pos]
                    .parse::<u32>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| {
                        self.error_at(digits_start, "expected a positive integer in :nth-child()")
                    })?;
                self.skip_whitespace();
                self.expect(')')?;
                Ok(PseudoClass::NthChild(index))
            }
            _ => Err(self.error_at(start, &format!("unsupported pseudo-class ':{name}'"))),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
