//! Tokenizer for path expressions.
//!
//! Disambiguation happens here, based on the previous token:
//!
//! - `*` is multiplication when the previous token ends an operand, otherwise
//!   it is the wildcard name test.
//! - `and`, `or`, `div` and `mod` are operators under the same rule, and plain
//!   names otherwise.
//!
//! Whether a name is a function, a node type test or an axis is left to the
//! parser, which can look at the following `(` or `::`.

use std::fmt;

use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    DotDot,
    At,
    Comma,
    ColonColon,
    Slash,
    DoubleSlash,
    Pipe,
    Plus,
    Minus,
    /// Multiplication; the wildcard is `Name("*")`
    Star,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    And,
    Or,
    Mod,
    Div,
    Number(f64),
    Literal(String),
    /// A (possibly prefixed) name, `*`, or `prefix:*`
    Name(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::LeftBracket => f.write_str("["),
            Token::RightBracket => f.write_str("]"),
            Token::Dot => f.write_str("."),
            Token::DotDot => f.write_str(".."),
            Token::At => f.write_str("@"),
            Token::Comma => f.write_str(","),
            Token::ColonColon => f.write_str("::"),
            Token::Slash => f.write_str("/"),
            Token::DoubleSlash => f.write_str("//"),
            Token::Pipe => f.write_str("|"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Equal => f.write_str("="),
            Token::NotEqual => f.write_str("!="),
            Token::LessThan => f.write_str("<"),
            Token::LessThanEqual => f.write_str("<="),
            Token::GreaterThan => f.write_str(">"),
            Token::GreaterThanEqual => f.write_str(">="),
            Token::And => f.write_str("and"),
            Token::Or => f.write_str("or"),
            Token::Mod => f.write_str("mod"),
            Token::Div => f.write_str("div"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Literal(s) => write!(f, "'{s}'"),
            Token::Name(name) => f.write_str(name),
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, Error> {
        let mut tokens: Vec<Spanned> = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                return Ok(tokens);
            }
            let start = self.pos;
            let operand_before = tokens.last().is_some_and(|t| ends_operand(&t.token));
            let token = self.next_token(operand_before)?;
            tokens.push(Spanned { token, pos: start });
        }
    }

    fn next_token(&mut self, operand_before: bool) -> Result<Token, Error> {
        let Some(b) = self.peek_byte() else {
            return Err(self.error("unexpected end of expression"));
        };

        match b {
            b'(' => self.single(Token::LeftParen),
            b')' => self.single(Token::RightParen),
            b'[' => self.single(Token::LeftBracket),
            b']' => self.single(Token::RightBracket),
            b'@' => self.single(Token::At),
            b',' => self.single(Token::Comma),
            b'|' => self.single(Token::Pipe),
            b'+' => self.single(Token::Plus),
            b'-' => self.single(Token::Minus),
            b'=' => self.single(Token::Equal),
            b'*' => {
                self.pos += 1;
                if operand_before {
                    Ok(Token::Star)
                } else {
                    Ok(Token::Name("*".to_string()))
                }
            }
            b'/' => {
                self.pos += 1;
                if self.peek_byte() == Some(b'/') {
                    self.pos += 1;
                    Ok(Token::DoubleSlash)
                } else {
                    Ok(Token::Slash)
                }
            }
            b':' => {
                if self.peek_byte_at(1) == Some(b':') {
                    self.pos += 2;
                    Ok(Token::ColonColon)
                } else {
                    Err(self.error("unexpected ':'"))
                }
            }
            b'!' => {
                if self.peek_byte_at(1) == Some(b'=') {
                    self.pos += 2;
                    Ok(Token::NotEqual)
                } else {
                    Err(self.error("expected '=' after '!'"))
                }
            }
            b'<' => {
                self.pos += 1;
                if self.peek_byte() == Some(b'=') {
                    self.pos += 1;
                    Ok(Token::LessThanEqual)
                } else {
                    Ok(Token::LessThan)
                }
            }
            b'>' => {
                self.pos += 1;
                if self.peek_byte() == Some(b'=') {
                    self.pos += 1;
                    Ok(Token::GreaterThanEqual)
                } else {
                    Ok(Token::GreaterThan)
                }
            }
            b'.' => {
                if self.peek_byte_at(1) == Some(b'.') {
                    self.pos += 2;
                    Ok(Token::DotDot)
                } else if self.peek_byte_at(1).is_some_and(|b| b.is_ascii_digit()) {
                    self.read_number()
                } else {
                    self.pos += 1;
                    Ok(Token::Dot)
                }
            }
            b'"' | b'\'' => self.read_literal(b),
            b'0'..=b'9' => self.read_number(),
            b'$' => Err(self.error("variable references are not supported")),
            _ if is_name_start(b) => Ok(self.read_name(operand_before)),
            _ => {
                let c = self.source[self.pos..].chars().next().unwrap_or('?');
                Err(self.error(&format!("unexpected character '{c}'")))
            }
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, Error> {
        self.pos += 1;
        Ok(token)
    }

    fn read_literal(&mut self, quote: u8) -> Result<Token, Error> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        while let Some(b) = self.peek_byte() {
            if b == quote {
                let value = self.source[content_start..self.pos].to_string();
                self.pos += 1;
                return Ok(Token::Literal(value));
            }
            self.pos += 1;
        }
        self.pos = start;
        Err(self.error("unterminated string literal"))
    }

    fn read_number(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        self.advance_while(|b| b.is_ascii_digit());
        if self.peek_byte() == Some(b'.') && self.peek_byte_at(1) != Some(b'.') {
            self.pos += 1;
            self.advance_while(|b| b.is_ascii_digit());
        }
        self.source[start..self.pos]
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| {
                let mut err = self.error("invalid number");
                if let Error::PathSyntax { position, .. } = &mut err {
                    *position = start;
                }
                err
            })
    }

    fn read_name(&mut self, operand_before: bool) -> Token {
        let start = self.pos;
        self.advance_while(is_name_char);

        // QName or prefix:* (but not the `::` of an axis)
        if self.peek_byte() == Some(b':') && self.peek_byte_at(1) != Some(b':') {
            match self.peek_byte_at(1) {
                Some(b'*') => self.pos += 2,
                Some(b) if is_name_start(b) => {
                    self.pos += 1;
                    self.advance_while(is_name_char);
                }
                _ => {}
            }
        }

        let name = &self.source[start..self.pos];
        if operand_before {
            match name {
                "and" => return Token::And,
                "or" => return Token::Or,
                "div" => return Token::Div,
                "mod" => return Token::Mod,
                _ => {}
            }
        }
        Token::Name(name.to_string())
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance_while<F: Fn(u8) -> bool>(&mut self, pred: F) {
        while self.peek_byte().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }

    fn error(&self, reason: &str) -> Error {
        Error::PathSyntax {
            expression: self.source.to_string(),
            position: self.pos,
            reason: reason.to_string(),
        }
    }
}

/// Tokens after which `*` multiplies and `and`/`or`/`div`/`mod` are operators.
fn ends_operand(token: &Token) -> bool {
    matches!(
        token,
        Token::RightParen
            | Token::RightBracket
            | Token::Dot
            | Token::DotDot
            | Token::Number(_)
            | Token::Literal(_)
            | Token::Name(_)
    )
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}
