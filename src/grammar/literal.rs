//! Literal values of the scripting grammar.
//!
//! [`Literal`] is the untyped syntax tree shared by both directions: the codec
//! builds literals from typed values and prints them with [`fmt::Display`], and
//! parses reply text into literals with [`parse_literal`] before interpreting
//! them against a declared schema.

use std::fmt;
use std::ops::Range;

use super::escape::{quote_string, unescape};
use super::identifier::{Identifier, QualifiedName};
use super::lexer::{Token, tokenize};
use crate::error::{Result, ScriptingError};

/// An untyped literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    /// A bare TYPE-SPEC: enumerators, type names and variable names.
    Name(QualifiedName),
    Array(Vec<Literal>),
    /// Multiple outputs of one call: `(a, b)`.
    Tuple(Vec<Literal>),
    Record(RecordLiteral),
}

/// `record Name a=1, b=2 end Name;`
#[derive(Clone, Debug, PartialEq)]
pub struct RecordLiteral {
    pub name: QualifiedName,
    pub elements: Vec<(Identifier, Literal)>,
}

impl Literal {
    /// Short description of the literal's syntactic kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Boolean(_) => "Boolean literal",
            Literal::Integer(_) => "Integer literal",
            Literal::Real(_) => "Real literal",
            Literal::String(_) => "String literal",
            Literal::Name(_) => "name",
            Literal::Array(_) => "array literal",
            Literal::Tuple(_) => "tuple",
            Literal::Record(_) => "record literal",
        }
    }
}

/// Print a Real so that it always reads back as a Real.
pub fn format_real(value: f64) -> String {
    // Debug keeps a trailing `.0` or an exponent, both valid REAL forms.
    format!("{:?}", value)
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Real(r) => f.write_str(&format_real(*r)),
            Literal::String(s) => f.write_str(&quote_string(s)),
            Literal::Name(name) => write!(f, "{}", name),
            Literal::Array(items) => {
                f.write_str("{")?;
                write_list(f, items)?;
                f.write_str("}")
            }
            Literal::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Literal::Record(record) => write!(f, "{}", record),
        }
    }
}

impl fmt::Display for RecordLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}", self.name)?;
        for (i, (name, value)) in self.elements.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        write!(f, " end {};", self.name)
    }
}

/// Parse a complete literal; trailing input is an error.
pub fn parse_literal(source: &str) -> Result<Literal> {
    let tokens = tokenize(source).map_err(|span| {
        ScriptingError::malformed(&source[span], "unrecognized input")
    })?;
    let mut parser = LiteralParser {
        source,
        tokens,
        pos: 0,
    };
    let literal = parser.expression()?;
    if let Some((_, span)) = parser.tokens.get(parser.pos) {
        return Err(ScriptingError::malformed(
            &source[span.start..],
            "unexpected trailing input",
        ));
    }
    Ok(literal)
}

struct LiteralParser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
}

impl<'src> LiteralParser<'src> {
    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn next(&mut self) -> Option<Token<'src>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Text from the current token to the end, for error context.
    fn rest(&self) -> &'src str {
        match self.tokens.get(self.pos) {
            Some((_, span)) => &self.source[span.start..],
            None => "",
        }
    }

    fn error(&self, reason: &str) -> ScriptingError {
        let rest = self.rest();
        let text = if rest.is_empty() { self.source } else { rest };
        ScriptingError::malformed(text, reason)
    }

    fn expect(&mut self, expected: Token<'static>, what: &str) -> Result<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected {}", what)))
        }
    }

    fn expression(&mut self) -> Result<Literal> {
        match self.peek() {
            Some(Token::True) => {
                self.pos += 1;
                Ok(Literal::Boolean(true))
            }
            Some(Token::False) => {
                self.pos += 1;
                Ok(Literal::Boolean(false))
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.number(true)
            }
            Some(Token::UInt(_)) | Some(Token::UReal(_)) => self.number(false),
            Some(Token::Str(text)) => {
                self.pos += 1;
                Ok(Literal::String(unescape(&text[1..text.len() - 1])?))
            }
            Some(Token::LBrace) => {
                self.pos += 1;
                Ok(Literal::Array(self.list(Token::RBrace, "'}'")?))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let mut items = self.list(Token::RParen, "')'")?;
                if items.len() == 1 {
                    // plain parenthesized expression
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::Tuple(items))
                }
            }
            Some(Token::Record) => {
                self.pos += 1;
                self.record()
            }
            Some(Token::Dot) | Some(Token::Ident(_)) | Some(Token::QIdent(_)) => {
                Ok(Literal::Name(self.type_spec()?))
            }
            _ => Err(self.error("expected a literal")),
        }
    }

    fn number(&mut self, negative: bool) -> Result<Literal> {
        let sign = if negative { "-" } else { "" };
        match self.next() {
            Some(Token::UInt(digits)) => {
                let text = format!("{}{}", sign, digits);
                text.parse::<i64>()
                    .map(Literal::Integer)
                    .map_err(|e| ScriptingError::malformed(text.clone(), e.to_string()))
            }
            Some(Token::UReal(digits)) => {
                let text = format!("{}{}", sign, digits);
                text.parse::<f64>()
                    .map(Literal::Real)
                    .map_err(|e| ScriptingError::malformed(text.clone(), e.to_string()))
            }
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.error("expected a number"))
            }
        }
    }

    fn list(&mut self, close: Token<'static>, what: &str) -> Result<Vec<Literal>> {
        let mut items = Vec::new();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(t) if t == close => return Ok(items),
                _ => {
                    self.pos = self.pos.saturating_sub(1);
                    return Err(self.error(&format!("expected ',' or {}", what)));
                }
            }
        }
    }

    fn identifier(&mut self) -> Result<Identifier> {
        match self.next() {
            Some(Token::Ident(text)) | Some(Token::QIdent(text)) => Identifier::new(text),
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.error("expected an identifier"))
            }
        }
    }

    fn type_spec(&mut self) -> Result<QualifiedName> {
        let rooted = self.peek() == Some(Token::Dot);
        if rooted {
            self.pos += 1;
        }
        let mut segments = vec![self.identifier()?];
        while self.peek() == Some(Token::Dot) {
            self.pos += 1;
            segments.push(self.identifier()?);
        }
        QualifiedName::from_segments(rooted, segments).ok_or_else(|| self.error("empty name"))
    }

    fn record(&mut self) -> Result<Literal> {
        let name = self.type_spec()?;
        let mut elements = Vec::new();
        if self.peek() != Some(Token::End) {
            loop {
                let element = self.identifier()?;
                self.expect(Token::Assign, "'='")?;
                let value = self.expression()?;
                elements.push((element, value));
                if self.peek() == Some(Token::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(Token::End, "'end'")?;
        let closing = self.type_spec()?;
        if closing != name {
            return Err(ScriptingError::malformed(
                format!("end {}", closing),
                format!("record '{}' closed with a different name", name),
            ));
        }
        self.expect(Token::Semi, "';'")?;
        Ok(Literal::Record(RecordLiteral { name, elements }))
    }
}
