//! Identifiers and qualified names.
//!
//! An [`Identifier`] is a single validated segment; a [`QualifiedName`] is a
//! non-empty sequence of them, optionally rooted (written with a leading `.`).
//! Both are immutable once constructed and compare by their written text, so
//! `Identifier::new(id.to_string())` always gives back `id`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Div;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::escape::is_valid_quoted_body;
use crate::error::{Result, ScriptingError};

/// A single Modelica identifier, either plain (`simulate`) or quoted (`'a b'`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if is_valid_identifier(&text) {
            Ok(Self(text))
        } else {
            Err(ScriptingError::InvalidIdentifier(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_quoted(&self) -> bool {
        self.0.starts_with('\'')
    }
}

/// Check `text` against the `IDENT` production.
pub fn is_valid_identifier(text: &str) -> bool {
    if let Some(body) = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return is_valid_quoted_body(body, '\'');
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = ScriptingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = ScriptingError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::new(text).map_err(serde::de::Error::custom)
    }
}

/// A dotted path of identifiers such as `OpenModelica.Scripting.simulate`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    rooted: bool,
    segments: Vec<Identifier>,
}

impl QualifiedName {
    /// Parse a TYPE-SPEC: `['.'] IDENT ('.' IDENT)*`.
    pub fn parse(text: &str) -> Result<Self> {
        let (rooted, body) = match text.strip_prefix('.') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let segments = split_segments(body)
            .ok_or_else(|| ScriptingError::InvalidIdentifier(text.to_string()))?
            .into_iter()
            .map(Identifier::new)
            .collect::<Result<Vec<_>>>()?;
        Self::from_segments(rooted, segments)
            .ok_or_else(|| ScriptingError::InvalidIdentifier(text.to_string()))
    }

    /// Build a name from already validated segments; `None` when `segments` is empty.
    pub fn from_segments(rooted: bool, segments: Vec<Identifier>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { rooted, segments })
        }
    }

    pub fn from_identifier(ident: Identifier) -> Self {
        Self {
            rooted: false,
            segments: vec![ident],
        }
    }

    pub fn segments(&self) -> &[Identifier] {
        &self.segments
    }

    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    /// The trailing identifier.
    pub fn last(&self) -> &Identifier {
        // segments is never empty
        &self.segments[self.segments.len() - 1]
    }

    /// The enclosing name, `None` for a single segment.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            rooted: self.rooted,
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The same segments without the leading `.`.
    pub fn unrooted(&self) -> Self {
        Self {
            rooted: false,
            segments: self.segments.clone(),
        }
    }

    pub fn starts_with(&self, prefix: &QualifiedName) -> bool {
        self.rooted == prefix.rooted && self.segments.starts_with(&prefix.segments)
    }

    /// Segments after `prefix`, if `prefix` is a strict prefix.
    pub fn strip_prefix(&self, prefix: &QualifiedName) -> Option<&[Identifier]> {
        if self.starts_with(prefix) && self.segments.len() > prefix.segments.len() {
            Some(&self.segments[prefix.segments.len()..])
        } else {
            None
        }
    }

    /// Whether `suffix`'s segments form the tail of this name.
    pub fn ends_with(&self, suffix: &QualifiedName) -> bool {
        self.segments.ends_with(&suffix.segments)
    }
}

/// Split on dots outside quoted identifiers; `None` on an unterminated quote.
fn split_segments(text: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '\'' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '\'' => in_quote = true,
            '.' => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_quote {
        return None;
    }
    parts.push(&text[start..]);
    Some(parts)
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        // A rooted name carries an implicit leading empty segment, which sorts first.
        (!self.rooted, &self.segments).cmp(&(!other.rooted, &other.segments))
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooted {
            f.write_str(".")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for QualifiedName {
    type Err = ScriptingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for QualifiedName {
    type Error = ScriptingError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Identifier> for QualifiedName {
    fn from(ident: Identifier) -> Self {
        Self::from_identifier(ident)
    }
}

impl Div<&Identifier> for &QualifiedName {
    type Output = QualifiedName;

    fn div(self, rhs: &Identifier) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.push(rhs.clone());
        QualifiedName {
            rooted: self.rooted,
            segments,
        }
    }
}

impl Div<&QualifiedName> for &QualifiedName {
    type Output = QualifiedName;

    fn div(self, rhs: &QualifiedName) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.extend(rhs.segments.iter().cloned());
        QualifiedName {
            rooted: self.rooted,
            segments,
        }
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// `TypeName` code arguments are plain qualified names.
pub type TypeName = QualifiedName;

/// `VariableName` code arguments are plain qualified names.
pub type VariableName = QualifiedName;
