//! Declared runtime types driving the codec.

use std::fmt;
use std::sync::Arc;

use super::shape::{Dimension, Shape};
use crate::error::{Result, ScriptingError};
use crate::grammar::{Identifier, QualifiedName};

/// The declared type of an argument, output or record element.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueType {
    Real,
    Integer,
    Boolean,
    String,
    TypeName,
    VariableName,
    /// `VariableName[:]`
    VariableNames,
    Enumeration(Arc<EnumerationType>),
    Record(Arc<RecordType>),
}

impl ValueType {
    /// Expand `VariableNames` into `VariableName` with an extra leading axis.
    pub fn normalize(&self, shape: &Shape) -> (ValueType, Shape) {
        match self {
            ValueType::VariableNames => (
                ValueType::VariableName,
                shape.prepend(Dimension::Unbounded),
            ),
            other => (other.clone(), shape.clone()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Real => f.write_str("Real"),
            ValueType::Integer => f.write_str("Integer"),
            ValueType::Boolean => f.write_str("Boolean"),
            ValueType::String => f.write_str("String"),
            ValueType::TypeName => f.write_str("TypeName"),
            ValueType::VariableName => f.write_str("VariableName"),
            ValueType::VariableNames => f.write_str("VariableNames"),
            ValueType::Enumeration(e) => write!(f, "{}", e.name),
            ValueType::Record(r) => write!(f, "{}", r.name),
        }
    }
}

/// An enumeration: members get 1-based ordinals in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumerationType {
    pub name: QualifiedName,
    pub members: Vec<Identifier>,
}

impl EnumerationType {
    pub fn new(name: &str, members: &[&str]) -> Result<Self> {
        Ok(Self {
            name: QualifiedName::parse(name)?,
            members: members
                .iter()
                .map(|m| Identifier::new(*m))
                .collect::<Result<_>>()?,
        })
    }

    /// 1-based ordinal of `member`.
    pub fn ordinal(&self, member: &str) -> Option<usize> {
        self.members.iter().position(|m| m == member).map(|i| i + 1)
    }

    /// Member with the 1-based `ordinal`.
    pub fn member(&self, ordinal: usize) -> Option<&Identifier> {
        ordinal.checked_sub(1).and_then(|i| self.members.get(i))
    }
}

impl From<EnumerationType> for ValueType {
    fn from(e: EnumerationType) -> Self {
        ValueType::Enumeration(Arc::new(e))
    }
}

/// One record element with its own cast rule (type and shape).
#[derive(Clone, Debug, PartialEq)]
pub struct RecordElement {
    pub name: Identifier,
    pub ty: ValueType,
    pub shape: Shape,
}

/// A record: qualified name plus ordered elements.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordType {
    pub name: QualifiedName,
    pub elements: Vec<RecordElement>,
}

impl RecordType {
    pub fn builder(name: &str) -> Result<RecordTypeBuilder> {
        Ok(RecordTypeBuilder {
            record: RecordType {
                name: QualifiedName::parse(name)?,
                elements: Vec::new(),
            },
        })
    }

    pub fn element(&self, name: &str) -> Option<&RecordElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

impl From<RecordType> for ValueType {
    fn from(r: RecordType) -> Self {
        ValueType::Record(Arc::new(r))
    }
}

/// Builds a [`RecordType`] element by element.
pub struct RecordTypeBuilder {
    record: RecordType,
}

impl RecordTypeBuilder {
    pub fn element(mut self, name: &str, ty: ValueType, shape: Shape) -> Result<Self> {
        let name = Identifier::new(name)?;
        if self.record.elements.iter().any(|e| e.name == name) {
            return Err(ScriptingError::InvalidDocument(format!(
                "record '{}' declares '{}' twice",
                self.record.name, name
            )));
        }
        self.record.elements.push(RecordElement { name, ty, shape });
        Ok(self)
    }

    pub fn build(self) -> RecordType {
        self.record
    }

    pub fn build_type(self) -> ValueType {
        self.record.into()
    }
}

/// Declared type and shape of one output.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSchema {
    pub ty: ValueType,
    pub shape: Shape,
}

impl OutputSchema {
    pub fn new(ty: ValueType, shape: Shape) -> Self {
        Self { ty, shape }
    }
}
