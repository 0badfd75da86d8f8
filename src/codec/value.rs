//! Runtime values exchanged with the compiler.

use std::fmt;

use ordermap::OrderMap;
use serde::Serialize;

use crate::error::{Result, ScriptingError};
use crate::grammar::{Identifier, QualifiedName};

/// A structured value, either supplied by a caller or decoded from a reply.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Real(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
    /// TypeName / VariableName arguments.
    Name(QualifiedName),
    Enumeration(EnumerationValue),
    Array(Vec<Value>),
    Record(RecordValue),
    /// Outputs of a multi-output function, in declaration order.
    Tuple(Vec<Value>),
}

/// A member of an enumeration, carrying its 1-based ordinal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EnumerationValue {
    pub type_name: QualifiedName,
    pub member: Identifier,
    pub ordinal: usize,
}

impl fmt::Display for EnumerationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.member)
    }
}

/// Ordered element values tagged with the record's qualified name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordValue {
    pub name: QualifiedName,
    pub elements: OrderMap<Identifier, Value>,
}

impl RecordValue {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            elements: OrderMap::new(),
        }
    }

    /// Build a record from `(element, value)` pairs, validating every name.
    pub fn from_parts<I, S>(name: &str, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut record = Self::new(QualifiedName::parse(name)?);
        for (element, value) in elements {
            record.insert(Identifier::new(element.as_ref())?, value);
        }
        Ok(record)
    }

    pub fn insert(&mut self, element: Identifier, value: Value) {
        self.elements.insert(element, value);
    }

    pub fn get(&self, element: &str) -> Option<&Value> {
        self.elements
            .iter()
            .find(|(name, _)| *name == element)
            .map(|(_, value)| value)
    }

    /// Remove an element, failing if the record does not carry it.
    pub fn take(&mut self, element: &str) -> Result<Value> {
        let key = self.elements.keys().find(|name| *name == element).cloned();
        key.and_then(|key| self.elements.remove(&key))
            .ok_or_else(|| ScriptingError::MissingRecordElement {
                record: self.name.to_string(),
                element: element.to_string(),
            })
    }
}

impl Value {
    /// Short description of the value's kind, for error messages.
    pub fn kind(&self) -> String {
        match self {
            Value::Real(_) => "Real".to_string(),
            Value::Integer(_) => "Integer".to_string(),
            Value::Boolean(_) => "Boolean".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Name(_) => "name".to_string(),
            Value::Enumeration(e) => e.type_name.to_string(),
            Value::Array(items) => format!("array of length {}", items.len()),
            Value::Record(r) => format!("record {}", r.name),
            Value::Tuple(items) => format!("tuple of {} values", items.len()),
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Unwrap a record tagged `type_name`.
    ///
    /// The tag may be written relative to the declared name (`R` for `P.R`).
    pub fn into_record(self, type_name: &str) -> Result<RecordValue> {
        let expected = QualifiedName::parse(type_name)?;
        match self {
            Value::Record(record)
                if record.name.ends_with(&expected) || expected.ends_with(&record.name) =>
            {
                Ok(record)
            }
            other => Err(ScriptingError::type_mismatch(
                type_name,
                format!("record {}", type_name),
                other.kind(),
            )),
        }
    }

    /// Ordinal of an enumeration value of `type_name`.
    pub fn into_ordinal(self, type_name: &str) -> Result<usize> {
        match self {
            Value::Enumeration(e) if e.type_name.to_string() == type_name => Ok(e.ordinal),
            other => Err(ScriptingError::type_mismatch(type_name, type_name, other.kind())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(r) => write!(f, "{}", r),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Name(n) => write!(f, "{}", n),
            Value::Enumeration(e) => write!(f, "{}", e),
            Value::Array(items) | Value::Tuple(items) => {
                let open = if matches!(self, Value::Array(_)) { "{" } else { "(" };
                let close = if matches!(self, Value::Array(_)) { "}" } else { ")" };
                f.write_str(open)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(close)
            }
            Value::Record(r) => {
                write!(f, "{}(", r.name)?;
                for (i, (name, value)) in r.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<QualifiedName> for Value {
    fn from(v: QualifiedName) -> Self {
        Value::Name(v)
    }
}

impl From<RecordValue> for Value {
    fn from(v: RecordValue) -> Self {
        Value::Record(v)
    }
}

impl From<EnumerationValue> for Value {
    fn from(v: EnumerationValue) -> Self {
        Value::Enumeration(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
