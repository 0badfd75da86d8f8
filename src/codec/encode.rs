//! Typed value → literal text.

use super::cast::cast_required;
use super::schema::ValueType;
use super::shape::Shape;
use super::value::Value;
use crate::error::{Result, ScriptingError};
use crate::grammar::{Literal, QualifiedName, RecordLiteral};

/// Cast `value` against the declared type and shape, then print it.
pub fn encode_value(name: &str, value: Value, ty: &ValueType, shape: &Shape) -> Result<String> {
    let value = cast_required(name, value, ty, shape)?;
    Ok(to_literal(name, &value)?.to_string())
}

/// Convert an already cast value to a literal.
///
/// Enumeration members are written with their type's qualified name and
/// records list their elements in the stored (declared) order.
pub fn to_literal(name: &str, value: &Value) -> Result<Literal> {
    Ok(match value {
        Value::Real(r) if !r.is_finite() => {
            return Err(ScriptingError::type_mismatch(name, "finite Real", r));
        }
        Value::Real(r) => Literal::Real(*r),
        Value::Integer(i) => Literal::Integer(*i),
        Value::Boolean(b) => Literal::Boolean(*b),
        Value::String(s) => Literal::String(s.clone()),
        Value::Name(n) => Literal::Name(n.clone()),
        Value::Enumeration(e) => {
            let qualified: QualifiedName = &e.type_name / &e.member;
            Literal::Name(qualified)
        }
        Value::Array(items) => Literal::Array(
            items
                .iter()
                .map(|item| to_literal(name, item))
                .collect::<Result<_>>()?,
        ),
        Value::Tuple(items) => Literal::Tuple(
            items
                .iter()
                .map(|item| to_literal(name, item))
                .collect::<Result<_>>()?,
        ),
        Value::Record(record) => Literal::Record(RecordLiteral {
            name: record.name.clone(),
            elements: record
                .elements
                .iter()
                .map(|(element, value)| Ok((element.clone(), to_literal(name, value)?)))
                .collect::<Result<_>>()?,
        }),
    })
}
