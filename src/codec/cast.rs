//! Validation of caller-supplied values against declared types and shapes.
//!
//! Every argument passes through [`cast_value`] before a call expression is
//! built, so malformed calls fail here and never reach the channel.

use super::schema::{EnumerationType, RecordType, ValueType};
use super::shape::Shape;
use super::value::{EnumerationValue, RecordValue, Value};
use crate::error::{Result, ScriptingError};
use crate::grammar::{Identifier, QualifiedName};

/// Validate and convert one argument.
///
/// Returns `Ok(None)` when an optional argument was left out.
pub fn cast_value(
    name: &str,
    value: Option<Value>,
    optional: bool,
    ty: &ValueType,
    shape: &Shape,
) -> Result<Option<Value>> {
    let Some(value) = value else {
        return if optional {
            Ok(None)
        } else {
            Err(ScriptingError::MissingRequiredArgument(name.to_string()))
        };
    };
    let (ty, shape) = ty.normalize(shape);
    cast_shaped(name, value, &ty, &shape).map(Some)
}

/// Cast a value that must be present.
pub fn cast_required(name: &str, value: Value, ty: &ValueType, shape: &Shape) -> Result<Value> {
    let (ty, shape) = ty.normalize(shape);
    cast_shaped(name, value, &ty, &shape)
}

fn cast_shaped(name: &str, value: Value, ty: &ValueType, shape: &Shape) -> Result<Value> {
    if shape.is_scalar() {
        return cast_scalar(name, value, ty);
    }
    check_rectangular(name, &value, shape)?;
    cast_array(name, value, ty, shape)
}

fn cast_array(name: &str, value: Value, ty: &ValueType, shape: &Shape) -> Result<Value> {
    if shape.is_scalar() {
        return cast_scalar(name, value, ty);
    }
    let Value::Array(items) = value else {
        return Err(ScriptingError::shape_mismatch(name, shape, value.kind()));
    };
    let inner = shape.inner();
    items
        .into_iter()
        .map(|item| cast_array(name, item, ty, &inner))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

/// Check nesting depth, fixed dimensions, and that siblings along each axis
/// have equal lengths.
pub(crate) fn check_rectangular(name: &str, value: &Value, shape: &Shape) -> Result<()> {
    let mut level: Vec<&Value> = vec![value];
    for (depth, dimension) in shape.dimensions().iter().enumerate() {
        let mut next = Vec::new();
        let mut length = None;
        for item in level {
            let Value::Array(items) = item else {
                return Err(ScriptingError::shape_mismatch(
                    name,
                    shape,
                    format!("{} at depth {}", item.kind(), depth),
                ));
            };
            if !dimension.accepts(items.len()) {
                return Err(ScriptingError::shape_mismatch(
                    name,
                    shape,
                    format!("length {} where {} is declared", items.len(), dimension),
                ));
            }
            match length {
                None => length = Some(items.len()),
                Some(n) if n != items.len() => {
                    return Err(ScriptingError::shape_mismatch(
                        name,
                        shape,
                        format!("ragged array with lengths {} and {}", n, items.len()),
                    ));
                }
                Some(_) => {}
            }
            next.extend(items.iter());
        }
        level = next;
    }
    if level.iter().any(|leaf| matches!(leaf, Value::Array(_))) {
        return Err(ScriptingError::shape_mismatch(
            name,
            shape,
            "an array nested deeper than declared",
        ));
    }
    Ok(())
}

fn cast_scalar(name: &str, value: Value, ty: &ValueType) -> Result<Value> {
    match (ty, value) {
        (ValueType::Real, Value::Real(r)) => Ok(Value::Real(r)),
        (ValueType::Real, Value::Integer(i)) => Ok(Value::Real(i as f64)),
        (ValueType::Integer, Value::Integer(i)) => Ok(Value::Integer(i)),
        (ValueType::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(b)),
        (ValueType::String, Value::String(s)) => Ok(Value::String(s)),
        (ValueType::TypeName | ValueType::VariableName, Value::Name(n)) => Ok(Value::Name(n)),
        (ValueType::TypeName | ValueType::VariableName, Value::String(s)) => {
            QualifiedName::parse(&s)
                .map(Value::Name)
                .map_err(|_| ScriptingError::type_mismatch(name, ty, format!("String {:?}", s)))
        }
        (ValueType::Enumeration(e), value) => cast_enumeration(name, value, e),
        (ValueType::Record(r), Value::Record(record)) => cast_record(name, record, r),
        (ty, value) => Err(ScriptingError::type_mismatch(name, ty, value.kind())),
    }
}

fn cast_enumeration(name: &str, value: Value, ty: &EnumerationType) -> Result<Value> {
    let ordinal = match &value {
        Value::Enumeration(e) if e.type_name == ty.name || ty.name.ends_with(&e.type_name) => {
            Some(e.ordinal)
        }
        Value::Integer(i) => usize::try_from(*i).ok(),
        Value::String(s) => ty.ordinal(s),
        _ => None,
    };
    let member = ordinal.and_then(|o| ty.member(o).map(|m| (o, m.clone())));
    match member {
        Some((ordinal, member)) => Ok(Value::Enumeration(EnumerationValue {
            type_name: ty.name.clone(),
            member,
            ordinal,
        })),
        None => Err(ScriptingError::type_mismatch(name, &ty.name, value.kind())),
    }
}

fn cast_record(name: &str, mut record: RecordValue, ty: &RecordType) -> Result<Value> {
    if !(record.name == ty.name || ty.name.ends_with(&record.name)) {
        return Err(ScriptingError::type_mismatch(
            name,
            &ty.name,
            format!("record {}", record.name),
        ));
    }
    if let Some(unknown) = record.elements.keys().find(|k| ty.element(k.as_str()).is_none()) {
        return Err(ScriptingError::UnknownRecordElement {
            record: ty.name.to_string(),
            element: unknown.to_string(),
        });
    }
    let mut cast = RecordValue::new(ty.name.clone());
    for element in &ty.elements {
        let value = record.take(element.name.as_str()).map_err(|_| {
            ScriptingError::MissingRecordElement {
                record: ty.name.to_string(),
                element: element.name.to_string(),
            }
        })?;
        let label = element_label(name, &element.name);
        cast.insert(
            element.name.clone(),
            cast_required(&label, value, &element.ty, &element.shape)?,
        );
    }
    Ok(Value::Record(cast))
}

fn element_label(argument: &str, element: &Identifier) -> String {
    format!("{}.{}", argument, element)
}
