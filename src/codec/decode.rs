//! Reply text → typed value.
//!
//! Decoding never guesses: the declared output type and shape decide how each
//! literal is read.

use super::cast::check_rectangular;
use super::schema::{EnumerationType, OutputSchema, RecordType, ValueType};
use super::shape::Shape;
use super::value::{EnumerationValue, RecordValue, Value};
use crate::error::{Result, ScriptingError};
use crate::grammar::{Literal, RecordLiteral, parse_literal};

const REPLY: &str = "reply";

/// Decode a single reply value.
pub fn decode_value(text: &str, ty: &ValueType, shape: &Shape) -> Result<Value> {
    let literal = parse_literal(text)?;
    from_literal(REPLY, literal, ty, shape)
}

/// Decode the reply of a call with the given outputs.
///
/// Zero outputs yield an empty tuple whatever the reply says; several outputs
/// need a tuple literal of matching arity.
pub fn decode_outputs(text: &str, outputs: &[OutputSchema]) -> Result<Value> {
    match outputs {
        [] => Ok(Value::Tuple(Vec::new())),
        [single] => decode_value(text, &single.ty, &single.shape),
        many => {
            let literal = parse_literal(text)?;
            let Literal::Tuple(items) = literal else {
                return Err(ScriptingError::malformed(
                    text,
                    format!("expected a tuple of {} outputs", many.len()),
                ));
            };
            if items.len() != many.len() {
                return Err(ScriptingError::malformed(
                    text,
                    format!("expected {} outputs, got {}", many.len(), items.len()),
                ));
            }
            items
                .into_iter()
                .zip(many)
                .enumerate()
                .map(|(i, (item, schema))| {
                    let label = format!("{}[{}]", REPLY, i + 1);
                    from_literal(&label, item, &schema.ty, &schema.shape)
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Tuple)
        }
    }
}

/// Interpret a parsed literal against a declared type and shape.
pub fn from_literal(label: &str, literal: Literal, ty: &ValueType, shape: &Shape) -> Result<Value> {
    let (ty, shape) = ty.normalize(shape);
    let value = from_shaped(label, literal, &ty, &shape)?;
    if !shape.is_scalar() {
        check_rectangular(label, &value, &shape)?;
    }
    Ok(value)
}

fn from_shaped(label: &str, literal: Literal, ty: &ValueType, shape: &Shape) -> Result<Value> {
    if shape.is_scalar() {
        return from_scalar(label, literal, ty);
    }
    let Literal::Array(items) = literal else {
        return Err(ScriptingError::shape_mismatch(label, shape, literal.kind()));
    };
    let inner = shape.inner();
    items
        .into_iter()
        .map(|item| from_shaped(label, item, ty, &inner))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn from_scalar(label: &str, literal: Literal, ty: &ValueType) -> Result<Value> {
    match (ty, literal) {
        (ValueType::Real, Literal::Real(r)) => Ok(Value::Real(r)),
        (ValueType::Real, Literal::Integer(i)) => Ok(Value::Real(i as f64)),
        (ValueType::Integer, Literal::Integer(i)) => Ok(Value::Integer(i)),
        (ValueType::Boolean, Literal::Boolean(b)) => Ok(Value::Boolean(b)),
        (ValueType::String, Literal::String(s)) => Ok(Value::String(s)),
        (ValueType::TypeName | ValueType::VariableName, Literal::Name(n)) => Ok(Value::Name(n)),
        (ValueType::Enumeration(e), literal) => from_enumeration(label, literal, e),
        (ValueType::Record(r), Literal::Record(record)) => from_record(label, record, r),
        (ty, literal) => Err(ScriptingError::type_mismatch(label, ty, literal.kind())),
    }
}

fn from_enumeration(label: &str, literal: Literal, ty: &EnumerationType) -> Result<Value> {
    let Literal::Name(name) = &literal else {
        return Err(ScriptingError::type_mismatch(label, &ty.name, literal.kind()));
    };
    let member = name.last();
    match ty.ordinal(member.as_str()) {
        Some(ordinal) => Ok(Value::Enumeration(EnumerationValue {
            type_name: ty.name.clone(),
            member: member.clone(),
            ordinal,
        })),
        None => Err(ScriptingError::type_mismatch(label, &ty.name, name)),
    }
}

fn from_record(label: &str, literal: RecordLiteral, ty: &RecordType) -> Result<Value> {
    if !(literal.name == ty.name || ty.name.ends_with(&literal.name)) {
        return Err(ScriptingError::type_mismatch(
            label,
            &ty.name,
            format!("record {}", literal.name),
        ));
    }
    let mut present = literal.elements;
    if let Some((unknown, _)) = present.iter().find(|(k, _)| ty.element(k.as_str()).is_none()) {
        return Err(ScriptingError::UnknownRecordElement {
            record: ty.name.to_string(),
            element: unknown.to_string(),
        });
    }
    let mut record = RecordValue::new(ty.name.clone());
    for element in &ty.elements {
        let Some(index) = present.iter().position(|(k, _)| *k == element.name) else {
            return Err(ScriptingError::MissingRecordElement {
                record: ty.name.to_string(),
                element: element.name.to_string(),
            });
        };
        let (name, literal) = present.remove(index);
        let label = format!("{}.{}", label, name);
        record.insert(name, from_literal(&label, literal, &element.ty, &element.shape)?);
    }
    Ok(Value::Record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::shape::Dimension;
    use crate::grammar::QualifiedName;

    fn record_r() -> ValueType {
        RecordType::builder("R")
            .unwrap()
            .element("a", ValueType::Integer, Shape::scalar())
            .unwrap()
            .element("b", ValueType::String, Shape::scalar())
            .unwrap()
            .build_type()
    }

    #[test]
    fn test_decode_scalars() {
        let s = Shape::scalar();
        assert_eq!(decode_value("5", &ValueType::Real, &s).unwrap(), Value::Real(5.0));
        assert_eq!(decode_value("true\n", &ValueType::Boolean, &s).unwrap(), Value::Boolean(true));
        assert_eq!(
            decode_value("\"a\\\\b\"", &ValueType::String, &s).unwrap(),
            Value::from("a\\b")
        );
        assert_eq!(
            decode_value("Modelica.Blocks", &ValueType::TypeName, &s).unwrap(),
            Value::Name(QualifiedName::parse("Modelica.Blocks").unwrap())
        );
        assert!(matches!(
            decode_value("1.5", &ValueType::Integer, &s),
            Err(ScriptingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_record() {
        let value = decode_value("record R a=5, b=\"z\" end R;", &record_r(), &Shape::scalar())
            .unwrap();
        let expected =
            RecordValue::from_parts("R", [("a", Value::Integer(5)), ("b", Value::from("z"))])
                .unwrap();
        assert_eq!(value, Value::Record(expected));
    }

    #[test]
    fn test_decode_record_is_rigid() {
        assert!(matches!(
            decode_value("record R a=5 end R;", &record_r(), &Shape::scalar()),
            Err(ScriptingError::MissingRecordElement { .. })
        ));
        assert!(matches!(
            decode_value("record R a=5, b=\"\", c=1 end R;", &record_r(), &Shape::scalar()),
            Err(ScriptingError::UnknownRecordElement { .. })
        ));
    }

    #[test]
    fn test_decode_enumeration_by_trailing_identifier() {
        let ty: ValueType = EnumerationType::new("OpenModelica.Scripting.Access", &["hide", "all"])
            .unwrap()
            .into();
        let value = decode_value("OpenModelica.Scripting.Access.all", &ty, &Shape::scalar())
            .unwrap();
        assert_eq!(value.to_string(), "OpenModelica.Scripting.Access.all");
        assert!(decode_value("Access.none", &ty, &Shape::scalar()).is_err());
    }

    #[test]
    fn test_decode_arrays() {
        let shape = Shape::new(vec![Dimension::Unbounded, Dimension::Fixed(2)]);
        let value = decode_value("{{1, 2.5}, {3, 4}}", &ValueType::Real, &shape).unwrap();
        assert_eq!(value, Value::from(vec![vec![1.0, 2.5], vec![3.0, 4.0]]));
        assert!(matches!(
            decode_value("{{1, 2, 3}}", &ValueType::Real, &shape),
            Err(ScriptingError::ShapeMismatch { .. })
        ));
        let names = decode_value("{a, b.c}", &ValueType::VariableNames, &Shape::scalar()).unwrap();
        assert_eq!(names.as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_decode_outputs_by_arity() {
        let none = decode_outputs("anything at all", &[]).unwrap();
        assert_eq!(none, Value::Tuple(vec![]));

        let one = decode_outputs("true", &[OutputSchema::new(ValueType::Boolean, Shape::scalar())]);
        assert_eq!(one.unwrap(), Value::Boolean(true));

        let schema = [
            OutputSchema::new(ValueType::Boolean, Shape::scalar()),
            OutputSchema::new(ValueType::String, Shape::scalar()),
        ];
        assert_eq!(
            decode_outputs("(false, \"msg\")", &schema).unwrap(),
            Value::Tuple(vec![Value::Boolean(false), Value::from("msg")])
        );
        assert!(decode_outputs("(false)", &schema).is_err());
        assert!(decode_outputs("(false, \"a\", 1)", &schema).is_err());
    }
}
