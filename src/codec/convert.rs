//! Conversions between native Rust values and [`Value`].
//!
//! Generated bindings take and return native types; these traits are the
//! bridge. `IntoValue` is fallible so that types whose conversion can fail
//! (e.g. names given as text) share one signature.

use super::value::{EnumerationValue, RecordValue, Value};
use crate::error::{Result, ScriptingError};
use crate::grammar::{Identifier, QualifiedName};

const LABEL: &str = "value";

pub trait IntoValue {
    fn into_value(self) -> Result<Value>;
}

pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// Convert an optional argument, keeping absence.
pub fn optional_value<T: IntoValue>(value: Option<T>) -> Result<Option<Value>> {
    value.map(IntoValue::into_value).transpose()
}

// ============================================================================
// Identity and scalars
// ============================================================================

impl IntoValue for Value {
    fn into_value(self) -> Result<Value> {
        Ok(self)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Real(self))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        value
            .as_real()
            .ok_or_else(|| ScriptingError::type_mismatch(LABEL, "Real", value.kind()))
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Integer(self))
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        value
            .as_integer()
            .ok_or_else(|| ScriptingError::type_mismatch(LABEL, "Integer", value.kind()))
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Boolean(self))
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| ScriptingError::type_mismatch(LABEL, "Boolean", value.kind()))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ScriptingError::type_mismatch(LABEL, "String", other.kind())),
        }
    }
}

impl IntoValue for QualifiedName {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Name(self))
    }
}

impl IntoValue for &QualifiedName {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Name(self.clone()))
    }
}

impl FromValue for QualifiedName {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Name(n) => Ok(n),
            Value::String(s) => QualifiedName::parse(&s),
            other => Err(ScriptingError::type_mismatch(LABEL, "name", other.kind())),
        }
    }
}

impl IntoValue for Identifier {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Name(QualifiedName::from_identifier(self)))
    }
}

impl IntoValue for RecordValue {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Record(self))
    }
}

impl FromValue for RecordValue {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Record(r) => Ok(r),
            other => Err(ScriptingError::type_mismatch(LABEL, "record", other.kind())),
        }
    }
}

impl IntoValue for EnumerationValue {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Enumeration(self))
    }
}

// ============================================================================
// Containers
// ============================================================================

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Result<Value> {
        self.into_iter()
            .map(IntoValue::into_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<T: IntoValue + Clone> IntoValue for &[T] {
    fn into_value(self) -> Result<Value> {
        self.to_vec().into_value()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ScriptingError::type_mismatch(LABEL, "array", other.kind())),
        }
    }
}

/// Functions without outputs decode to an empty tuple.
impl FromValue for () {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Tuple(items) if items.is_empty() => Ok(()),
            other => Err(ScriptingError::type_mismatch(LABEL, "no value", other.kind())),
        }
    }
}

macro_rules! tuple_from_value {
    ($len:expr => $($name:ident),+) => {
        impl<$($name: FromValue),+> FromValue for ($($name,)+) {
            fn from_value(value: Value) -> Result<Self> {
                let items = match value {
                    Value::Tuple(items) if items.len() == $len => items,
                    other => {
                        return Err(ScriptingError::type_mismatch(
                            LABEL,
                            format!("tuple of {} values", $len),
                            other.kind(),
                        ));
                    }
                };
                let mut items = items.into_iter();
                Ok(($(
                    $name::from_value(items.next().unwrap_or(Value::Tuple(Vec::new())))?,
                )+))
            }
        }
    };
}

tuple_from_value!(2 => A, B);
tuple_from_value!(3 => A, B, C);
tuple_from_value!(4 => A, B, C, D);
tuple_from_value!(5 => A, B, C, D, E);
tuple_from_value!(6 => A, B, C, D, E, F);
tuple_from_value!(7 => A, B, C, D, E, F, G);
tuple_from_value!(8 => A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(f64::from_value(Value::Integer(2)).unwrap(), 2.0);
        assert!(i64::from_value(Value::Real(2.0)).is_err());
        assert_eq!("x".into_value().unwrap(), Value::from("x"));
        assert_eq!(
            QualifiedName::from_value(Value::from("A.B")).unwrap().to_string(),
            "A.B"
        );
    }

    #[test]
    fn test_nested_vectors() {
        let value = vec![vec![1i64, 2], vec![3, 4]].into_value().unwrap();
        assert_eq!(value.to_string(), "{{1, 2}, {3, 4}}");
        let back: Vec<Vec<i64>> = FromValue::from_value(value).unwrap();
        assert_eq!(back, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_tuples_and_unit() {
        let value = Value::Tuple(vec![Value::Boolean(true), Value::from("ok")]);
        let (flag, text): (bool, String) = FromValue::from_value(value).unwrap();
        assert!(flag);
        assert_eq!(text, "ok");

        assert!(<(bool, String)>::from_value(Value::Tuple(vec![Value::Boolean(true)])).is_err());
        assert!(<()>::from_value(Value::Tuple(vec![])).is_ok());
        assert!(<()>::from_value(Value::Boolean(true)).is_err());
    }

    #[test]
    fn test_optional_value_keeps_absence() {
        assert_eq!(optional_value::<bool>(None).unwrap(), None);
        assert_eq!(optional_value(Some(3i64)).unwrap(), Some(Value::Integer(3)));
    }
}
