//! Bridge between nested array values and `ndarray`.

use ndarray::{ArrayD, IxDyn};

use super::cast::check_rectangular;
use super::convert::{FromValue, IntoValue};
use super::shape::{Dimension, Shape};
use super::value::Value;
use crate::error::{Result, ScriptingError};

const LABEL: &str = "array";

/// Lengths along each axis, read from the first element of every level.
fn extents(value: &Value) -> Vec<usize> {
    let mut dims = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        dims.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    dims
}

fn flatten(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten(item, out)),
        leaf => out.push(leaf),
    }
}

/// Convert a rectangular nested array into an n-dimensional array.
///
/// A non-array value becomes a zero-dimensional array.
pub fn to_ndarray<T: FromValue>(value: Value) -> Result<ArrayD<T>> {
    let dims = extents(&value);
    let shape = Shape::new(dims.iter().map(|_| Dimension::Unbounded).collect());
    check_rectangular(LABEL, &value, &shape)?;

    let mut leaves = Vec::new();
    flatten(value, &mut leaves);
    let elements = leaves
        .into_iter()
        .map(T::from_value)
        .collect::<Result<Vec<_>>>()?;
    ArrayD::from_shape_vec(IxDyn(&dims), elements)
        .map_err(|e| ScriptingError::shape_mismatch(LABEL, format!("{:?}", dims), e))
}

/// Convert an n-dimensional array into nested array values, row-major.
pub fn from_ndarray<T: IntoValue + Clone>(array: &ArrayD<T>) -> Result<Value> {
    if array.ndim() == 0 {
        return match array.iter().next() {
            Some(item) => item.clone().into_value(),
            None => Ok(Value::Array(Vec::new())),
        };
    }
    array
        .outer_iter()
        .map(|row| from_ndarray(&row.to_owned()))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_to_ndarray() {
        let value = Value::from(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let array: ArrayD<f64> = to_ndarray(value.clone()).unwrap();
        assert_eq!(array.shape(), &[2, 3]);
        assert_eq!(array[IxDyn(&[1, 2])], 6.0);
        assert_eq!(from_ndarray(&array).unwrap(), value);
    }

    #[test]
    fn test_ragged_is_rejected() {
        let value = Value::from(vec![vec![1i64, 2], vec![3]]);
        assert!(matches!(
            to_ndarray::<i64>(value),
            Err(ScriptingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_scalar_and_empty() {
        let scalar: ArrayD<i64> = to_ndarray(Value::Integer(7)).unwrap();
        assert_eq!(scalar.ndim(), 0);
        assert_eq!(from_ndarray(&scalar).unwrap(), Value::Integer(7));

        let empty: ArrayD<bool> = to_ndarray(Value::Array(vec![])).unwrap();
        assert_eq!(empty.shape(), &[0]);
    }
}
