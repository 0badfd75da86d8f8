//! Value codec: typed values to and from literal text.
//!
//! # Submodules
//! - `shape`: declared array dimensions
//! - `schema`: declared value types (primitives, enumerations, records)
//! - `value`: runtime values
//! - `cast`: argument validation (`cast_value`)
//! - `encode` / `decode`: schema-driven printing and reading
//! - `convert`: native Rust types to and from [`Value`]
//! - `array`: `ndarray` interop

pub mod array;
pub mod cast;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod schema;
pub mod shape;
pub mod value;

pub use array::{from_ndarray, to_ndarray};
pub use cast::{cast_required, cast_value};
pub use convert::{FromValue, IntoValue, optional_value};
pub use decode::{decode_outputs, decode_value, from_literal};
pub use encode::{encode_value, to_literal};
pub use schema::{
    EnumerationType, OutputSchema, RecordElement, RecordType, RecordTypeBuilder, ValueType,
};
pub use shape::{Dimension, Shape};
pub use value::{EnumerationValue, RecordValue, Value};
