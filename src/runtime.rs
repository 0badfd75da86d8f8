//! Everything generated bindings refer to, in one place.
//!
//! Generated modules import this as `rt` and name every item through it.

pub use std::fmt;

pub use crate::codec::{
    Dimension, EnumerationType, EnumerationValue, FromValue, IntoValue, OutputSchema, RecordType,
    RecordValue, Shape, Value, ValueType, cast_value, optional_value,
};
pub use crate::error::ScriptingError;
pub use crate::grammar::{Identifier, QualifiedName};
pub use crate::session::{CallStyle, CommandChannel, Session};
