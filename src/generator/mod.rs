//! Binding generation.
//!
//! Generation runs in two steps: [`lower`] turns an
//! [`InterfaceModel`](crate::interface::InterfaceModel) into a
//! [`BindingModule`], then an [`Emitter`] renders the module as Rust source.
//! The same IR drives [`BindingClient`] for calls made without generated code.

pub mod dynamic;
pub mod emit;
pub mod ir;
pub mod lower;
pub mod names;
pub mod types;

pub use dynamic::BindingClient;
pub use emit::{BINDINGS_TEMPLATE, DEFAULT_RUNTIME, Emitter};
pub use ir::{
    AliasBinding, AliasDefinition, BindingModule, DeclarationBinding, EnumerationDefinition,
    EnumerationMember, FieldDefinition, FunctionBinding, Output, Parameter, RecordDefinition,
    SkippedBinding, SkippedKind, TypeDefinition, TypeRef,
};
pub use lower::lower;
pub use names::{method_name, rust_ident};
pub use types::TypeTable;

use crate::error::Result;
use crate::interface::{InterfaceModel, ModelOptions};

/// Parse an interface document and render its bindings with the built-in template.
pub fn generate_bindings(source: &str, options: &ModelOptions) -> Result<String> {
    let model = InterfaceModel::from_xml(source, options)?;
    Emitter::new().render(&lower(&model))
}
