//! Language-neutral binding IR.
//!
//! Lowering turns an [`InterfaceModel`](crate::interface::InterfaceModel) into a
//! [`BindingModule`]; emitters and the dynamic client consume it. Everything
//! here is plain data and serializes to JSON.

use std::ops::Range;

use serde::Serialize;

use crate::codec::Shape;
use crate::grammar::{Identifier, QualifiedName};
use crate::interface::{PrimitiveKind, UnsupportedReason};
use crate::session::CallStyle;

/// A reference to the type of a parameter, output or field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// An emitted enumeration, record or type alias.
    Named(QualifiedName),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumerationMember {
    pub name: Identifier,
    /// 1-based.
    pub ordinal: usize,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumerationDefinition {
    pub name: QualifiedName,
    pub members: Vec<EnumerationMember>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: Identifier,
    pub ty: TypeRef,
    pub shape: Shape,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordDefinition {
    pub name: QualifiedName,
    pub fields: Vec<FieldDefinition>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AliasDefinition {
    pub name: QualifiedName,
    pub target: QualifiedName,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDefinition {
    Enumeration(EnumerationDefinition),
    Record(RecordDefinition),
    Alias(AliasDefinition),
}

impl TypeDefinition {
    pub fn name(&self) -> &QualifiedName {
        match self {
            TypeDefinition::Enumeration(e) => &e.name,
            TypeDefinition::Record(r) => &r.name,
            TypeDefinition::Alias(a) => &a.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parameter {
    pub name: Identifier,
    pub ty: TypeRef,
    pub shape: Shape,
    pub optional: bool,
    /// Default binding text, for documentation only.
    pub default: Option<String>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Output {
    pub name: Identifier,
    pub ty: TypeRef,
    pub shape: Shape,
    pub comment: Option<String>,
}

/// A binding that performs a call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeclarationBinding {
    /// Name of the generated method.
    pub method: String,
    /// Function name written into the call expression.
    pub wire_name: QualifiedName,
    pub style: CallStyle,
    /// Required parameters first, then optional ones.
    pub parameters: Vec<Parameter>,
    pub outputs: Vec<Output>,
    pub comment: Option<String>,
}

/// A binding that forwards to another binding's method.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AliasBinding {
    pub method: String,
    pub name: QualifiedName,
    pub target_method: String,
    pub target: QualifiedName,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FunctionBinding {
    Declaration(DeclarationBinding),
    Alias(AliasBinding),
}

impl FunctionBinding {
    pub fn method(&self) -> &str {
        match self {
            FunctionBinding::Declaration(d) => &d.method,
            FunctionBinding::Alias(a) => &a.method,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkippedKind {
    Function,
    Record,
    Alias,
}

/// Something that was not emitted, and why.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedBinding {
    pub kind: SkippedKind,
    pub name: QualifiedName,
    /// The type that made it unsupported.
    pub type_name: QualifiedName,
    pub reason: UnsupportedReason,
    /// Byte range of the element in the interface document.
    pub span: Range<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BindingModule {
    pub omc_version: String,
    /// md5 of the interface document.
    pub fingerprint: String,
    pub root: QualifiedName,
    pub types: Vec<TypeDefinition>,
    pub functions: Vec<FunctionBinding>,
    pub skipped: Vec<SkippedBinding>,
}

impl BindingModule {
    pub fn function(&self, method: &str) -> Option<&FunctionBinding> {
        self.functions.iter().find(|f| f.method() == method)
    }

    pub fn type_definition(&self, name: &QualifiedName) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name() == name)
    }
}
