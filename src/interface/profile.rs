//! Profiles: what the model knows about each type and function.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::codec::Shape;
use crate::grammar::{Direction, Identifier, QualifiedName};

/// Built-in types with a direct runtime representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Real,
    Integer,
    Boolean,
    String,
    TypeName,
    VariableName,
    /// `VariableName[:]`
    VariableNames,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Real,
        PrimitiveKind::Integer,
        PrimitiveKind::Boolean,
        PrimitiveKind::String,
        PrimitiveKind::TypeName,
        PrimitiveKind::VariableName,
        PrimitiveKind::VariableNames,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Real => "Real",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::String => "String",
            PrimitiveKind::TypeName => "TypeName",
            PrimitiveKind::VariableName => "VariableName",
            PrimitiveKind::VariableNames => "VariableNames",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Code types the bindings cannot represent.
pub const OPAQUE_CODE_TYPES: [&str; 5] = [
    "Expression",
    "ExpressionOrModification",
    "Modification",
    "Code",
    "TypeNames",
];

/// Why a type, and everything using it, cannot be bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum UnsupportedReason {
    OpaqueCode,
    UnknownBuiltin,
    /// A `type` declaration that is neither an alias nor an enumeration.
    TypeDeclaration,
    /// The name denotes a package or a function.
    NotAType,
    /// No matcher in the configured list accepted the name.
    Unclassified,
    /// A function alias whose target does not resolve.
    UnresolvedAlias,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnsupportedReason::OpaqueCode => "opaque code type",
            UnsupportedReason::UnknownBuiltin => "unknown builtin type",
            UnsupportedReason::TypeDeclaration => "type declaration without enumerators",
            UnsupportedReason::NotAType => "not a type",
            UnsupportedReason::Unclassified => "no matcher accepts it",
            UnsupportedReason::UnresolvedAlias => "alias target does not resolve",
        };
        f.write_str(text)
    }
}

/// A named, typed, shaped component: a function argument or record element.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: Identifier,
    /// Resolved type name.
    pub type_name: QualifiedName,
    pub shape: Shape,
    pub comment: Option<String>,
    /// `None` for record elements.
    pub direction: Option<Direction>,
    /// Inputs with a default may be left out of a call.
    pub optional: bool,
    /// Default binding text, when the listing carries one.
    pub default: Option<String>,
}

impl Argument {
    pub fn is_input(&self) -> bool {
        self.direction == Some(Direction::Input)
    }

    pub fn is_output(&self) -> bool {
        self.direction == Some(Direction::Output)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumerationProfile {
    pub name: QualifiedName,
    pub members: Vec<Identifier>,
    pub member_comments: Vec<Option<String>>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordProfile {
    pub name: QualifiedName,
    pub elements: Vec<Argument>,
    pub comment: Option<String>,
    pub span: Range<usize>,
}

/// Classification of one type name.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeProfile {
    Primitive(PrimitiveKind),
    /// Points at the final, non-alias class of the chain.
    Alias { name: QualifiedName, target: QualifiedName },
    Enumeration(EnumerationProfile),
    Record(RecordProfile),
    Unsupported(UnsupportedReason),
}

impl TypeProfile {
    pub fn kind(&self) -> &'static str {
        match self {
            TypeProfile::Primitive(_) => "primitive",
            TypeProfile::Alias { .. } => "alias",
            TypeProfile::Enumeration(_) => "enumeration",
            TypeProfile::Record(_) => "record",
            TypeProfile::Unsupported(_) => "unsupported",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDeclaration {
    pub name: QualifiedName,
    /// Inputs and outputs in interface order.
    pub arguments: Vec<Argument>,
    pub comment: Option<String>,
    pub span: Range<usize>,
}

impl FunctionDeclaration {
    pub fn inputs(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| a.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| a.is_output())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionAlias {
    pub name: QualifiedName,
    pub reference: QualifiedName,
    /// Final declaration of the alias chain; `None` when it does not resolve.
    pub target: Option<QualifiedName>,
    pub comment: Option<String>,
    pub span: Range<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionProfile {
    Declaration(FunctionDeclaration),
    Alias(FunctionAlias),
}

impl FunctionProfile {
    pub fn name(&self) -> &QualifiedName {
        match self {
            FunctionProfile::Declaration(d) => &d.name,
            FunctionProfile::Alias(a) => &a.name,
        }
    }

    pub fn span(&self) -> &Range<usize> {
        match self {
            FunctionProfile::Declaration(d) => &d.span,
            FunctionProfile::Alias(a) => &a.span,
        }
    }
}

/// Whether something can be bound, and if not, which type is to blame.
#[derive(Clone, Debug, PartialEq)]
pub enum Support {
    Supported,
    Unsupported {
        type_name: QualifiedName,
        reason: UnsupportedReason,
    },
}

impl Support {
    pub fn is_supported(&self) -> bool {
        matches!(self, Support::Supported)
    }
}
