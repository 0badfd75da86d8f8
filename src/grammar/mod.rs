//! Concrete syntax shared by request encoding and reply decoding.
//!
//! # Submodules
//! - `identifier`: identifiers and qualified names
//! - `escape`: the backslash escape table for strings and quoted identifiers
//! - `lexer`: `logos` tokens of the value literal grammar
//! - `literal`: literal syntax tree, printer and parser
//! - `declaration`: the separate grammar for interface-only class listings

pub mod declaration;
pub mod escape;
pub mod identifier;
pub mod lexer;
pub mod literal;

pub use declaration::{
    ClassListing, ClassRestriction, ComponentDeclaration, Direction, parse_class_listing,
};
pub use escape::{escape, quote_string, unescape};
pub use identifier::{Identifier, QualifiedName, TypeName, VariableName, is_valid_identifier};
pub use literal::{Literal, RecordLiteral, format_real, parse_literal};
