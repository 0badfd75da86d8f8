//! Interface model of the scripting API.
//!
//! Built once from the XML document that the compiler exports about itself:
//!
//! 1. `xml`: element tree with source spans
//! 2. `document`: class registry, name lookup and alias resolution
//! 3. `matchers`: ordered classification of type names
//! 4. `profile`: type and function profiles
//! 5. `model`: the assembled, immutable [`InterfaceModel`]

pub mod document;
pub mod matchers;
pub mod model;
pub mod profile;
pub mod xml;

pub use document::{ClassNode, ComponentNode, EnumeratorNode, InterfaceDocument};
pub use matchers::{DEFAULT_MATCHERS, TypeMatcher, classify};
pub use model::{DEFAULT_ROOT, InterfaceModel, ModelOptions};
pub use profile::{
    Argument, EnumerationProfile, FunctionAlias, FunctionDeclaration, FunctionProfile,
    PrimitiveKind, RecordProfile, Support, TypeProfile, UnsupportedReason,
};
pub use xml::{XmlElement, parse_xml};
