//! Ordered type matchers.
//!
//! Classification walks a list of [`TypeMatcher`]s and takes the first one
//! that accepts a name. The list is a plain value, so callers can reorder or
//! drop matchers without touching [`classify`].

use log::trace;
use serde::Serialize;

use super::document::{ClassNode, InterfaceDocument};
use super::profile::{
    Argument, EnumerationProfile, OPAQUE_CODE_TYPES, PrimitiveKind, RecordProfile, TypeProfile,
    UnsupportedReason,
};
use crate::error::Result;
use crate::grammar::{ClassRestriction, QualifiedName};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TypeMatcher {
    /// Known primitive or supported code type with no element.
    Primitive,
    /// Known opaque code type.
    OpaqueCode,
    /// Any other name with no element.
    UnknownBuiltin,
    /// Element with a `ref`.
    Alias,
    /// `type` with enumerators.
    Enumeration,
    /// `type` without enumerators.
    TypeDeclaration,
    Record,
    /// Element of any other restriction.
    NotAType,
}

pub const DEFAULT_MATCHERS: [TypeMatcher; 8] = [
    TypeMatcher::Primitive,
    TypeMatcher::OpaqueCode,
    TypeMatcher::UnknownBuiltin,
    TypeMatcher::Alias,
    TypeMatcher::Enumeration,
    TypeMatcher::TypeDeclaration,
    TypeMatcher::Record,
    TypeMatcher::NotAType,
];

/// Record elements with their type names resolved from the record's scope.
pub(crate) fn record_elements(document: &InterfaceDocument, class: &ClassNode) -> Vec<Argument> {
    class
        .components
        .iter()
        .map(|c| Argument {
            name: c.name.clone(),
            type_name: document.resolve(Some(class.scope()), &c.class_name),
            shape: c.shape.clone(),
            comment: c.comment.clone(),
            direction: None,
            optional: false,
            default: None,
        })
        .collect()
}

impl TypeMatcher {
    fn apply(
        self,
        document: &InterfaceDocument,
        name: &QualifiedName,
        class: Option<&ClassNode>,
    ) -> Result<Option<TypeProfile>> {
        let bare = (!name.is_rooted() && name.segments().len() == 1).then(|| name.last().as_str());
        let profile = match (self, class) {
            (TypeMatcher::Primitive, None) => bare
                .and_then(PrimitiveKind::from_name)
                .map(TypeProfile::Primitive),
            (TypeMatcher::OpaqueCode, None) => bare
                .filter(|n| OPAQUE_CODE_TYPES.contains(n))
                .map(|_| TypeProfile::Unsupported(UnsupportedReason::OpaqueCode)),
            (TypeMatcher::UnknownBuiltin, None) => {
                Some(TypeProfile::Unsupported(UnsupportedReason::UnknownBuiltin))
            }
            (TypeMatcher::Alias, Some(class))
                if class.is_alias()
                    && matches!(
                        class.restriction,
                        ClassRestriction::Type | ClassRestriction::Record
                    ) =>
            {
                let target = document.resolve_alias(class)?;
                Some(TypeProfile::Alias {
                    name: class.name.clone(),
                    target: target.name.clone(),
                })
            }
            (TypeMatcher::Enumeration, Some(class))
                if class.restriction == ClassRestriction::Type && !class.enumerators.is_empty() =>
            {
                Some(TypeProfile::Enumeration(EnumerationProfile {
                    name: class.name.clone(),
                    members: class.enumerators.iter().map(|e| e.name.clone()).collect(),
                    member_comments: class.enumerators.iter().map(|e| e.comment.clone()).collect(),
                    comment: class.comment.clone(),
                }))
            }
            (TypeMatcher::TypeDeclaration, Some(class))
                if class.restriction == ClassRestriction::Type =>
            {
                Some(TypeProfile::Unsupported(UnsupportedReason::TypeDeclaration))
            }
            (TypeMatcher::Record, Some(class)) if class.restriction == ClassRestriction::Record => {
                Some(TypeProfile::Record(RecordProfile {
                    name: class.name.clone(),
                    elements: record_elements(document, class),
                    comment: class.comment.clone(),
                    span: class.span.clone(),
                }))
            }
            (TypeMatcher::NotAType, Some(_)) => {
                Some(TypeProfile::Unsupported(UnsupportedReason::NotAType))
            }
            _ => None,
        };
        Ok(profile)
    }
}

/// Classify one resolved type name.
///
/// The first matcher that accepts the name decides; when none does the type
/// is unsupported. Fails only when a type alias does not resolve.
pub fn classify(
    document: &InterfaceDocument,
    name: &QualifiedName,
    matchers: &[TypeMatcher],
) -> Result<TypeProfile> {
    let class = document.get(name);
    for matcher in matchers {
        if let Some(profile) = matcher.apply(document, name, class)? {
            trace!("{} classified by {:?} as {}", name, matcher, profile.kind());
            return Ok(profile);
        }
    }
    Ok(TypeProfile::Unsupported(UnsupportedReason::Unclassified))
}
