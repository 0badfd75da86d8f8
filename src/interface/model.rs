//! The interface model: every type and function profile of one document.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use super::document::{ClassNode, InterfaceDocument};
use super::matchers::{DEFAULT_MATCHERS, TypeMatcher, classify};
use super::profile::{
    Argument, FunctionAlias, FunctionDeclaration, FunctionProfile, PrimitiveKind, Support,
    TypeProfile, UnsupportedReason,
};
use super::xml::parse_xml;
use crate::error::{Result, ScriptingError};
use crate::grammar::{ClassRestriction, Direction, QualifiedName, parse_class_listing};

/// Package whose functions are bound unless configured otherwise.
pub const DEFAULT_ROOT: &str = "OpenModelica.Scripting";

/// Options for building an [`InterfaceModel`].
///
/// # Example
///
/// ```
/// use omc_scripting::interface::{ModelOptions, TypeMatcher};
///
/// let options = ModelOptions::new()
///     .root("OpenModelica.Scripting")
///     .matchers(vec![TypeMatcher::Primitive, TypeMatcher::Record]);
/// assert_eq!(options.root_name(), "OpenModelica.Scripting");
/// ```
#[derive(Clone, Debug)]
pub struct ModelOptions {
    root: String,
    matchers: Vec<TypeMatcher>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            matchers: DEFAULT_MATCHERS.to_vec(),
        }
    }
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package whose functions (at any depth) get bindings.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Replace the ordered matcher list.
    pub fn matchers(mut self, matchers: Vec<TypeMatcher>) -> Self {
        self.matchers = matchers;
        self
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }
}

/// Immutable model of a scripting interface.
#[derive(Clone, Debug)]
pub struct InterfaceModel {
    document: InterfaceDocument,
    root: QualifiedName,
    fingerprint: String,
    types: IndexMap<QualifiedName, TypeProfile>,
    functions: IndexMap<QualifiedName, FunctionProfile>,
}

impl InterfaceModel {
    /// Build the model from the text of an interface document.
    pub fn from_xml(source: &str, options: &ModelOptions) -> Result<Self> {
        let root = parse_xml(source)?;
        let document = InterfaceDocument::from_xml(&root)?;
        let mut model = Self {
            document,
            root: QualifiedName::parse(&options.root)?.unrooted(),
            fingerprint: format!("{:x}", md5::compute(source.as_bytes())),
            types: IndexMap::new(),
            functions: IndexMap::new(),
        };
        check_type_identifiers(&model.document)?;
        model.build_functions();
        model.build_types(&options.matchers)?;
        debug!(
            "interface model: {} classes, {} type profiles, {} functions",
            model.document.len(),
            model.types.len(),
            model.functions.len()
        );
        Ok(model)
    }

    fn build_functions(&mut self) {
        let mut functions = IndexMap::new();
        for class in self.document.classes() {
            if class.restriction != ClassRestriction::Function {
                continue;
            }
            let profile = match &class.reference {
                Some(reference) => FunctionProfile::Alias(self.function_alias(class, reference)),
                None => FunctionProfile::Declaration(self.function_declaration(class)),
            };
            functions.insert(class.name.clone(), profile);
        }
        self.functions = functions;
    }

    fn function_alias(&self, class: &ClassNode, reference: &QualifiedName) -> FunctionAlias {
        let target = match self.document.resolve_alias(class) {
            Ok(target) => Some(target.name.clone()),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        FunctionAlias {
            name: class.name.clone(),
            reference: reference.clone(),
            target,
            comment: class.comment.clone(),
            span: class.span.clone(),
        }
    }

    fn function_declaration(&self, class: &ClassNode) -> FunctionDeclaration {
        let listing = class.code.as_deref().and_then(|code| match parse_class_listing(code) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("{}: cannot read listing, assuming no defaults: {}", class.name, e);
                None
            }
        });
        let arguments = class
            .components
            .iter()
            .map(|c| {
                let declared = listing.as_ref().and_then(|l| l.component(c.name.as_str()));
                let default = declared
                    .filter(|_| c.direction == Some(Direction::Input))
                    .and_then(|d| d.default.clone());
                Argument {
                    name: c.name.clone(),
                    type_name: self.document.resolve(Some(class.scope()), &c.class_name),
                    shape: c.shape.clone(),
                    comment: c
                        .comment
                        .clone()
                        .or_else(|| declared.and_then(|d| d.description.clone())),
                    direction: c.direction,
                    optional: default.is_some(),
                    default,
                }
            })
            .collect();
        FunctionDeclaration {
            name: class.name.clone(),
            arguments,
            comment: class
                .comment
                .clone()
                .or_else(|| listing.as_ref().and_then(|l| l.description.clone())),
            span: class.span.clone(),
        }
    }

    /// Classify every declared type and every name a component refers to.
    fn build_types(&mut self, matchers: &[TypeMatcher]) -> Result<()> {
        let mut pending: Vec<QualifiedName> = Vec::new();
        for class in self.document.classes() {
            if matches!(class.restriction, ClassRestriction::Type | ClassRestriction::Record) {
                pending.push(class.name.clone());
            }
        }
        for profile in self.functions.values() {
            if let FunctionProfile::Declaration(d) = profile {
                pending.extend(d.arguments.iter().map(|a| a.type_name.clone()));
            }
        }

        let mut types = IndexMap::new();
        // Process in discovery order; referenced names queue behind.
        let mut index = 0;
        while index < pending.len() {
            let name = pending[index].clone();
            index += 1;
            if types.contains_key(&name) {
                continue;
            }
            let profile = classify(&self.document, &name, matchers)?;
            match &profile {
                TypeProfile::Record(record) => {
                    pending.extend(record.elements.iter().map(|e| e.type_name.clone()));
                }
                TypeProfile::Alias { target, .. } => pending.push(target.clone()),
                _ => {}
            }
            types.insert(name, profile);
        }
        self.types = types;
        Ok(())
    }

    pub fn omc_version(&self) -> &str {
        &self.document.omc_version
    }

    /// md5 of the document text.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn root(&self) -> &QualifiedName {
        &self.root
    }

    pub fn document(&self) -> &InterfaceDocument {
        &self.document
    }

    pub fn type_profile(&self, name: &QualifiedName) -> Option<&TypeProfile> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = (&QualifiedName, &TypeProfile)> {
        self.types.iter()
    }

    pub fn function(&self, name: &QualifiedName) -> Option<&FunctionProfile> {
        self.functions.get(name)
    }

    /// Every function of the document, in document order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionProfile> {
        self.functions.values()
    }

    /// Functions inside the root package, at any depth, in document order.
    pub fn root_functions(&self) -> impl Iterator<Item = &FunctionProfile> {
        self.functions
            .values()
            .filter(|f| self.in_root(f.name()))
    }

    pub fn in_root(&self, name: &QualifiedName) -> bool {
        name.strip_prefix(&self.root).is_some()
    }

    /// Profile at the end of an alias chain.
    pub fn final_type(&self, name: &QualifiedName) -> Option<&TypeProfile> {
        match self.types.get(name)? {
            TypeProfile::Alias { target, .. } => self.types.get(target),
            profile => Some(profile),
        }
    }

    pub fn type_support(&self, name: &QualifiedName) -> Support {
        self.support_of(name, &mut HashSet::new())
    }

    fn support_of(&self, name: &QualifiedName, visiting: &mut HashSet<QualifiedName>) -> Support {
        let unsupported = |reason: &UnsupportedReason| Support::Unsupported {
            type_name: name.clone(),
            reason: reason.clone(),
        };
        match self.types.get(name) {
            None => unsupported(&UnsupportedReason::Unclassified),
            Some(TypeProfile::Primitive(_) | TypeProfile::Enumeration(_)) => Support::Supported,
            Some(TypeProfile::Alias { target, .. }) => self.support_of(target, visiting),
            Some(TypeProfile::Record(record)) => {
                if !visiting.insert(name.clone()) {
                    return Support::Supported;
                }
                for element in &record.elements {
                    let support = self.support_of(&element.type_name, visiting);
                    if !support.is_supported() {
                        return support;
                    }
                }
                Support::Supported
            }
            Some(TypeProfile::Unsupported(reason)) => unsupported(reason),
        }
    }

    pub fn function_support(&self, name: &QualifiedName) -> Support {
        match self.functions.get(name) {
            None => Support::Unsupported {
                type_name: name.clone(),
                reason: UnsupportedReason::NotAType,
            },
            Some(FunctionProfile::Declaration(declaration)) => declaration
                .arguments
                .iter()
                .map(|a| self.type_support(&a.type_name))
                .find(|s| !s.is_supported())
                .unwrap_or(Support::Supported),
            Some(FunctionProfile::Alias(alias)) => match &alias.target {
                Some(target) => self.function_support(target),
                None => Support::Unsupported {
                    type_name: alias.reference.clone(),
                    reason: UnsupportedReason::UnresolvedAlias,
                },
            },
        }
    }
}

/// Record and type names must be distinguishable by their last identifier,
/// and must not shadow a primitive.
fn check_type_identifiers(document: &InterfaceDocument) -> Result<()> {
    let mut seen: HashMap<&str, &QualifiedName> = HashMap::new();
    for class in document.classes() {
        if !matches!(class.restriction, ClassRestriction::Type | ClassRestriction::Record) {
            continue;
        }
        let last = class.name.last().as_str();
        if PrimitiveKind::from_name(last).is_some() {
            return Err(ScriptingError::ReservedNameConflict(class.name.to_string()));
        }
        if let Some(first) = seen.insert(last, &class.name) {
            return Err(ScriptingError::DuplicateTypeIdentifier {
                identifier: last.to_string(),
                first: first.to_string(),
                second: class.name.to_string(),
            });
        }
        trace!("type identifier {} is unique so far", last);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    const DOCUMENT: &str = r#"<omcInterface omcVersion="OMC 1.22">
  <package id="OpenModelica.Scripting">
    <classes>
      <record id="OpenModelica.Scripting.R">
        <components>
          <element name="a" className="Integer"/>
          <element name="b" className="String"/>
        </components>
      </record>
      <record id="OpenModelica.Scripting.Holder">
        <components><element name="e" className="Expression"/></components>
      </record>
      <function id="OpenModelica.Scripting.f">
        <code>function f
  input Integer x;
  input String y = "z" "optional text";
  output R r;
end f;</code>
        <components>
          <argument name="x" className="Integer" direction="input"/>
          <argument name="y" className="String" direction="input"/>
          <argument name="r" className="R" direction="output"/>
        </components>
      </function>
      <function id="OpenModelica.Scripting.g">
        <components>
          <argument name="h" className="Holder" direction="input"/>
        </components>
      </function>
      <function id="OpenModelica.Scripting.fAlias" ref="f"/>
      <function id="OpenModelica.Scripting.lost" ref="nowhere"/>
      <package id="OpenModelica.Scripting.Internal">
        <classes>
          <function id="OpenModelica.Scripting.Internal.h"/>
        </classes>
      </package>
    </classes>
  </package>
  <function id="Other.top"/>
</omcInterface>"#;

    fn model() -> InterfaceModel {
        InterfaceModel::from_xml(DOCUMENT, &ModelOptions::new()).unwrap()
    }

    #[test]
    fn test_defaults_make_inputs_optional() {
        let model = model();
        let wire = name("OpenModelica.Scripting.f");
        let Some(FunctionProfile::Declaration(f)) = model.function(&wire) else {
            panic!("expected declaration");
        };
        let inputs: Vec<_> = f.inputs().collect();
        assert!(!inputs[0].optional);
        assert!(inputs[1].optional);
        assert_eq!(inputs[1].default.as_deref(), Some("\"z\""));
        assert_eq!(inputs[1].comment.as_deref(), Some("optional text"));
        assert_eq!(f.outputs().next().unwrap().type_name, name("OpenModelica.Scripting.R"));
    }

    #[test]
    fn test_root_functions_any_depth() {
        let model = model();
        let names: Vec<String> = model.root_functions().map(|f| f.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "OpenModelica.Scripting.f",
                "OpenModelica.Scripting.g",
                "OpenModelica.Scripting.fAlias",
                "OpenModelica.Scripting.lost",
                "OpenModelica.Scripting.Internal.h",
            ]
        );
        assert_eq!(model.functions().count(), 6);
        assert_eq!(model.omc_version(), "OMC 1.22");
        assert_eq!(model.fingerprint().len(), 32);
    }

    #[test]
    fn test_support_queries() {
        let model = model();
        assert!(model.function_support(&name("OpenModelica.Scripting.f")).is_supported());
        assert!(model.function_support(&name("OpenModelica.Scripting.fAlias")).is_supported());
        assert_eq!(
            model.function_support(&name("OpenModelica.Scripting.g")),
            Support::Unsupported {
                type_name: name("Expression"),
                reason: UnsupportedReason::OpaqueCode,
            }
        );
        assert!(matches!(
            model.function_support(&name("OpenModelica.Scripting.lost")),
            Support::Unsupported { reason: UnsupportedReason::UnresolvedAlias, .. }
        ));
        // every referenced name has a profile
        assert!(model.type_profile(&name("Integer")).is_some());
        assert!(model.type_profile(&name("Expression")).is_some());
    }

    #[test]
    fn test_duplicate_and_reserved_type_identifiers() {
        let duplicate = r#"<omcInterface>
  <record id="A.Foo"/>
  <record id="B.Foo"/>
</omcInterface>"#;
        assert!(matches!(
            InterfaceModel::from_xml(duplicate, &ModelOptions::new()),
            Err(ScriptingError::DuplicateTypeIdentifier { identifier, .. }) if identifier == "Foo"
        ));
        let reserved = r#"<omcInterface><type id="P.TypeName"/></omcInterface>"#;
        assert!(matches!(
            InterfaceModel::from_xml(reserved, &ModelOptions::new()),
            Err(ScriptingError::ReservedNameConflict(_))
        ));
    }

    #[test]
    fn test_unresolved_type_alias_aborts() {
        let source = r#"<omcInterface><record id="P.A" ref="Missing"/></omcInterface>"#;
        assert!(matches!(
            InterfaceModel::from_xml(source, &ModelOptions::new()),
            Err(ScriptingError::UnresolvedAlias { .. })
        ));
    }

    #[test]
    fn test_type_alias_skips_same_named_function() {
        let source = r#"<omcInterface>
  <record id="P.R"><components><element name="a" className="Integer"/></components></record>
  <function id="P.Q.R"/>
  <record id="P.Q.S" ref="R"/>
</omcInterface>"#;
        let model = InterfaceModel::from_xml(source, &ModelOptions::new().root("P")).unwrap();
        assert!(matches!(
            model.type_profile(&name("P.Q.S")),
            Some(TypeProfile::Alias { target, .. }) if *target == name("P.R")
        ));
    }

    #[test]
    fn test_custom_root() {
        let model =
            InterfaceModel::from_xml(DOCUMENT, &ModelOptions::new().root("Other")).unwrap();
        let names: Vec<String> = model.root_functions().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["Other.top"]);
    }
}
