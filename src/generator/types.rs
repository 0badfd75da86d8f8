//! Runtime types for IR type references.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::ir::{BindingModule, TypeDefinition, TypeRef};
use crate::codec::{EnumerationType, RecordType, ValueType};
use crate::error::{Result, ScriptingError};
use crate::grammar::QualifiedName;
use crate::interface::PrimitiveKind;

pub fn primitive_type(kind: PrimitiveKind) -> ValueType {
    match kind {
        PrimitiveKind::Real => ValueType::Real,
        PrimitiveKind::Integer => ValueType::Integer,
        PrimitiveKind::Boolean => ValueType::Boolean,
        PrimitiveKind::String => ValueType::String,
        PrimitiveKind::TypeName => ValueType::TypeName,
        PrimitiveKind::VariableName => ValueType::VariableName,
        PrimitiveKind::VariableNames => ValueType::VariableNames,
    }
}

/// Type definitions of one module, by name.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    definitions: IndexMap<QualifiedName, TypeDefinition>,
}

impl TypeTable {
    pub fn new(module: &BindingModule) -> Self {
        Self {
            definitions: module
                .types
                .iter()
                .map(|t| (t.name().clone(), t.clone()))
                .collect(),
        }
    }

    pub fn value_type(&self, ty: &TypeRef) -> Result<ValueType> {
        match ty {
            TypeRef::Primitive(kind) => Ok(primitive_type(*kind)),
            TypeRef::Named(name) => self.named(name, &mut HashSet::new()),
        }
    }

    fn named(
        &self,
        name: &QualifiedName,
        visiting: &mut HashSet<QualifiedName>,
    ) -> Result<ValueType> {
        if !visiting.insert(name.clone()) {
            return Err(ScriptingError::InvalidDocument(format!(
                "type '{}' contains itself",
                name
            )));
        }
        let definition = self.definitions.get(name).ok_or_else(|| {
            ScriptingError::InvalidDocument(format!("no type definition for '{}'", name))
        })?;
        let ty = match definition {
            TypeDefinition::Alias(alias) => self.named(&alias.target, visiting)?,
            TypeDefinition::Enumeration(e) => {
                let members: Vec<&str> = e.members.iter().map(|m| m.name.as_str()).collect();
                EnumerationType::new(&e.name.to_string(), &members)?.into()
            }
            TypeDefinition::Record(r) => {
                let mut builder = RecordType::builder(&r.name.to_string())?;
                for field in &r.fields {
                    let ty = match &field.ty {
                        TypeRef::Primitive(kind) => primitive_type(*kind),
                        TypeRef::Named(inner) => self.named(inner, visiting)?,
                    };
                    builder = builder.element(field.name.as_str(), ty, field.shape.clone())?;
                }
                builder.build_type()
            }
        };
        visiting.remove(name);
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::lower;
    use crate::interface::{InterfaceModel, ModelOptions};

    #[test]
    fn test_nested_record_and_alias_types() {
        let source = r#"<omcInterface>
  <type id="P.Access">
    <components><enumerator name="hide"/><enumerator name="all"/></components>
  </type>
  <record id="P.Inner"><components><element name="level" className="Access"/></components></record>
  <record id="P.Outer">
    <components>
      <element name="inner" className="Inner"/>
      <element name="vars" className="VariableNames"/>
    </components>
  </record>
  <record id="P.Same" ref="Outer"/>
</omcInterface>"#;
        let model = InterfaceModel::from_xml(source, &ModelOptions::new().root("P")).unwrap();
        let table = TypeTable::new(&lower(&model));
        let ty = table
            .value_type(&TypeRef::Named(QualifiedName::parse("P.Same").unwrap()))
            .unwrap();
        let ValueType::Record(outer) = ty else {
            panic!("expected a record");
        };
        assert_eq!(outer.name.to_string(), "P.Outer");
        assert!(matches!(
            &outer.elements[0].ty,
            ValueType::Record(inner) if inner.elements.len() == 1
        ));
        assert_eq!(outer.elements[1].ty, ValueType::VariableNames);

        assert!(table
            .value_type(&TypeRef::Named(QualifiedName::parse("P.Missing").unwrap()))
            .is_err());
    }
}
