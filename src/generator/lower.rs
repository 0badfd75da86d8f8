//! Interface model → binding IR.

use log::{info, warn};

use super::ir::{
    AliasBinding, AliasDefinition, BindingModule, DeclarationBinding, EnumerationDefinition,
    EnumerationMember, FieldDefinition, FunctionBinding, Output, Parameter, RecordDefinition,
    SkippedBinding, SkippedKind, TypeDefinition, TypeRef,
};
use super::names::method_name;
use crate::grammar::QualifiedName;
use crate::interface::{
    Argument, FunctionDeclaration, FunctionProfile, InterfaceModel, Support, TypeProfile,
};
use crate::session::CallStyle;

/// Lower every supported type and root function, in document order.
pub fn lower(model: &InterfaceModel) -> BindingModule {
    let mut lowering = Lowering {
        model,
        module: BindingModule {
            omc_version: model.omc_version().to_string(),
            fingerprint: model.fingerprint().to_string(),
            root: model.root().clone(),
            types: Vec::new(),
            functions: Vec::new(),
            skipped: Vec::new(),
        },
    };
    lowering.types();
    lowering.functions();
    let module = lowering.module;
    info!(
        "lowered {} types and {} functions, skipped {}",
        module.types.len(),
        module.functions.len(),
        module.skipped.len()
    );
    module
}

struct Lowering<'m> {
    model: &'m InterfaceModel,
    module: BindingModule,
}

impl Lowering<'_> {
    fn type_ref(&self, name: &QualifiedName) -> TypeRef {
        match self.model.type_profile(name) {
            Some(TypeProfile::Primitive(kind)) => TypeRef::Primitive(*kind),
            _ => TypeRef::Named(name.clone()),
        }
    }

    fn skip(&mut self, kind: SkippedKind, name: &QualifiedName, support: Support) {
        let Support::Unsupported { type_name, reason } = support else {
            return;
        };
        warn!("skipping {:?} {}: {} is {}", kind, name, type_name, reason);
        let span = match kind {
            SkippedKind::Function => self.model.function(name).map(|f| f.span().clone()),
            SkippedKind::Record | SkippedKind::Alias => {
                self.model.document().get(name).map(|c| c.span.clone())
            }
        };
        self.module.skipped.push(SkippedBinding {
            kind,
            name: name.clone(),
            type_name,
            reason,
            span: span.unwrap_or_default(),
        });
    }

    fn types(&mut self) {
        let model = self.model;
        for (name, profile) in model.types() {
            match profile {
                TypeProfile::Enumeration(e) => {
                    self.module
                        .types
                        .push(TypeDefinition::Enumeration(EnumerationDefinition {
                            name: e.name.clone(),
                            members: e
                                .members
                                .iter()
                                .zip(&e.member_comments)
                                .enumerate()
                                .map(|(i, (member, comment))| EnumerationMember {
                                    name: member.clone(),
                                    ordinal: i + 1,
                                    comment: comment.clone(),
                                })
                                .collect(),
                            comment: e.comment.clone(),
                        }));
                }
                TypeProfile::Record(r) => {
                    let support = model.type_support(name);
                    if !support.is_supported() {
                        self.skip(SkippedKind::Record, name, support);
                        continue;
                    }
                    let fields = r
                        .elements
                        .iter()
                        .map(|e| FieldDefinition {
                            name: e.name.clone(),
                            ty: self.type_ref(&e.type_name),
                            shape: e.shape.clone(),
                            comment: e.comment.clone(),
                        })
                        .collect();
                    self.module.types.push(TypeDefinition::Record(RecordDefinition {
                        name: r.name.clone(),
                        fields,
                        comment: r.comment.clone(),
                    }));
                }
                TypeProfile::Alias { name, target } => {
                    let support = model.type_support(target);
                    if !support.is_supported() {
                        self.skip(SkippedKind::Alias, name, support);
                        continue;
                    }
                    self.module.types.push(TypeDefinition::Alias(AliasDefinition {
                        name: name.clone(),
                        target: target.clone(),
                    }));
                }
                TypeProfile::Primitive(_) | TypeProfile::Unsupported(_) => {}
            }
        }
    }

    fn functions(&mut self) {
        let model = self.model;
        for function in model.root_functions() {
            let support = model.function_support(function.name());
            if !support.is_supported() {
                self.skip(SkippedKind::Function, function.name(), support);
                continue;
            }
            let binding = match function {
                FunctionProfile::Declaration(declaration) => {
                    FunctionBinding::Declaration(self.declaration(declaration, declaration))
                }
                FunctionProfile::Alias(alias) => {
                    let target = alias.target.as_ref().and_then(|t| model.function(t));
                    match target {
                        Some(FunctionProfile::Declaration(target))
                            if model.in_root(&target.name) =>
                        {
                            FunctionBinding::Alias(AliasBinding {
                                method: method_name(model.root(), &alias.name),
                                name: alias.name.clone(),
                                target_method: method_name(model.root(), &target.name),
                                target: target.name.clone(),
                                comment: alias.comment.clone().or_else(|| target.comment.clone()),
                            })
                        }
                        // The target has no method of its own: call it directly.
                        Some(FunctionProfile::Declaration(target)) => {
                            let mut binding = self.declaration(target, target);
                            binding.method = method_name(model.root(), &alias.name);
                            if alias.comment.is_some() {
                                binding.comment = alias.comment.clone();
                            }
                            FunctionBinding::Declaration(binding)
                        }
                        _ => continue,
                    }
                }
            };
            self.module.functions.push(binding);
        }
    }

    fn parameter(&self, argument: &Argument) -> Parameter {
        Parameter {
            name: argument.name.clone(),
            ty: self.type_ref(&argument.type_name),
            shape: argument.shape.clone(),
            optional: argument.optional,
            default: argument.default.clone(),
            comment: argument.comment.clone(),
        }
    }

    /// `naming` provides the method name, `signature` the wire name and arguments.
    fn declaration(
        &self,
        naming: &FunctionDeclaration,
        signature: &FunctionDeclaration,
    ) -> DeclarationBinding {
        let (required, optional): (Vec<&Argument>, Vec<&Argument>) =
            signature.inputs().partition(|a| !a.optional);
        let style = if optional.is_empty() {
            CallStyle::Positional
        } else {
            CallStyle::Keyword
        };
        let parameters = required
            .into_iter()
            .chain(optional)
            .map(|a| self.parameter(a))
            .collect();
        let outputs = signature
            .outputs()
            .map(|a| Output {
                name: a.name.clone(),
                ty: self.type_ref(&a.type_name),
                shape: a.shape.clone(),
                comment: a.comment.clone(),
            })
            .collect();
        DeclarationBinding {
            method: method_name(self.model.root(), &naming.name),
            wire_name: signature.name.clone(),
            style,
            parameters,
            outputs,
            comment: signature.comment.clone(),
        }
    }
}
