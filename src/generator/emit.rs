//! Binding IR → Rust source, through a `minijinja` template.
//!
//! Rust type strings, schema expressions and identifiers are worked out here
//! so the template only lays out text. Expressions name the runtime through
//! the `rt` alias the template imports (see [`Emitter::runtime`]).

use log::warn;
use minijinja::{Environment, ErrorKind, context};
use serde::Serialize;

use super::ir::{
    AliasDefinition, BindingModule, DeclarationBinding, EnumerationDefinition, FunctionBinding,
    RecordDefinition, SkippedBinding, SkippedKind, TypeDefinition, TypeRef,
};
use super::names::{rust_ident, type_ident};
use crate::codec::{Dimension, Shape};
use crate::error::Result;
use crate::interface::PrimitiveKind;
use crate::session::CallStyle;

/// The built-in template.
pub const BINDINGS_TEMPLATE: &str = include_str!("templates/bindings.rs.jinja");

/// Runtime path used by generated code outside this crate.
pub const DEFAULT_RUNTIME: &str = "omc_scripting::runtime";

/// Most outputs a generated method returns as a native tuple.
const MAX_TUPLE_OUTPUTS: usize = 8;

/// Fail rendering with a message.
fn panic(message: String) -> std::result::Result<(), minijinja::Error> {
    Err(minijinja::Error::new(ErrorKind::InvalidOperation, message))
}

fn warn_fn(message: String) {
    warn!("{}", message);
}

/// Renders a [`BindingModule`] into a Rust module.
///
/// # Example
///
/// ```
/// use omc_scripting::generator::{Emitter, lower};
/// use omc_scripting::interface::{InterfaceModel, ModelOptions};
///
/// let model = InterfaceModel::from_xml("<omcInterface/>", &ModelOptions::new()).unwrap();
/// let source = Emitter::new().render(&lower(&model)).unwrap();
/// assert!(source.contains("pub struct Client"));
/// ```
#[derive(Clone, Debug)]
pub struct Emitter {
    template: Option<String>,
    runtime: String,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            template: None,
            runtime: DEFAULT_RUNTIME.to_string(),
        }
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `template` instead of the built-in one.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Path the generated module imports its runtime from.
    pub fn runtime(mut self, path: impl Into<String>) -> Self {
        self.runtime = path.into();
        self
    }

    pub fn render(&self, module: &BindingModule) -> Result<String> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_function("panic", panic);
        env.add_function("warn", warn_fn);
        let source = self.template.as_deref().unwrap_or(BINDINGS_TEMPLATE);
        env.add_template("bindings.rs", source)?;
        let template = env.get_template("bindings.rs")?;
        let view = ModuleView::new(module);
        Ok(template.render(context!(module => module, view => view, runtime => self.runtime))?)
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Serialize)]
struct ModuleView {
    omc_version: String,
    fingerprint: String,
    enumerations: Vec<EnumerationView>,
    records: Vec<RecordView>,
    aliases: Vec<AliasView>,
    methods: Vec<MethodView>,
    skipped: Vec<String>,
}

#[derive(Serialize)]
struct EnumerationView {
    ident: String,
    /// Rust string literal of the qualified name.
    type_literal: String,
    docs: Vec<String>,
    members: Vec<MemberView>,
}

#[derive(Serialize)]
struct MemberView {
    ident: String,
    literal: String,
    ordinal: usize,
    docs: Vec<String>,
}

#[derive(Serialize)]
struct RecordView {
    ident: String,
    type_literal: String,
    docs: Vec<String>,
    fields: Vec<FieldView>,
}

#[derive(Serialize)]
struct FieldView {
    ident: String,
    literal: String,
    rust_type: String,
    value_type: String,
    shape: String,
    docs: Vec<String>,
}

#[derive(Serialize)]
struct AliasView {
    ident: String,
    target: String,
    docs: Vec<String>,
}

#[derive(Serialize)]
struct ParameterView {
    ident: String,
    literal: String,
    rust_type: String,
    value_type: String,
    shape: String,
    optional: bool,
}

#[derive(Serialize)]
struct OutputView {
    value_type: String,
    shape: String,
}

#[derive(Serialize)]
struct MethodView {
    ident: String,
    docs: Vec<String>,
    parameters: Vec<ParameterView>,
    return_type: String,
    /// Set for forwarding methods.
    target: Option<String>,
    wire_literal: String,
    style: String,
    outputs: Vec<OutputView>,
}

fn literal(text: impl std::fmt::Display) -> String {
    format!("{:?}", text.to_string())
}

fn doc_lines(text: Option<&str>) -> Vec<String> {
    text.map(|t| t.lines().map(|l| l.trim_end().to_string()).collect())
        .unwrap_or_default()
}

fn primitive_rust_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Real => "f64",
        PrimitiveKind::Integer => "i64",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::String => "String",
        PrimitiveKind::TypeName | PrimitiveKind::VariableName => "rt::QualifiedName",
        PrimitiveKind::VariableNames => "Vec<rt::QualifiedName>",
    }
}

fn rust_type(ty: &TypeRef, shape: &Shape) -> String {
    let mut text = match ty {
        TypeRef::Primitive(kind) => primitive_rust_type(*kind).to_string(),
        TypeRef::Named(name) => type_ident(name),
    };
    for _ in 0..shape.rank() {
        text = format!("Vec<{}>", text);
    }
    text
}

fn value_type_expr(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive(kind) => format!("rt::ValueType::{}", kind.name()),
        TypeRef::Named(name) => format!("{}::value_type()?", type_ident(name)),
    }
}

fn shape_expr(shape: &Shape) -> String {
    if shape.is_scalar() {
        return "rt::Shape::scalar()".to_string();
    }
    let dims: Vec<String> = shape
        .dimensions()
        .iter()
        .map(|d| match d {
            Dimension::Fixed(n) => format!("rt::Dimension::Fixed({})", n),
            Dimension::Symbolic(expr) => format!("rt::Dimension::Symbolic({:?}.to_string())", expr),
            Dimension::Unbounded => "rt::Dimension::Unbounded".to_string(),
        })
        .collect();
    format!("rt::Shape::new(vec![{}])", dims.join(", "))
}

fn skipped_line(skip: &SkippedBinding) -> String {
    let kind = match skip.kind {
        SkippedKind::Function => "function",
        SkippedKind::Record => "record",
        SkippedKind::Alias => "alias",
    };
    format!("{} {}: {} is {}", kind, skip.name, skip.type_name, skip.reason)
}

impl ModuleView {
    fn new(module: &BindingModule) -> Self {
        let mut view = ModuleView {
            omc_version: module.omc_version.clone(),
            fingerprint: module.fingerprint.clone(),
            enumerations: Vec::new(),
            records: Vec::new(),
            aliases: Vec::new(),
            methods: Vec::new(),
            skipped: module.skipped.iter().map(skipped_line).collect(),
        };
        for definition in &module.types {
            match definition {
                TypeDefinition::Enumeration(e) => view.enumerations.push(enumeration(e)),
                TypeDefinition::Record(r) => view.records.push(record(r)),
                TypeDefinition::Alias(a) => view.aliases.push(alias(a)),
            }
        }
        for function in &module.functions {
            view.methods.push(match function {
                FunctionBinding::Declaration(d) => declaration(d),
                FunctionBinding::Alias(a) => {
                    let target = module.function(&a.target_method).and_then(|f| match f {
                        FunctionBinding::Declaration(d) => Some(d),
                        FunctionBinding::Alias(_) => None,
                    });
                    let mut method = match target {
                        Some(target) => declaration(target),
                        None => continue,
                    };
                    method.ident = rust_ident(&a.method);
                    method.target = Some(rust_ident(&a.target_method));
                    if let Some(comment) = &a.comment {
                        method.docs = doc_lines(Some(comment));
                    }
                    method
                }
            });
        }
        view
    }
}

fn enumeration(e: &EnumerationDefinition) -> EnumerationView {
    EnumerationView {
        ident: type_ident(&e.name),
        type_literal: literal(&e.name),
        docs: doc_lines(e.comment.as_deref()),
        members: e
            .members
            .iter()
            .map(|m| MemberView {
                ident: rust_ident(m.name.as_str()),
                literal: literal(&m.name),
                ordinal: m.ordinal,
                docs: doc_lines(m.comment.as_deref()),
            })
            .collect(),
    }
}

fn record(r: &RecordDefinition) -> RecordView {
    RecordView {
        ident: type_ident(&r.name),
        type_literal: literal(&r.name),
        docs: doc_lines(r.comment.as_deref()),
        fields: r
            .fields
            .iter()
            .map(|f| FieldView {
                ident: rust_ident(f.name.as_str()),
                literal: literal(&f.name),
                rust_type: rust_type(&f.ty, &f.shape),
                value_type: value_type_expr(&f.ty),
                shape: shape_expr(&f.shape),
                docs: doc_lines(f.comment.as_deref()),
            })
            .collect(),
    }
}

fn alias(a: &AliasDefinition) -> AliasView {
    AliasView {
        ident: type_ident(&a.name),
        target: type_ident(&a.target),
        docs: vec![format!("Alias of `{}`.", a.target)],
    }
}

fn declaration(d: &DeclarationBinding) -> MethodView {
    let mut docs = doc_lines(d.comment.as_deref());
    if !d.parameters.is_empty() {
        if !docs.is_empty() {
            docs.push(String::new());
        }
        for p in &d.parameters {
            let mut line = format!("* `{}`", p.name);
            if let Some(comment) = &p.comment {
                line.push_str(&format!(": {}", comment.replace('\n', " ")));
            }
            if let Some(default) = &p.default {
                line.push_str(&format!(" (default `{}`)", default));
            }
            docs.push(line);
        }
    }
    let outputs: Vec<String> = d.outputs.iter().map(|o| rust_type(&o.ty, &o.shape)).collect();
    let return_type = match outputs.len() {
        0 => "()".to_string(),
        1 => outputs[0].clone(),
        n if n <= MAX_TUPLE_OUTPUTS => format!("({})", outputs.join(", ")),
        _ => "rt::Value".to_string(),
    };
    MethodView {
        ident: rust_ident(&d.method),
        docs,
        parameters: d
            .parameters
            .iter()
            .map(|p| {
                let ty = rust_type(&p.ty, &p.shape);
                ParameterView {
                    ident: rust_ident(p.name.as_str()),
                    literal: literal(&p.name),
                    rust_type: if p.optional { format!("Option<{}>", ty) } else { ty },
                    value_type: value_type_expr(&p.ty),
                    shape: shape_expr(&p.shape),
                    optional: p.optional,
                }
            })
            .collect(),
        return_type,
        target: None,
        wire_literal: literal(&d.wire_name),
        style: match d.style {
            CallStyle::Positional => "Positional".to_string(),
            CallStyle::Keyword => "Keyword".to_string(),
        },
        outputs: d
            .outputs
            .iter()
            .map(|o| OutputView {
                value_type: value_type_expr(&o.ty),
                shape: shape_expr(&o.shape),
            })
            .collect(),
    }
}
