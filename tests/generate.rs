mod common;

use omc_scripting::ScriptingError;
use omc_scripting::generator::{Emitter, FunctionBinding, SkippedKind, generate_bindings};
use omc_scripting::interface::{ModelOptions, UnsupportedReason};
use unindent::unindent;

use common::{fixture, model, module};

fn rendered() -> String {
    Emitter::new().render(&module().unwrap()).unwrap()
}

#[test]
fn test_generated_items() {
    let source = rendered();
    assert!(source.contains("pub enum Access {"));
    assert!(source.contains("    hide = 1,"));
    assert!(source.contains("    all = 3,"));
    assert!(source.contains("pub struct R {"));
    assert!(source.contains("    pub a: i64,"));
    assert!(source.contains("pub struct Client {"));
    assert!(source.contains("pub fn open_session("));
    assert!(source.contains(
        "pub fn f(&mut self, x: i64, y: Option<String>) -> Result<R, rt::ScriptingError> {"
    ));
    assert!(source.contains("rt::CallStyle::Keyword"));
    assert!(source.contains(
        "pub fn readMatrix(&mut self, fileName: String, rows: i64) \
         -> Result<Vec<Vec<f64>>, rt::ScriptingError> {"
    ));
    assert!(source.contains(
        "pub fn getVersion(&mut self, cl: Option<rt::QualifiedName>) \
         -> Result<String, rt::ScriptingError> {"
    ));
    assert!(source.contains("-> Result<(i64, f64), rt::ScriptingError> {"));
    assert!(source.contains("use omc_scripting::runtime as rt;"));
    assert!(!source.contains("pub fn eval("));
    assert!(!source.contains("pub struct Held"));
}

#[test]
fn test_alias_method_forwards() {
    let source = rendered();
    assert!(source.contains("pub fn fAlias(&mut self, x: i64, y: Option<String>)"));
    assert!(source.contains("        self.f(x, y)\n"));
}

#[test]
fn test_header_and_skips() {
    let source = rendered();
    let model = model().unwrap();
    let header = "// Generated from the scripting interface of OpenModelica 1.22.0.";
    assert!(source.starts_with(header));
    assert!(source.contains(&format!("// Interface md5: {}", model.fingerprint())));
    assert!(source.contains("//   function OpenModelica.Scripting.eval: Expression is"));
    assert!(source.contains("//   record OpenModelica.Scripting.Held: Expression is"));
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(rendered(), rendered());
    let source = fixture("interface.xml").unwrap();
    assert_eq!(
        generate_bindings(&source, &ModelOptions::new()).unwrap(),
        rendered()
    );
}

#[test]
fn test_runtime_path() {
    let source = Emitter::new()
        .runtime("crate::runtime")
        .render(&module().unwrap())
        .unwrap();
    assert!(source.contains("use crate::runtime as rt;"));
    assert!(!source.contains("omc_scripting"));
}

#[test]
fn test_module_ir() {
    let module = module().unwrap();
    let methods: Vec<&str> = module.functions.iter().map(|f| f.method()).collect();
    assert_eq!(
        methods,
        vec!["f", "fAlias", "loadFile", "getVersion", "readMatrix", "setAccess", "sizes"]
    );
    let Some(FunctionBinding::Declaration(load)) = module.function("loadFile") else {
        panic!("expected loadFile");
    };
    assert_eq!(load.parameters[1].default.as_deref(), Some("\"UTF-8\""));

    let skipped: Vec<(SkippedKind, &UnsupportedReason)> =
        module.skipped.iter().map(|s| (s.kind, &s.reason)).collect();
    assert_eq!(
        skipped,
        vec![
            (SkippedKind::Record, &UnsupportedReason::OpaqueCode),
            (SkippedKind::Function, &UnsupportedReason::OpaqueCode),
        ]
    );

    let json = serde_json::to_value(&module).unwrap();
    let alias = &json["functions"][1];
    assert_eq!(alias["kind"], "alias");
    assert_eq!(alias["target_method"], "f");
}

#[test]
fn test_document_errors_abort() {
    let duplicate = unindent(
        r#"
        <omcInterface>
          <record id="A.Foo"><components><element name="x" className="Real"/></components></record>
          <record id="B.Foo"><components><element name="y" className="Real"/></components></record>
        </omcInterface>
        "#,
    );
    assert!(matches!(
        generate_bindings(&duplicate, &ModelOptions::new()),
        Err(ScriptingError::DuplicateTypeIdentifier { identifier, .. }) if identifier == "Foo"
    ));
    assert!(matches!(
        generate_bindings("<notAnInterface/>", &ModelOptions::new()),
        Err(ScriptingError::InvalidDocument(_))
    ));
}
