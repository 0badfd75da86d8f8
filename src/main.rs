use std::fs;

use anyhow::Context;
use clap::Parser;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::{
    self,
    termcolor::{ColorChoice, StandardStream},
};
use log::info;

use omc_scripting::generator::{BindingModule, Emitter, lower};
use omc_scripting::interface::{DEFAULT_ROOT, InterfaceModel, ModelOptions};

#[derive(Parser, Debug)]
#[command(version, about = "OpenModelica scripting binding generator", long_about = None)]
struct Args {
    /// Interface document exported by the compiler
    #[arg(name = "INTERFACE_XML")]
    interface_xml: String,

    /// Write the generated module here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Package whose functions become methods
    #[arg(short, long, default_value = DEFAULT_ROOT)]
    root: String,

    /// Renders this template instead of the built-in one
    #[arg(short, long)]
    template: Option<String>,

    /// Dump the binding IR as JSON instead of Rust source
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print a diagnostic for every skipped binding
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn report_skips(path: &str, source: &str, module: &BindingModule) -> anyhow::Result<()> {
    let file = SimpleFile::new(path, source);
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    for skip in &module.skipped {
        let diagnostic = Diagnostic::warning()
            .with_message(format!("{} not generated", skip.name))
            .with_labels(vec![
                Label::primary((), skip.span.clone())
                    .with_message(format!("{} is {}", skip.type_name, skip.reason)),
            ]);
        term::emit(&mut writer.lock(), &config, &file, &diagnostic)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    omc_scripting::init_logger();
    let args = Args::parse();

    let source = fs::read_to_string(&args.interface_xml)
        .with_context(|| format!("failed to read {}", args.interface_xml))?;
    let options = ModelOptions::new().root(args.root.as_str());
    let model = InterfaceModel::from_xml(&source, &options)
        .with_context(|| format!("failed to model {}", args.interface_xml))?;
    let module = lower(&model);

    if args.verbose {
        report_skips(&args.interface_xml, &source, &module)?;
    }

    let text = if args.json {
        serde_json::to_string_pretty(&module)?
    } else {
        let mut emitter = Emitter::new();
        if let Some(path) = &args.template {
            let template = fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path))?;
            emitter = emitter.template(template);
        }
        emitter.render(&module)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path))?;
            info!("wrote {}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
