//! Calls driven by the binding IR at run time, without generated code.
//!
//! [`BindingClient`] performs the same steps a generated method does: cast
//! each argument against its parameter, write the call in the binding's
//! style, then decode the reply against the declared outputs.

use indexmap::IndexMap;
use log::debug;

use super::ir::{BindingModule, DeclarationBinding, FunctionBinding};
use super::types::TypeTable;
use crate::codec::{OutputSchema, Value, cast_value};
use crate::error::{Result, ScriptingError};
use crate::session::Session;

pub struct BindingClient {
    module: BindingModule,
    types: TypeTable,
    session: Session,
}

impl BindingClient {
    pub fn new(module: BindingModule, session: Session) -> Self {
        let types = TypeTable::new(&module);
        Self {
            module,
            types,
            session,
        }
    }

    pub fn module(&self) -> &BindingModule {
        &self.module
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Call the binding named `method`.
    ///
    /// `positional` fills parameters in binding order (required first);
    /// `keywords` fills the rest by name.
    pub fn call(
        &mut self,
        method: &str,
        positional: Vec<Value>,
        keywords: IndexMap<String, Value>,
    ) -> Result<Value> {
        let declaration = declaration(&self.module, method)?;
        let parameters = &declaration.parameters;
        if positional.len() > parameters.len() {
            return Err(ScriptingError::UnexpectedArgument(format!(
                "#{} of {}",
                parameters.len() + 1,
                method
            )));
        }

        let mut slots: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
        slots.resize(parameters.len(), None);
        for (name, value) in keywords {
            let index = parameters
                .iter()
                .position(|p| p.name == name.as_str())
                .ok_or_else(|| ScriptingError::UnexpectedArgument(name.clone()))?;
            if slots[index].is_some() {
                return Err(ScriptingError::UnexpectedArgument(name));
            }
            slots[index] = Some(value);
        }

        let mut arguments = Vec::with_capacity(parameters.len());
        for (parameter, slot) in parameters.iter().zip(slots) {
            let ty = self.types.value_type(&parameter.ty)?;
            let value = cast_value(
                parameter.name.as_str(),
                slot,
                parameter.optional,
                &ty,
                &parameter.shape,
            )?;
            arguments.push((parameter.name.as_str(), value));
        }
        let outputs = declaration
            .outputs
            .iter()
            .map(|o| Ok(OutputSchema::new(self.types.value_type(&o.ty)?, o.shape.clone())))
            .collect::<Result<Vec<_>>>()?;

        debug!("dynamic call {} -> {}", method, declaration.wire_name);
        self.session.invoke(
            &declaration.wire_name.to_string(),
            declaration.style,
            arguments,
            &outputs,
        )
    }
}

/// The declaration `method` runs, following a forwarding binding once.
fn declaration<'m>(module: &'m BindingModule, method: &str) -> Result<&'m DeclarationBinding> {
    let unknown = || ScriptingError::UnknownFunction(method.to_string());
    match module.function(method).ok_or_else(unknown)? {
        FunctionBinding::Declaration(d) => Ok(d),
        FunctionBinding::Alias(a) => match module.function(&a.target_method) {
            Some(FunctionBinding::Declaration(d)) => Ok(d),
            _ => Err(unknown()),
        },
    }
}
