//! Session call protocol.
//!
//! A [`Session`] owns one [`CommandChannel`] and runs every call through the
//! same cycle: send the expression, take the reply, ask for the error string,
//! classify it, then decode the reply against the declared outputs.
//!
//! # Submodules
//! - `channel`: the transport seam
//! - `call`: call expressions and argument styles
//! - `report`: error string classification

pub mod call;
pub mod channel;
pub mod report;

use std::fmt;

use log::{debug, warn};

pub use call::{CallExpression, CallStyle};
pub use channel::CommandChannel;
pub use report::{CompilerMessage, CompilerMessages, ErrorReport, MessageKind, parse_error_report};

use crate::codec::{OutputSchema, Shape, Value, ValueType, decode_outputs, decode_value};
use crate::error::{Result, ScriptingError};
use crate::grammar::QualifiedName;

/// Expression sent after every call to collect its messages.
pub const ERROR_STRING_REQUEST: &str = "getErrorString()";

/// Steps of a single call, logged as the call advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Sending,
    AwaitingReply,
    CheckingError,
    Succeeded,
    Failed,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Idle => "idle",
            CallState::Sending => "sending",
            CallState::AwaitingReply => "awaiting reply",
            CallState::CheckingError => "checking error",
            CallState::Succeeded => "succeeded",
            CallState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// An open connection to the compiler.
///
/// Calls take `&mut self`, so at most one is outstanding. The channel is
/// closed exactly once, by [`Session::close`] or on drop.
pub struct Session {
    channel: Option<Box<dyn CommandChannel>>,
    state: CallState,
}

impl Session {
    pub fn new(channel: impl CommandChannel + 'static) -> Self {
        Self {
            channel: Some(Box::new(channel)),
            state: CallState::Idle,
        }
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// State of the most recent call.
    pub fn state(&self) -> CallState {
        self.state
    }

    fn transition(&mut self, next: CallState) {
        debug!("call: {} -> {}", self.state, next);
        self.state = next;
    }

    fn channel(&mut self) -> Result<&mut Box<dyn CommandChannel>> {
        self.channel.as_mut().ok_or(ScriptingError::SessionClosed)
    }

    /// Send a raw expression and return the raw reply, without error checking.
    pub fn evaluate(&mut self, expression: &str) -> Result<String> {
        debug!("send: {}", expression);
        let reply = self.channel()?.evaluate(expression)?;
        debug!("reply: {}", reply.trim_end());
        Ok(reply)
    }

    /// Fetch and trim the pending error string.
    pub fn error_string(&mut self) -> Result<String> {
        let reply = self.evaluate(ERROR_STRING_REQUEST)?;
        let value = decode_value(&reply, &ValueType::String, &Shape::scalar())?;
        Ok(value.as_str().unwrap_or_default().trim().to_string())
    }

    /// Call `function` with already cast arguments given in parameter order.
    pub fn invoke<'a, I>(
        &mut self,
        function: &str,
        style: CallStyle,
        arguments: I,
        outputs: &[OutputSchema],
    ) -> Result<Value>
    where
        I: IntoIterator<Item = (&'a str, Option<Value>)>,
    {
        let target = QualifiedName::parse(function)?;
        let call = CallExpression::from_arguments(target, style, arguments)?;
        self.call(&call, outputs)
    }

    /// Run one call through the full protocol.
    pub fn call(&mut self, call: &CallExpression, outputs: &[OutputSchema]) -> Result<Value> {
        if !self.is_open() {
            return Err(ScriptingError::SessionClosed);
        }
        self.state = CallState::Idle;
        let result = self.run(call, outputs);
        self.transition(if result.is_ok() {
            CallState::Succeeded
        } else {
            CallState::Failed
        });
        result
    }

    fn run(&mut self, call: &CallExpression, outputs: &[OutputSchema]) -> Result<Value> {
        self.transition(CallState::Sending);
        let expression = call.to_string();
        debug!("send: {}", expression);
        let channel = self.channel()?;
        let pending = channel.evaluate(&expression);
        self.transition(CallState::AwaitingReply);
        let reply = pending?;
        debug!("reply: {}", reply.trim_end());

        self.transition(CallState::CheckingError);
        let errors = self.error_string()?;
        match parse_error_report(&errors)? {
            ErrorReport::Clean => decode_outputs(&reply, outputs),
            ErrorReport::Warnings(messages) => {
                let value = decode_outputs(&reply, outputs)?;
                Err(ScriptingError::CompilerWarning {
                    messages,
                    value: Box::new(value),
                })
            }
            ErrorReport::Errors(messages) => Err(ScriptingError::CompilerError(messages)),
        }
    }

    /// Close the channel. Later calls fail with `SessionClosed`.
    pub fn close(&mut self) -> Result<()> {
        match self.channel.take() {
            Some(mut channel) => {
                debug!("closing session");
                channel.close()?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.close() {
                warn!("failed to close session channel: {}", e);
            }
        }
    }
}
