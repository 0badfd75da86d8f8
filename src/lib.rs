//! Typed bindings for the OpenModelica scripting API.
//!
//! * [`interface`]: the model of the API, built from the XML the compiler exports
//! * [`generator`]: binding IR, Rust emission and a dynamic client
//! * [`session`]: the call protocol over a [`session::CommandChannel`]
//! * [`codec`] and [`grammar`]: values and their literal wire syntax
//! * [`runtime`]: what generated code imports

use std::sync::Once;

pub mod codec;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod interface;
pub mod runtime;
pub mod session;

pub use error::{Result, ScriptingError};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::init();
    });
}
