#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use omc_scripting::generator::{BindingClient, BindingModule, lower};
use omc_scripting::interface::{InterfaceModel, ModelOptions};
use omc_scripting::session::{CommandChannel, Session};

/// What a [`ScriptedChannel`] saw.
#[derive(Debug, Default)]
pub struct Transcript {
    pub sent: Vec<String>,
    pub closed: usize,
}

/// Answers each request with the next scripted reply.
pub struct ScriptedChannel {
    replies: VecDeque<String>,
    transcript: Rc<RefCell<Transcript>>,
}

impl ScriptedChannel {
    pub fn new(replies: &[&str]) -> (Self, Rc<RefCell<Transcript>>) {
        let transcript = Rc::new(RefCell::new(Transcript::default()));
        let channel = Self {
            replies: replies.iter().map(|r| format!("{}\n", r)).collect(),
            transcript: transcript.clone(),
        };
        (channel, transcript)
    }
}

impl CommandChannel for ScriptedChannel {
    fn evaluate(&mut self, expression: &str) -> io::Result<String> {
        self.transcript.borrow_mut().sent.push(expression.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no reply scripted"))
    }

    fn close(&mut self) -> io::Result<()> {
        self.transcript.borrow_mut().closed += 1;
        Ok(())
    }
}

pub fn fixture(name: &str) -> anyhow::Result<String> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn model() -> anyhow::Result<InterfaceModel> {
    Ok(InterfaceModel::from_xml(
        &fixture("interface.xml")?,
        &ModelOptions::new(),
    )?)
}

pub fn module() -> anyhow::Result<BindingModule> {
    Ok(lower(&model()?))
}

/// A dynamic client over the fixture, answering with `replies`.
pub fn client(replies: &[&str]) -> anyhow::Result<(BindingClient, Rc<RefCell<Transcript>>)> {
    let (channel, transcript) = ScriptedChannel::new(replies);
    Ok((BindingClient::new(module()?, Session::new(channel)), transcript))
}
