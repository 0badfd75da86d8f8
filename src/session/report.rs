//! Classification of the compiler's error string.
//!
//! After every call the session asks for `getErrorString()`. The reply is a
//! sequence of messages of the form
//!
//! ```text
//! [file.mo:1:1-1:10:writable] Warning: first line
//! continuation of the same message
//! [<interactive>:2:1] Error: second message
//! ```
//!
//! Lines that do not open a new `[...]` block belong to the previous message.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, ScriptingError};

/// Severity of one compiler message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    Warning,
    Error,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Warning => f.write_str("Warning"),
            MessageKind::Error => f.write_str("Error"),
        }
    }
}

/// One message, carried verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompilerMessage {
    /// Text between the brackets, usually a source position.
    pub info: String,
    pub kind: MessageKind,
    pub text: String,
}

impl fmt::Display for CompilerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.info, self.kind, self.text)
    }
}

/// The messages attached to one call, in reported order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompilerMessages(Vec<CompilerMessage>);

impl CompilerMessages {
    pub fn iter(&self) -> impl Iterator<Item = &CompilerMessage> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|m| m.kind == MessageKind::Error)
    }
}

impl fmt::Display for CompilerMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", message)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CompilerMessages {
    type Item = &'a CompilerMessage;
    type IntoIter = std::slice::Iter<'a, CompilerMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of one error check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorReport {
    Clean,
    Warnings(CompilerMessages),
    Errors(CompilerMessages),
}

/// Parse a trimmed error string.
pub fn parse_error_report(text: &str) -> Result<ErrorReport> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ErrorReport::Clean);
    }
    let mut messages: Vec<CompilerMessage> = Vec::new();
    for line in text.lines() {
        if line.starts_with('[') {
            messages.push(parse_header(line).ok_or_else(|| malformed(text))?);
        } else if let Some(last) = messages.last_mut() {
            last.text.push('\n');
            last.text.push_str(line);
        } else {
            return Err(malformed(text));
        }
    }
    let messages = CompilerMessages(messages);
    Ok(if messages.has_errors() {
        ErrorReport::Errors(messages)
    } else {
        ErrorReport::Warnings(messages)
    })
}

fn malformed(text: &str) -> ScriptingError {
    ScriptingError::MalformedErrorReport(text.to_string())
}

/// `[<info>] <Kind>: <message>`
fn parse_header(line: &str) -> Option<CompilerMessage> {
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let info = &rest[..close];
    let rest = rest[close + 1..].trim_start();
    let (kind, message) = rest.split_once(':')?;
    let kind = match kind.trim() {
        "Warning" => MessageKind::Warning,
        "Error" => MessageKind::Error,
        _ => return None,
    };
    Some(CompilerMessage {
        info: info.to_string(),
        kind,
        text: message.trim_start().to_string(),
    })
}
