//! Call expressions sent over the channel.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::codec::{Value, to_literal};
use crate::error::{Result, ScriptingError};
use crate::grammar::{Identifier, QualifiedName};

/// How arguments are written in a call expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStyle {
    /// `f(1, "a")`; used when the function has no optional inputs.
    Positional,
    /// `f(x=1, y="a")`; absent optional arguments are left out.
    Keyword,
}

/// `<target>(<positional>, <name>=<literal>, ...)`
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpression {
    pub target: QualifiedName,
    pub positional: Vec<String>,
    pub keywords: IndexMap<Identifier, Option<String>>,
}

impl CallExpression {
    pub fn new(target: QualifiedName) -> Self {
        Self {
            target,
            positional: Vec::new(),
            keywords: IndexMap::new(),
        }
    }

    pub fn positional(mut self, literal: impl Into<String>) -> Self {
        self.positional.push(literal.into());
        self
    }

    pub fn keyword(mut self, name: Identifier, literal: Option<String>) -> Self {
        self.keywords.insert(name, literal);
        self
    }

    /// Build a call from already cast arguments, in parameter order.
    ///
    /// In positional style every argument must be present.
    pub fn from_arguments<'a, I>(
        target: QualifiedName,
        style: CallStyle,
        arguments: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Option<Value>)>,
    {
        let mut call = Self::new(target);
        for (name, value) in arguments {
            let literal = value
                .map(|v| to_literal(name, &v).map(|l| l.to_string()))
                .transpose()?;
            call = match (style, literal) {
                (CallStyle::Positional, Some(literal)) => call.positional(literal),
                (CallStyle::Positional, None) => {
                    return Err(ScriptingError::MissingRequiredArgument(name.to_string()));
                }
                (CallStyle::Keyword, literal) => call.keyword(Identifier::new(name)?, literal),
            };
        }
        Ok(call)
    }

    /// Whether the keyword `name` is written into the expression.
    pub fn mentions(&self, name: &str) -> bool {
        self.keywords
            .iter()
            .any(|(key, literal)| *key == name && literal.is_some())
    }
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.target)?;
        let keywords = self
            .keywords
            .iter()
            .filter_map(|(name, literal)| literal.as_ref().map(|l| format!("{}={}", name, l)));
        let arguments: Vec<String> = self.positional.iter().cloned().chain(keywords).collect();
        f.write_str(&arguments.join(", "))?;
        f.write_str(")")
    }
}
