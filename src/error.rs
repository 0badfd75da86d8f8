use thiserror::Error;

use crate::codec::Value;
use crate::session::report::CompilerMessages;

/// Result type used throughout the crate.
pub type Result<T, E = ScriptingError> = std::result::Result<T, E>;

/// Errors that can occur while modeling, generating or calling scripting bindings
#[derive(Error, Debug)]
pub enum ScriptingError {
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Malformed literal {text:?}: {reason}")]
    MalformedLiteral { text: String, reason: String },

    #[error("Type mismatch for '{argument}': expected {expected}, got {found}")]
    TypeMismatch {
        argument: String,
        expected: String,
        found: String,
    },

    #[error("Shape mismatch for '{argument}': expected {expected}, got {found}")]
    ShapeMismatch {
        argument: String,
        expected: String,
        found: String,
    },

    #[error("Missing required argument '{0}'")]
    MissingRequiredArgument(String),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("Record '{record}' has no element named '{element}'")]
    UnknownRecordElement { record: String, element: String },

    #[error("Record '{record}' is missing element '{element}'")]
    MissingRecordElement { record: String, element: String },

    #[error("Type identifier '{identifier}' is declared by both '{first}' and '{second}'")]
    DuplicateTypeIdentifier {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("Type '{0}' conflicts with a reserved type name")]
    ReservedNameConflict(String),

    #[error("Alias '{name}' refers to '{target}', which does not resolve")]
    UnresolvedAlias { name: String, target: String },

    #[error("Invalid interface document: {0}")]
    InvalidDocument(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Malformed error report: {0:?}")]
    MalformedErrorReport(String),

    #[error("{messages}")]
    CompilerWarning {
        messages: CompilerMessages,
        value: Box<Value>,
    },

    #[error("{0}")]
    CompilerError(CompilerMessages),

    #[error("Channel failure: {0}")]
    Channel(#[from] std::io::Error),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Template error: {0}")]
    Template(String),
}

impl ScriptingError {
    pub(crate) fn malformed(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedLiteral {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn type_mismatch(
        argument: &str,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            argument: argument.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn shape_mismatch(
        argument: &str,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::ShapeMismatch {
            argument: argument.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Whether the compiler accepted the call but reported warnings.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::CompilerWarning { .. })
    }

    /// Takes the decoded reply out of a `CompilerWarning`.
    ///
    /// Returns the error unchanged for every other variant.
    pub fn into_warning_value(self) -> Result<Value> {
        match self {
            Self::CompilerWarning { value, .. } => Ok(*value),
            other => Err(other),
        }
    }
}

impl From<minijinja::Error> for ScriptingError {
    fn from(e: minijinja::Error) -> Self {
        let detail = if let Some(line) = e.line() {
            format!("Line {}: {}", line, e)
        } else {
            format!("{}", e)
        };
        Self::Template(detail)
    }
}
