//! Error types for binding, handlers and configuration.

use thiserror::Error;

use crate::runner::binding::binder::{BindingFailure, Stage};

/// Syntax error raised by the binding expression parser. Passed through
/// unchanged by the binder.
pub type ExpressionError = pest::error::Error<crate::parser::Rule>;

/// Syntax error raised while parsing an element selector.
pub type SelectorError = pest::error::Error<crate::dom::selector::Rule>;

/// A change set rejected by a data source validator.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed: {message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError {
            message: message.into(),
        }
    }
}

/// Errors raised from inside a binding handler's lifecycle operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("{0}")]
    Message(String),
}

impl From<SelectorError> for HandlerError {
    fn from(error: SelectorError) -> Self {
        HandlerError::Dom(error.to_string())
    }
}

/// Errors surfaced by `bind` and `unbind`.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("binding expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("{stage} failed for `{directive}` bound to `{attribute}`: {source}")]
    Handler {
        directive: String,
        attribute: String,
        stage: Stage,
        #[source]
        source: HandlerError,
    },

    #[error("{} binding(s) failed during unbind", .failures.len())]
    Unbind { failures: Vec<BindingFailure> },

    #[error("binder is already bound")]
    AlreadyBound,
}

/// Errors from loading a binder configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown error policy `{0}`")]
    UnknownPolicy(String),

    #[error("context `{context}` is missing `{key}`")]
    MissingKey { context: String, key: String },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}
