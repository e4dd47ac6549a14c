//! Error taxonomy for the command core.
//!
//! Every failure is synchronous and raised directly to the caller; nothing is
//! caught or retried inside the core. Unresolved assets are not errors at all,
//! they go through the missing-asset counters on the queue.

use thiserror::Error;

use crate::position::Axis;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid axis '{0}' for relative positioning. Use 'left' or 'top'.")]
    InvalidAxis(Axis),

    #[error("Used relative position variables {} not defined.", .0.join(", "))]
    UndeclaredVariables(Vec<String>),

    #[error("Command '{0}' cannot be used as a component")]
    NotAComponent(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CommandError {
    /// Shorthand for a [`CommandError::Validation`] with a formatted message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        CommandError::Validation(message.into())
    }
}
