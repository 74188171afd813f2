//! Error types for the node area
//!
//! Vetoes and unmet preconditions are not errors; they are reported through
//! [`Outcome`](crate::guard::Outcome). The variants here cover failures raised
//! by host-provided guards, notification handlers and signal pipes.

use thiserror::Error;

use crate::signals::SignalKind;

/// Result type alias using AreaError
pub type Result<T> = std::result::Result<T, AreaError>;

/// Errors that can occur in the node area
#[derive(Debug, Error)]
pub enum AreaError {
    /// A guard failed while deciding on a mutation
    #[error("Guard failed: {0}")]
    Guard(String),

    /// A notification handler failed after a mutation was committed
    #[error("Notification failed: {0}")]
    Notification(String),

    /// A signal pipe failed while processing a signal
    #[error("Pipe failed on '{kind}': {message}")]
    Pipe { kind: SignalKind, message: String },

    /// A pipe answered with a signal of a different kind
    #[error("Unexpected signal: expected '{expected}', got '{actual}'")]
    UnexpectedSignal {
        expected: SignalKind,
        actual: SignalKind,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl AreaError {
    /// Create a guard error with a message
    pub fn guard(msg: impl Into<String>) -> Self {
        Self::Guard(msg.into())
    }

    /// Create a notification error with a message
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a pipe error for the given signal kind
    pub fn pipe(kind: SignalKind, msg: impl Into<String>) -> Self {
        Self::Pipe {
            kind,
            message: msg.into(),
        }
    }
}
