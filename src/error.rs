//! Errors carried through the dispatch chain.
//!
//! A handler that fails hands an [`Error`] back to the traversal via
//! [`Flow::Fail`](crate::routing::Flow::Fail). The error then skips every plain
//! layer until an error handler consumes it or it reaches the final handler,
//! which uses [`Error::status`] to pick the response code.

use axum::http::StatusCode;
use thiserror::Error;

/// Boxed error accepted from handler code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can propagate through a router.
#[derive(Debug, Error)]
pub enum Error {
    /// Plain failure message raised by a handler.
    #[error("{0}")]
    Message(String),

    /// Failure that carries the status the final handler should respond with.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// A handler panicked while being invoked or polled.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// Any other error raised by handler code.
    #[error(transparent)]
    Other(BoxError),
}

impl Error {
    /// Create an error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// Create an error that renders with the given status code.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Status {
            status,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error.
    pub fn other(err: impl Into<BoxError>) -> Self {
        Error::Other(err.into())
    }

    /// Status code the final handler uses for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Status { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Error::Panic(message)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Other(Box::new(err))
    }
}
