//! Event emitter error types

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error produced by listener code.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Shared error value carried in an `"error"` event payload.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Result type for emitter operations.
pub type EventResult<T> = Result<T, EventError>;

#[derive(Debug, Error)]
pub enum EventError {
    /// `"error"` was emitted with no listeners and a payload that is not an error.
    #[error("Uncaught 'error' event")]
    UncaughtErrorEvent,

    /// `"error"` was emitted with no listeners; this is the payload, untouched.
    #[error(transparent)]
    Unhandled(SharedError),

    /// A listener failed while the event was being dispatched.
    #[error(transparent)]
    Listener(BoxError),
}

impl EventError {
    /// Wrap an arbitrary error raised inside a listener.
    pub fn listener<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        EventError::Listener(err.into())
    }

    /// The error re-raised from an unhandled `"error"` event, if any.
    pub fn unhandled(&self) -> Option<&SharedError> {
        match self {
            EventError::Unhandled(err) => Some(err),
            _ => None,
        }
    }
}
