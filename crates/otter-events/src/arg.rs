//! Positional arguments passed from `emit` to listeners

use crate::error::SharedError;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A single argument of an emitted event.
///
/// Plain data travels as JSON. Errors keep their concrete type behind an
/// `Arc` so an unhandled `"error"` event can hand the very same value back
/// to the caller of `emit`.
#[derive(Clone)]
pub enum EventArg {
    Value(JsonValue),
    Error(SharedError),
}

impl EventArg {
    /// Wrap an error value.
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        EventArg::Error(Arc::new(err))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EventArg::Error(_))
    }

    pub fn as_value(&self) -> Option<&JsonValue> {
        match self {
            EventArg::Value(v) => Some(v),
            EventArg::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&SharedError> {
        match self {
            EventArg::Error(e) => Some(e),
            EventArg::Value(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(JsonValue::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(JsonValue::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(JsonValue::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(JsonValue::as_bool)
    }
}

impl fmt::Debug for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventArg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            EventArg::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
        }
    }
}

impl From<JsonValue> for EventArg {
    fn from(value: JsonValue) -> Self {
        EventArg::Value(value)
    }
}

impl From<SharedError> for EventArg {
    fn from(err: SharedError) -> Self {
        EventArg::Error(err)
    }
}

impl From<()> for EventArg {
    fn from(_: ()) -> Self {
        EventArg::Value(JsonValue::Null)
    }
}

impl From<bool> for EventArg {
    fn from(b: bool) -> Self {
        EventArg::Value(JsonValue::Bool(b))
    }
}

impl From<i32> for EventArg {
    fn from(i: i32) -> Self {
        EventArg::Value(JsonValue::from(i))
    }
}

impl From<i64> for EventArg {
    fn from(i: i64) -> Self {
        EventArg::Value(JsonValue::from(i))
    }
}

impl From<u64> for EventArg {
    fn from(u: u64) -> Self {
        EventArg::Value(JsonValue::from(u))
    }
}

impl From<f64> for EventArg {
    fn from(f: f64) -> Self {
        EventArg::Value(JsonValue::from(f))
    }
}

impl From<String> for EventArg {
    fn from(s: String) -> Self {
        EventArg::Value(JsonValue::String(s))
    }
}

impl From<&str> for EventArg {
    fn from(s: &str) -> Self {
        EventArg::Value(JsonValue::String(s.to_string()))
    }
}

impl<T: Into<EventArg>> From<Option<T>> for EventArg {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => EventArg::Value(JsonValue::Null),
        }
    }
}

/// Build an argument list for [`EventEmitter::emit`](crate::EventEmitter::emit).
///
/// ```
/// use otter_events::{args, EventArg};
///
/// let a: Vec<EventArg> = args!["chunk", 42, true];
/// assert_eq!(a.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::EventArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::EventArg::from($arg)),+]
    };
}
