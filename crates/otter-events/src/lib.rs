//! Otter Events - synchronous EventEmitter
//!
//! Register listeners against event names and dispatch events to them in
//! registration order. Dispatch happens on the caller's stack; listeners may
//! call back into the emitter while it is dispatching.
//!
//! # Usage
//!
//! ```
//! use otter_events::{args, EventEmitter, EventError, Listener};
//!
//! let emitter = EventEmitter::new();
//!
//! emitter
//!     .on("data", Listener::new(|_, args| {
//!         assert_eq!(args[0].as_str(), Some("chunk"));
//!         Ok(())
//!     }))
//!     .once("end", Listener::new(|_, _| Ok(())));
//!
//! assert!(emitter.emit("data", &args!["chunk"]).unwrap());
//! assert!(emitter.emit("end", &[]).unwrap());
//! assert!(!emitter.emit("end", &[]).unwrap());
//!
//! // Unhandled "error" events fail loudly
//! let err = emitter.emit("error", &args!["oops"]).unwrap_err();
//! assert!(matches!(err, EventError::UncaughtErrorEvent));
//! ```

mod arg;
mod emitter;
mod error;
mod listener;

pub use arg::EventArg;
pub use emitter::{
    DEFAULT_MAX_LISTENERS, ERROR_EVENT, EmitterConfig, EventEmitter, EventEmitterState,
};
pub use error::{BoxError, EventError, EventResult, SharedError};
pub use listener::{Listener, RawListener};
