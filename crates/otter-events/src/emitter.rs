//! EventEmitter implementation.
//!
//! Listeners are grouped by event name and called synchronously, in
//! registration order, by [`EventEmitter::emit`].
//!
//! # Example
//!
//! ```
//! use otter_events::{args, EventEmitter, Listener};
//!
//! let emitter = EventEmitter::new();
//! let on_data = Listener::new(|_, args| {
//!     println!("{:?}", args[0].as_str());
//!     Ok(())
//! });
//!
//! emitter.on("data", on_data.clone());
//! assert!(emitter.emit("data", &args!["Hello!"]).unwrap());
//!
//! emitter.off("data", &on_data);
//! assert!(!emitter.emit("data", &args!["ignored"]).unwrap());
//! ```

use crate::arg::EventArg;
use crate::error::{EventError, EventResult};
use crate::listener::{Handler, Listener, RawListener};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Default maximum number of listeners per event.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Event name that fails loudly when emitted without listeners.
pub const ERROR_EVENT: &str = "error";

/// Emitter configuration
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Listeners per event before a leak warning is logged (0 = unlimited, default: 10)
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

/// Listener registry behind an [`EventEmitter`].
///
/// Every method here runs under the emitter's lock and never calls a
/// listener. Keys only exist while their handler list is non-empty.
#[derive(Debug)]
pub struct EventEmitterState {
    /// Handlers indexed by event name, in dispatch order.
    handlers: HashMap<String, Vec<Handler>>,

    /// Maximum listeners per event (0 = unlimited).
    max_listeners: usize,

    /// Events already reported as exceeding `max_listeners`.
    warned: HashSet<String>,
}

impl EventEmitterState {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Create an empty registry with custom config.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            handlers: HashMap::new(),
            max_listeners: config.max_listeners,
            warned: HashSet::new(),
        }
    }

    /// Set the maximum number of listeners per event.
    pub fn set_max_listeners(&mut self, n: usize) {
        self.max_listeners = n;
    }

    /// Get the maximum number of listeners per event.
    pub fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    /// Append a listener for an event. Returns whether a max listeners
    /// warning should be emitted.
    pub fn add_listener(&mut self, event: &str, listener: Listener) -> bool {
        self.add_handler(event, Handler::plain(listener), false)
    }

    /// Append a one-time listener for an event.
    pub fn once(&mut self, event: &str, listener: Listener) -> bool {
        self.add_handler(event, Handler::once(listener), false)
    }

    /// Insert a listener ahead of the existing ones.
    pub fn prepend_listener(&mut self, event: &str, listener: Listener) -> bool {
        self.add_handler(event, Handler::plain(listener), true)
    }

    /// Insert a one-time listener ahead of the existing ones.
    pub fn prepend_once_listener(&mut self, event: &str, listener: Listener) -> bool {
        self.add_handler(event, Handler::once(listener), true)
    }

    /// Add a handler record. Returns whether this registration should
    /// trigger the max-listeners warning.
    pub(crate) fn add_handler(&mut self, event: &str, handler: Handler, prepend: bool) -> bool {
        let handlers = self.handlers.entry(event.to_string()).or_default();

        if prepend {
            handlers.insert(0, handler);
        } else {
            handlers.push(handler);
        }

        let exceeded = self.max_listeners > 0 && handlers.len() > self.max_listeners;
        exceeded && self.warned.insert(event.to_string())
    }

    /// Remove the last handler matching `listener`, scanning from the back.
    /// Returns true if a handler was removed.
    pub fn remove_listener(&mut self, event: &str, listener: &Listener) -> bool {
        let Some(handlers) = self.handlers.get_mut(event) else {
            return false;
        };
        let Some(pos) = handlers.iter().rposition(|h| h.matches(listener)) else {
            return false;
        };

        handlers.remove(pos);
        if handlers.is_empty() {
            self.handlers.remove(event);
            self.warned.remove(event);
        }
        true
    }

    /// Remove the handler record with the given ID.
    pub(crate) fn remove_handler(&mut self, event: &str, id: u64) -> bool {
        let Some(handlers) = self.handlers.get_mut(event) else {
            return false;
        };
        let Some(pos) = handlers.iter().rposition(|h| h.id == id) else {
            return false;
        };

        handlers.remove(pos);
        if handlers.is_empty() {
            self.handlers.remove(event);
            self.warned.remove(event);
        }
        true
    }

    /// Remove all handlers for an event, or all events if `event` is None.
    /// Returns how many were removed.
    pub fn remove_all_listeners(&mut self, event: Option<&str>) -> usize {
        match event {
            Some(event_name) => {
                self.warned.remove(event_name);
                self.handlers
                    .remove(event_name)
                    .map(|handlers| handlers.len())
                    .unwrap_or(0)
            }
            None => {
                self.warned.clear();
                self.handlers.drain().map(|(_, handlers)| handlers.len()).sum()
            }
        }
    }

    /// Copy of the handler list for a single dispatch pass.
    pub(crate) fn snapshot(&self, event: &str) -> Vec<Handler> {
        self.handlers.get(event).cloned().unwrap_or_default()
    }

    /// Get listeners for an event in the order they will be called.
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.handlers
            .get(event)
            .map(|h| h.iter().map(|handler| handler.listener().clone()).collect())
            .unwrap_or_default()
    }

    /// Like [`listeners`](Self::listeners), but flags once-registrations.
    pub fn raw_listeners(&self, event: &str) -> Vec<RawListener> {
        self.handlers
            .get(event)
            .map(|h| {
                h.iter()
                    .map(|handler| RawListener {
                        listener: handler.listener().clone(),
                        once: handler.is_once(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of listeners for an event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.handlers.get(event).map(|h| h.len()).unwrap_or(0)
    }

    /// Total number of listeners across all events.
    pub fn total_listener_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Get all event names that have listeners, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for EventEmitterState {
    fn default() -> Self {
        Self::new()
    }
}

/// Synchronous, thread-safe event emitter.
///
/// Clones share the same registry. The lock is only held while the registry
/// is read or changed, never while a listener runs, so listeners may freely
/// call back into the emitter that invoked them.
#[derive(Debug, Clone, Default)]
pub struct EventEmitter {
    state: Arc<Mutex<EventEmitterState>>,
}

impl EventEmitter {
    /// Create a new EventEmitter.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Create a new EventEmitter with custom config.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(EventEmitterState::with_config(config))),
        }
    }

    /// Set max listeners.
    pub fn set_max_listeners(&self, n: usize) -> &Self {
        self.state.lock().set_max_listeners(n);
        self
    }

    /// Get max listeners.
    pub fn max_listeners(&self) -> usize {
        self.state.lock().max_listeners()
    }

    /// Append `listener` to the listeners of `event`.
    pub fn add_listener(&self, event: &str, listener: Listener) -> &Self {
        self.register(event, Handler::plain(listener), false)
    }

    /// Alias for [`add_listener`](Self::add_listener).
    pub fn on(&self, event: &str, listener: Listener) -> &Self {
        self.add_listener(event, listener)
    }

    /// Register `listener` to run on the next `event` only.
    pub fn once(&self, event: &str, listener: Listener) -> &Self {
        self.register(event, Handler::once(listener), false)
    }

    /// Insert `listener` ahead of every existing listener of `event`.
    pub fn prepend_listener(&self, event: &str, listener: Listener) -> &Self {
        self.register(event, Handler::plain(listener), true)
    }

    /// Insert a one-time `listener` ahead of every existing listener of `event`.
    pub fn prepend_once_listener(&self, event: &str, listener: Listener) -> &Self {
        self.register(event, Handler::once(listener), true)
    }

    fn register(&self, event: &str, handler: Handler, prepend: bool) -> &Self {
        let once = handler.is_once();
        let (should_warn, count, max) = {
            let mut state = self.state.lock();
            let should_warn = state.add_handler(event, handler, prepend);
            (should_warn, state.listener_count(event), state.max_listeners())
        };

        tracing::trace!(event, once, prepend, count, "listener added");
        if should_warn {
            tracing::warn!(
                event,
                count,
                max,
                "possible EventEmitter memory leak detected: {count} {event} listeners added, use set_max_listeners() to increase limit"
            );
        }
        self
    }

    /// Remove the most recently added registration of `listener` for `event`.
    ///
    /// Matches both plain registrations and `once` registrations that have
    /// not fired yet. Removing an unknown listener is a no-op.
    pub fn remove_listener(&self, event: &str, listener: &Listener) -> &Self {
        let removed = self.state.lock().remove_listener(event, listener);
        if removed {
            tracing::trace!(event, "listener removed");
        }
        self
    }

    /// Alias for [`remove_listener`](Self::remove_listener).
    pub fn off(&self, event: &str, listener: &Listener) -> &Self {
        self.remove_listener(event, listener)
    }

    /// Remove every listener of `event`, or of every event when `None`.
    pub fn remove_all_listeners(&self, event: Option<&str>) -> &Self {
        let removed = self.state.lock().remove_all_listeners(event);
        tracing::trace!(event, removed, "listeners cleared");
        self
    }

    pub(crate) fn remove_handler(&self, event: &str, id: u64) -> bool {
        self.state.lock().remove_handler(event, id)
    }

    /// Get listeners for an event.
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.state.lock().listeners(event)
    }

    /// Get listeners for an event, flagging once-registrations.
    pub fn raw_listeners(&self, event: &str) -> Vec<RawListener> {
        self.state.lock().raw_listeners(event)
    }

    /// Get listener count for an event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.state.lock().listener_count(event)
    }

    /// Get listener count across all events.
    pub fn total_listener_count(&self) -> usize {
        self.state.lock().total_listener_count()
    }

    /// Get all event names.
    pub fn event_names(&self) -> Vec<String> {
        self.state.lock().event_names()
    }

    /// Call every listener of `event` with `args`.
    ///
    /// Returns `Ok(true)` if the event had listeners and `Ok(false)` otherwise.
    /// The listener list is copied before the first call, so listeners added
    /// or removed while dispatching only affect later emits. The first
    /// listener error stops the dispatch and is returned as is.
    ///
    /// Emitting [`ERROR_EVENT`] with no listeners is an error: the first
    /// argument is returned as [`EventError::Unhandled`] if it is an error
    /// value, otherwise [`EventError::UncaughtErrorEvent`].
    pub fn emit(&self, event: &str, args: &[EventArg]) -> EventResult<bool> {
        let handlers = self.state.lock().snapshot(event);

        if handlers.is_empty() {
            if event == ERROR_EVENT {
                return Err(match args.first() {
                    Some(EventArg::Error(err)) => EventError::Unhandled(err.clone()),
                    _ => EventError::UncaughtErrorEvent,
                });
            }
            return Ok(false);
        }

        tracing::trace!(event, listeners = handlers.len(), "emit");
        for handler in &handlers {
            handler.invoke(event, self, args)?;
        }

        Ok(true)
    }
}
