//! Listener handles and the records the registry stores for them.

use crate::arg::EventArg;
use crate::emitter::EventEmitter;
use crate::error::EventResult;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

type ListenerFn = dyn Fn(&EventEmitter, &[EventArg]) -> EventResult<()> + Send + Sync;

/// Unique handler ID for tracking registrations.
static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

fn next_handler_id() -> u64 {
    NEXT_HANDLER_ID.fetch_add(1, Ordering::SeqCst)
}

/// A callable registered against an event name.
///
/// Cloning is cheap and keeps identity: two `Listener`s compare equal only
/// when they are clones of the same original. Keep a clone around to remove
/// the listener later.
#[derive(Clone)]
pub struct Listener {
    callback: Arc<ListenerFn>,
}

impl Listener {
    /// Wrap a closure as a listener.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EventEmitter, &[EventArg]) -> EventResult<()> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback with `emitter` as context.
    pub fn call(&self, emitter: &EventEmitter, args: &[EventArg]) -> EventResult<()> {
        (self.callback)(emitter, args)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("ptr", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// What a registry slot holds.
#[derive(Debug, Clone)]
pub(crate) enum HandlerKind {
    /// Registered with `on`/`add_listener`.
    Plain(Listener),

    /// Registered with `once`: the wrapper removes itself on first dispatch,
    /// then delegates to `original`.
    Once {
        original: Listener,
        fired: Arc<AtomicBool>,
    },
}

/// A registered handler record.
#[derive(Debug, Clone)]
pub(crate) struct Handler {
    pub id: u64,
    pub kind: HandlerKind,
}

impl Handler {
    pub fn plain(listener: Listener) -> Self {
        Self {
            id: next_handler_id(),
            kind: HandlerKind::Plain(listener),
        }
    }

    pub fn once(listener: Listener) -> Self {
        Self {
            id: next_handler_id(),
            kind: HandlerKind::Once {
                original: listener,
                fired: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    /// The caller-supplied listener (the original for once-wrappers).
    pub fn listener(&self) -> &Listener {
        match &self.kind {
            HandlerKind::Plain(listener) => listener,
            HandlerKind::Once { original, .. } => original,
        }
    }

    pub fn is_once(&self) -> bool {
        matches!(self.kind, HandlerKind::Once { .. })
    }

    /// Whether `remove_listener(_, listener)` should take this record out.
    pub fn matches(&self, listener: &Listener) -> bool {
        self.listener().ptr_eq(listener)
    }

    /// Run the handler for one dispatch.
    ///
    /// A once-wrapper unregisters itself before the original runs, so the
    /// original sees a registry that no longer contains it. The `fired` flag
    /// covers snapshots taken before the removal.
    pub fn invoke(
        &self,
        event: &str,
        emitter: &EventEmitter,
        args: &[EventArg],
    ) -> EventResult<()> {
        match &self.kind {
            HandlerKind::Plain(listener) => listener.call(emitter, args),
            HandlerKind::Once { original, fired } => {
                if fired.swap(true, Ordering::SeqCst) {
                    return Ok(());
                }
                emitter.remove_handler(event, self.id);
                original.call(emitter, args)
            }
        }
    }
}

/// A snapshot entry returned by
/// [`EventEmitter::raw_listeners`](crate::EventEmitter::raw_listeners).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListener {
    /// The listener the caller registered.
    pub listener: Listener,

    /// Whether it was registered through `once`/`prepend_once_listener`.
    pub once: bool,
}
