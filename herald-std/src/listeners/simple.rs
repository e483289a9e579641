//! Catch-all callback listener.

use super::callback::Callback;
use herald_core::{DispatchError, Event, HandlerOutput, Listener};

/// Listens to all events.
#[derive(Debug, Clone)]
pub struct SimpleListener {
    callback: Callback,
}

impl SimpleListener {
    /// Wrap a closure.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::with_callback(Callback::new(f))
    }

    /// Wrap an existing callback.
    pub fn with_callback(callback: Callback) -> Self {
        Self { callback }
    }
}

impl Listener for SimpleListener {
    fn matches(&self, _event: &Event) -> bool {
        true
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        self.callback.call(event)
    }
}
