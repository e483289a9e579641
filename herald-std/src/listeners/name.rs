//! Exact event name matching.

use super::callback::Callback;
use herald_core::{DispatchError, Event, HandlerOutput, Listener};

/// Listens to events with the specified name.
#[derive(Debug, Clone)]
pub struct NameListener {
    name: String,
    callback: Callback,
}

impl NameListener {
    /// Create a listener for `name`.
    pub fn new<F, R>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::with_callback(name, Callback::new(f))
    }

    /// Create a listener from an existing callback.
    pub fn with_callback(name: impl Into<String>, callback: Callback) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }

    /// The event name this listener reacts to.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Listener for NameListener {
    fn matches(&self, event: &Event) -> bool {
        self.name == event.name()
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        self.callback.call(event)
    }
}
