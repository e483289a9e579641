//! Type-erased listener callbacks.

use herald_core::{BoxError, DispatchError, Event, HandlerOutput, Value};
use std::{fmt, sync::Arc};

type CallbackFn = dyn Fn(&Event) -> Result<Option<Value>, BoxError> + Send + Sync + 'static;

/// A closure invoked with the event being dispatched.
///
/// Any closure returning a [`HandlerOutput`] can be turned into a callback. A
/// `Some` output becomes the event's return value.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<CallbackFn>,
}

impl Callback {
    /// Wrap a closure.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self {
            inner: Arc::new(move |event: &Event| f(event).into_outcome()),
        }
    }

    /// Run the callback and store its output on the event.
    pub fn call(&self, event: &Event) -> Result<(), DispatchError> {
        if let Some(value) = (self.inner)(event).map_err(DispatchError::Listener)? {
            event.set_return_value(value);
        }
        Ok(())
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}
