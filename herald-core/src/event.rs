//! The event record passed through every dispatch pass.
//!
//! An [`Event`] has two halves:
//!
//! - **Occurrence data**: sender, name and parameters. Fixed once the event is
//!   built; the builder methods take `self` by value so nothing can change them
//!   after the event has been handed to a dispatcher.
//! - **Response state**: return value, cancelled flag and propagation flag.
//!   Listeners write these through a shared `&Event`, so they live behind
//!   interior mutability.

use serde_json::Value;
use std::{
    any::Any,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

/// Event parameters, keyed by name.
pub type Params = serde_json::Map<String, Value>;

/// The object that raised an event.
pub type Sender = Arc<dyn Any + Send + Sync>;

/// An occurrence of a named event.
///
/// # Example
///
/// ```rust,ignore
/// let event = Event::new("car.turn.left").with_param("degree", 45);
/// dispatcher.notify(&event)?;
///
/// if event.is_cancelled() { /* ... */ }
/// let degree = event.return_value_or(45);
/// ```
pub struct Event {
    sender: Option<Sender>,
    name: String,
    params: Params,
    return_value: Mutex<Option<Value>>,
    cancelled: AtomicBool,
    propagation_stopped: AtomicBool,
}

impl Event {
    /// Create an event with no sender and no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(None, name, Params::new())
    }

    /// Create an event from all of its occurrence data at once.
    pub fn from_parts(sender: Option<Sender>, name: impl Into<String>, params: Params) -> Self {
        Self {
            sender,
            name: name.into(),
            params,
            return_value: Mutex::new(None),
            cancelled: AtomicBool::new(false),
            propagation_stopped: AtomicBool::new(false),
        }
    }

    /// Set the sender.
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Replace all parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Add a single parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The object which raised the event, if any.
    pub fn sender(&self) -> Option<&Sender> {
        self.sender.as_ref()
    }

    /// The sender downcast to a concrete type.
    pub fn sender_as<T: Any>(&self) -> Option<&T> {
        self.sender.as_deref()?.downcast_ref::<T>()
    }

    /// The event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a parameter.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Get a parameter, or `default` if the event does not carry it.
    pub fn param_or(&self, name: &str, default: impl Into<Value>) -> Value {
        match self.params.get(name) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Check if a parameter exists.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// All parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Store the response value. Overwrites any previous one.
    pub fn set_return_value(&self, value: impl Into<Value>) -> &Self {
        *self.slot() = Some(value.into());
        self
    }

    /// Forget the response value.
    pub fn clear_return_value(&self) -> &Self {
        *self.slot() = None;
        self
    }

    /// The response value, if one was set since the last clear.
    ///
    /// A stored `Value::Null` is still a response.
    pub fn return_value(&self) -> Option<Value> {
        self.slot().clone()
    }

    /// The response value, or `default` if none was set.
    pub fn return_value_or(&self, default: impl Into<Value>) -> Value {
        match self.slot().as_ref() {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Check if a response value was set.
    pub fn has_return_value(&self) -> bool {
        self.slot().is_some()
    }

    /// Mark the event as cancelled (or not).
    ///
    /// Purely advisory: dispatchers never look at this flag.
    pub fn cancel(&self, cancelled: bool) -> &Self {
        self.cancelled.store(cancelled, Ordering::Release);
        self
    }

    /// Check if the event was marked as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Stop the propagation to the remaining listeners of the current pass.
    pub fn stop_propagation(&self) -> &Self {
        self.propagation_stopped.store(true, Ordering::Release);
        self
    }

    /// Check if propagation was stopped.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::Acquire)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Value>> {
        self.return_value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("has_sender", &self.sender.is_some())
            .field("params", &self.params)
            .field("return_value", &*self.slot())
            .field("cancelled", &self.is_cancelled())
            .field("propagation_stopped", &self.is_propagation_stopped())
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
