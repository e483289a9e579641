//! Testing utilities for Herald.
//!
//! # Features
//!
//! - [`RecordingListener`]: A listener that records every event it handles
//! - [`CountingListener`]: A listener that counts invocations

use herald_core::{DispatchError, Event, Listener, Params};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Listener
// ============================================================================

/// A recorded event: its name and parameters at the time it was handled.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    /// The event name.
    pub name: String,
    /// The event parameters.
    pub params: Params,
}

/// A listener that records the events it handles.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::for_name("car.forward");
/// dispatcher.on(Arc::new(recorder.clone()))?;
///
/// dispatcher.notify(&Event::new("car.forward"))?;
/// assert_eq!(recorder.names(), vec!["car.forward"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    name: Option<String>,
    events: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingListener {
    /// Create a recorder that matches every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that only matches events named `name`.
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            events: Arc::default(),
        }
    }

    fn record(&self) -> MutexGuard<'_, Vec<Recorded>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<Recorded> {
        self.record().clone()
    }

    /// Names of the recorded events, in order.
    pub fn names(&self) -> Vec<String> {
        self.record().iter().map(|r| r.name.clone()).collect()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.record().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.record().clear();
    }
}

impl Listener for RecordingListener {
    fn matches(&self, event: &Event) -> bool {
        self.name.as_deref().is_none_or(|name| name == event.name())
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        self.record().push(Recorded {
            name: event.name().to_owned(),
            params: event.params().clone(),
        });
        Ok(())
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that matches every event and counts invocations.
#[derive(Debug, Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counting listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the count to zero.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Listener for CountingListener {
    fn matches(&self, _event: &Event) -> bool {
        true
    }

    fn handle(&self, _event: &Event) -> Result<(), DispatchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
