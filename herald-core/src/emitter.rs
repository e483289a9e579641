//! Registration metadata and the emitter interface.

use crate::{
    error::HeraldError,
    listener::{Listener, SharedListener},
};

/// Metadata for a registered listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationMeta {
    /// Priority (higher = invoked earlier). Default is 0.
    pub priority: i32,
    /// Invoke ahead of listeners already registered with the same priority.
    pub important: bool,
}

impl RegistrationMeta {
    /// Create default metadata: priority 0, not important.
    pub const fn new() -> Self {
        Self {
            priority: 0,
            important: false,
        }
    }

    /// Set priority.
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark as important.
    pub const fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// Objects which accept listeners.
///
/// This is the surface that wrappers around a dispatcher (objects emitting
/// their own events) are expected to expose.
pub trait EventEmitter {
    /// Add a listener.
    fn add_listener(
        &self,
        listener: SharedListener,
        meta: RegistrationMeta,
    ) -> Result<(), HeraldError>;

    /// Remove a listener by identity. Returns whether it was registered.
    fn remove_listener(&self, listener: &dyn Listener) -> bool;
}
