//! Builder for [`EventDispatcher`].

use super::{EventDispatcher, Subscription};
use herald_core::{HeraldError, RegistrationMeta, SharedListener};

/// Collects subscriptions and builds a dispatcher from them.
///
/// Subscriptions are registered in the order they were added, so ties in
/// priority resolve the same way as with successive calls to
/// [`EventDispatcher::on_with`].
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    entries: Vec<(Subscription, RegistrationMeta)>,
}

impl DispatcherBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a subscription with default metadata.
    pub fn subscribe(self, subscription: impl Into<Subscription>) -> Self {
        self.subscribe_with(subscription, RegistrationMeta::new())
    }

    /// Add a subscription with specified metadata.
    pub fn subscribe_with(
        mut self,
        subscription: impl Into<Subscription>,
        meta: RegistrationMeta,
    ) -> Self {
        self.subscribe_with_mut(subscription, meta);
        self
    }

    /// Add a subscription with specified metadata (mutable version).
    pub fn subscribe_with_mut(
        &mut self,
        subscription: impl Into<Subscription>,
        meta: RegistrationMeta,
    ) {
        self.entries.push((subscription.into(), meta));
    }

    /// Add a subscription with priority.
    pub fn subscribe_with_priority(self, subscription: impl Into<Subscription>, priority: i32) -> Self {
        self.subscribe_with(subscription, RegistrationMeta::new().with_priority(priority))
    }

    /// Add a ready-made listener.
    pub fn listener(self, listener: SharedListener, meta: RegistrationMeta) -> Self {
        self.subscribe_with(Subscription::Listener(listener), meta)
    }

    /// Get the number of collected subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the builder is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the dispatcher.
    ///
    /// Fails on the first subscription that cannot become a listener.
    pub fn build(self) -> Result<EventDispatcher, HeraldError> {
        let dispatcher = EventDispatcher::new();
        for (subscription, meta) in self.entries {
            dispatcher.on_with(subscription, meta)?;
        }
        Ok(dispatcher)
    }
}
