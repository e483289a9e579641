//! Namespaced event creation and dispatch.

use crate::dispatcher::{EventDispatcher, OnHandled};
use herald_core::{DispatchError, Event, Params, Sender};
use std::{fmt, sync::Arc};

/// Builds the events a [`Notifier`] dispatches.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot create events for a Notifier",
    label = "missing `EventFactory` implementation",
    note = "closures of type `Fn(Option<Sender>, String, Params) -> Event` implement `EventFactory`"
)]
pub trait EventFactory: Send + Sync + 'static {
    /// Create an event. `name` already carries the notifier prefix.
    fn create(&self, sender: Option<Sender>, name: String, params: Params) -> Event;
}

/// Creates plain [`Event`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEventFactory;

impl EventFactory for DefaultEventFactory {
    fn create(&self, sender: Option<Sender>, name: String, params: Params) -> Event {
        Event::from_parts(sender, name, params)
    }
}

impl<F> EventFactory for F
where
    F: Fn(Option<Sender>, String, Params) -> Event + Send + Sync + 'static,
{
    fn create(&self, sender: Option<Sender>, name: String, params: Params) -> Event {
        self(sender, name, params)
    }
}

/// Creates and dispatches events on behalf of one sender.
///
/// Every event name is prefixed with [`prefix`](Notifier::prefix), and the
/// bound sender is attached to every event.
///
/// # Example
///
/// ```rust,ignore
/// let notifier = Notifier::new(dispatcher.clone())
///     .with_sender(Arc::new(car))
///     .with_prefix("car.");
///
/// let event = notifier.notify("forward", Params::new())?;
/// let accepted = event.return_value_or(true);
/// ```
#[derive(Clone)]
pub struct Notifier {
    dispatcher: Arc<EventDispatcher>,
    sender: Option<Sender>,
    prefix: String,
    factory: Arc<dyn EventFactory>,
}

impl Notifier {
    /// Create a notifier without sender or prefix.
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            dispatcher,
            sender: None,
            prefix: String::new(),
            factory: Arc::new(DefaultEventFactory),
        }
    }

    /// Set the sender attached to every event.
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the event name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the factory used to create events.
    pub fn with_factory(mut self, factory: impl EventFactory) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// The dispatcher events are sent to.
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Replace the dispatcher.
    pub fn set_dispatcher(&mut self, dispatcher: Arc<EventDispatcher>) -> &mut Self {
        self.dispatcher = dispatcher;
        self
    }

    /// The sender attached to every event.
    pub fn sender(&self) -> Option<&Sender> {
        self.sender.as_ref()
    }

    /// Replace or clear the sender.
    pub fn set_sender(&mut self, sender: Option<Sender>) -> &mut Self {
        self.sender = sender;
        self
    }

    /// The event name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace the event name prefix.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the event factory.
    pub fn set_factory(&mut self, factory: impl EventFactory) -> &mut Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Create an event named `prefix + name` without dispatching it.
    pub fn create_event(&self, name: &str, params: Params) -> Event {
        self.factory
            .create(self.sender.clone(), format!("{}{name}", self.prefix), params)
    }

    /// Create and dispatch an event, then hand it back for inspection.
    pub fn notify(&self, name: &str, params: Params) -> Result<Event, DispatchError> {
        let event = self.create_event(name, params);
        self.dispatcher.notify(&event)?;
        Ok(event)
    }

    /// Create an event and dispatch it until a listener handles it.
    ///
    /// The event is returned right away, handled or not. If it was deferred,
    /// it will be delivered when a matching listener is added.
    pub fn notify_until(
        &self,
        name: &str,
        params: Params,
        on_handled: Option<OnHandled>,
    ) -> Result<Arc<Event>, DispatchError> {
        let event = Arc::new(self.create_event(name, params));
        self.dispatcher.notify_until(event.clone(), on_handled)?;
        Ok(event)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("dispatcher", &self.dispatcher)
            .field("has_sender", &self.sender.is_some())
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
