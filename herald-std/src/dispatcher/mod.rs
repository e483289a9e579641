//! # EventDispatcher
//!
//! Owns an ordered set of listeners and delivers events to them.
//!
//! # Dispatch
//!
//! A pass walks the listeners in priority order. Each listener is asked
//! whether it matches; matched listeners handle the event. The pass ends
//! early once a handler calls [`Event::stop_propagation`]. The cancelled flag
//! is advisory and never consulted here.
//!
//! # Deferred delivery
//!
//! [`EventDispatcher::notify_until`] keeps events nobody handled and retries
//! them every time a listener is added, so an event raised before its listener
//! exists is still delivered once the listener shows up. Listeners added by a
//! handler during a retry trigger another walk of the whole queue.
//!
//! # Re-entrancy
//!
//! The internal lock is released before any listener runs. Handlers may
//! notify, register or remove listeners on the same dispatcher; a pass keeps
//! working on the listeners present when it started.

mod builder;
mod registry;
mod subscription;

pub use builder::DispatcherBuilder;
pub use subscription::Subscription;

use herald_core::{
    DispatchError, Event, EventEmitter, HeraldError, Listener, RegistrationError,
    RegistrationMeta, SharedListener,
};
use registry::Registry;
use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Called once a deferred event has been handled.
pub type OnHandled = Box<dyn FnOnce(&Event) + Send + 'static>;

struct PendingEvent {
    event: Arc<Event>,
    on_handled: Option<OnHandled>,
}

impl PendingEvent {
    fn fire(self) {
        if let Some(on_handled) = self.on_handled {
            on_handled(&self.event);
        }
    }
}

#[derive(Default)]
struct DispatcherState {
    registry: Registry,
    pending: VecDeque<PendingEvent>,
    /// A replay is walking the deferred events.
    replaying: bool,
    /// A listener was added while replaying; the walk must start over.
    rescan: bool,
}

/// Clears the replay flag if a listener panics mid-replay.
struct ReplayGuard<'a> {
    dispatcher: &'a EventDispatcher,
    finished: bool,
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.dispatcher.state();
            state.replaying = false;
            state.rescan = false;
        }
    }
}

/// Delivers events to listeners in priority order.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = EventDispatcher::new();
/// dispatcher.on(Subscription::pattern("car.*", |e: &Event| {
///     println!("something happened to the car: {e}");
/// }))?;
///
/// dispatcher.notify(&Event::new("car.forward"))?;
/// ```
#[derive(Default)]
pub struct EventDispatcher {
    state: Mutex<DispatcherState>,
}

impl EventDispatcher {
    /// Create a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Create a dispatcher with a set of subscriptions, in order.
    pub fn with_subscriptions(
        subscriptions: impl IntoIterator<Item = Subscription>,
    ) -> Result<Self, HeraldError> {
        let dispatcher = Self::new();
        for subscription in subscriptions {
            dispatcher.on(subscription)?;
        }
        Ok(dispatcher)
    }

    fn state(&self) -> MutexGuard<'_, DispatcherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscription with default metadata.
    ///
    /// Returns the listeners that were added, so they can be removed later.
    pub fn on(&self, subscription: impl Into<Subscription>) -> Result<Vec<SharedListener>, HeraldError> {
        self.on_with(subscription, RegistrationMeta::new())
    }

    /// Register a subscription.
    ///
    /// Either every listener of the subscription is registered or none is:
    /// listeners are built and checked first, then inserted together. Deferred
    /// events are retried once, after the last insertion. A listener error
    /// during that retry is returned, but the listeners stay registered.
    pub fn on_with(
        &self,
        subscription: impl Into<Subscription>,
        meta: RegistrationMeta,
    ) -> Result<Vec<SharedListener>, HeraldError> {
        let listeners = subscription.into().into_listeners()?;
        self.insert_all(&listeners, meta)?;
        self.replay_pending()?;
        Ok(listeners)
    }

    /// Add a listener, then retry the deferred events.
    ///
    /// Fails with [`RegistrationError::SelfReference`] if `listener` is this
    /// dispatcher. A listener error during the retry is returned, but the
    /// listener stays registered.
    pub fn add_listener(
        &self,
        listener: SharedListener,
        meta: RegistrationMeta,
    ) -> Result<(), HeraldError> {
        self.insert_all(std::slice::from_ref(&listener), meta)?;
        self.replay_pending()?;
        Ok(())
    }

    /// Add several listeners with default metadata.
    ///
    /// Nothing is added if one of them is this dispatcher.
    pub fn add_listeners(
        &self,
        listeners: impl IntoIterator<Item = SharedListener>,
    ) -> Result<(), HeraldError> {
        let listeners: Vec<_> = listeners.into_iter().collect();
        self.insert_all(&listeners, RegistrationMeta::new())?;
        self.replay_pending()?;
        Ok(())
    }

    fn is_self(&self, listener: &SharedListener) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(listener), self as *const Self)
    }

    /// Insert listeners in order under one lock, or none of them.
    fn insert_all(
        &self,
        listeners: &[SharedListener],
        meta: RegistrationMeta,
    ) -> Result<(), RegistrationError> {
        if listeners.iter().any(|listener| self.is_self(listener)) {
            return Err(RegistrationError::SelfReference);
        }
        let mut state = self.state();
        for listener in listeners {
            let key = state.registry.insert(listener.clone(), meta);
            #[cfg(feature = "tracing")]
            {
                tracing::debug!(
                    key,
                    priority = meta.priority,
                    important = meta.important,
                    "listener registered"
                );
            }
            #[cfg(not(feature = "tracing"))]
            {
                let _ = key;
            }
        }
        if state.replaying {
            state.rescan = true;
        }
        Ok(())
    }

    /// Remove a listener by identity. Returns whether it was registered.
    pub fn remove_listener(&self, listener: &dyn Listener) -> bool {
        let removed = self.state().registry.remove(listener);
        #[cfg(feature = "tracing")]
        if let Some(key) = removed {
            tracing::debug!(key, "listener removed");
        }
        removed.is_some()
    }

    /// Remove every listener. Deferred events stay queued.
    pub fn remove_all_listeners(&self) {
        self.state().registry.clear();
    }

    /// Check if a listener is registered.
    pub fn has_listener(&self, listener: &dyn Listener) -> bool {
        self.state().registry.contains(listener)
    }

    /// All listeners, in invocation order.
    pub fn listeners(&self) -> Vec<SharedListener> {
        self.state().registry.snapshot()
    }

    /// Get the number of registered listeners.
    pub fn len(&self) -> usize {
        self.state().registry.len()
    }

    /// Check if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of deferred events waiting for a listener.
    pub fn pending_len(&self) -> usize {
        self.state().pending.len()
    }

    /// Deliver an event to the matching listeners.
    ///
    /// Returns whether at least one listener handled it. A listener error
    /// stops the pass and is returned as is.
    pub fn notify(&self, event: &Event) -> Result<bool, DispatchError> {
        let listeners = self.state().registry.snapshot();
        let mut processed = false;
        for listener in listeners {
            if listener.matches(event) {
                listener.handle(event)?;
                processed = true;
                if event.is_propagation_stopped() {
                    break;
                }
            }
        }
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(event = %event, processed, "event dispatched");
        }
        Ok(processed)
    }

    /// Deliver an event now, or as soon as a listener for it is added.
    ///
    /// Returns `false` when nobody handled the event yet; it is then queued
    /// and `on_handled` fires on delivery. There is no expiry: the event waits
    /// as long as the dispatcher lives.
    pub fn notify_until(
        &self,
        event: Arc<Event>,
        on_handled: Option<OnHandled>,
    ) -> Result<bool, DispatchError> {
        let pending = PendingEvent { event, on_handled };
        if self.notify(&pending.event)? {
            pending.fire();
            return Ok(true);
        }
        let mut state = self.state();
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                event = %pending.event,
                queued = state.pending.len() + 1,
                "event deferred until handled"
            );
        }
        state.pending.push_back(pending);
        Ok(false)
    }

    /// Retry every deferred event, in queue order.
    ///
    /// Only one replay runs at a time. A listener added while it runs makes
    /// it walk the queue again, so events already retried in this replay see
    /// the new listener too.
    fn replay_pending(&self) -> Result<(), DispatchError> {
        {
            let mut state = self.state();
            if state.replaying {
                return Ok(());
            }
            state.replaying = true;
            state.rescan = false;
        }
        let mut guard = ReplayGuard {
            dispatcher: self,
            finished: false,
        };

        loop {
            let mut queue = std::mem::take(&mut self.state().pending);
            let mut remaining = VecDeque::with_capacity(queue.len());
            let mut failure = None;
            while let Some(pending) = queue.pop_front() {
                match self.notify(&pending.event) {
                    Ok(true) => {
                        #[cfg(feature = "tracing")]
                        {
                            tracing::debug!(event = %pending.event, "deferred event delivered");
                        }
                        pending.fire();
                    }
                    Ok(false) => remaining.push_back(pending),
                    Err(err) => {
                        remaining.push_back(pending);
                        remaining.extend(queue.drain(..));
                        failure = Some(err);
                        break;
                    }
                }
            }

            // Undelivered events go back ahead of any queued during the walk.
            let mut state = self.state();
            remaining.append(&mut state.pending);
            state.pending = remaining;
            if failure.is_some() || !state.rescan {
                state.replaying = false;
                state.rescan = false;
                guard.finished = true;
                return failure.map_or(Ok(()), Err);
            }
            state.rescan = false;
        }
    }
}

impl Listener for EventDispatcher {
    fn matches(&self, _event: &Event) -> bool {
        true
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        self.notify(event).map(|_| ())
    }
}

impl EventEmitter for EventDispatcher {
    fn add_listener(
        &self,
        listener: SharedListener,
        meta: RegistrationMeta,
    ) -> Result<(), HeraldError> {
        EventDispatcher::add_listener(self, listener, meta)
    }

    fn remove_listener(&self, listener: &dyn Listener) -> bool {
        EventDispatcher::remove_listener(self, listener)
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("EventDispatcher")
            .field("listeners", &state.registry.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::NameListener;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder(order: &Arc<Mutex<Vec<&'static str>>>, id: &'static str) -> Subscription {
        let order = order.clone();
        Subscription::callback(move |_: &Event| order.lock().unwrap().push(id))
    }

    #[test]
    fn higher_priority_runs_first_whatever_the_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on_with(recorder(&order, "low"), RegistrationMeta::new().with_priority(1))
            .unwrap();
        dispatcher
            .on_with(recorder(&order, "high"), RegistrationMeta::new().with_priority(2))
            .unwrap();

        dispatcher.notify(&Event::new("test")).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["high", "low"]);
    }

    #[test]
    fn descending_registration_keeps_priority_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on_with(recorder(&order, "high"), RegistrationMeta::new().with_priority(2))
            .unwrap();
        dispatcher.on(recorder(&order, "default")).unwrap();
        dispatcher
            .on_with(recorder(&order, "low"), RegistrationMeta::new().with_priority(-1))
            .unwrap();

        dispatcher.notify(&Event::new("test")).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["high", "default", "low"]);
    }

    #[test]
    fn same_priority_is_fifo_unless_important() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = EventDispatcher::new();
        dispatcher.on(recorder(&order, "first")).unwrap();
        dispatcher.on(recorder(&order, "second")).unwrap();
        dispatcher
            .on_with(recorder(&order, "important"), RegistrationMeta::new().important())
            .unwrap();
        dispatcher
            .on_with(recorder(&order, "more important"), RegistrationMeta::new().important())
            .unwrap();

        dispatcher.notify(&Event::new("test")).unwrap();
        assert_eq!(
            *order.lock().unwrap(),
            vec!["more important", "important", "first", "second"]
        );
    }

    #[test]
    fn stop_propagation_skips_the_rest() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on(Subscription::callback(|e: &Event| {
                e.stop_propagation();
            }))
            .unwrap();
        let counter = count.clone();
        dispatcher
            .on(Subscription::callback(move |_: &Event| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        assert!(dispatcher.notify(&Event::new("test")).unwrap());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_does_not_stop_dispatch() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on(Subscription::callback(|e: &Event| {
                e.cancel(true);
            }))
            .unwrap();
        let counter = count.clone();
        dispatcher
            .on(Subscription::callback(move |_: &Event| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let event = Event::new("test");
        dispatcher.notify(&event).unwrap();
        assert!(event.is_cancelled());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unmatched_event_is_not_processed() {
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on(Subscription::pattern("car.forward", |_: &Event| {}))
            .unwrap();
        assert!(!dispatcher.notify(&Event::new("car.backward")).unwrap());
    }

    #[test]
    fn listener_error_aborts_the_pass() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on(Subscription::callback(|_: &Event| -> Result<(), String> {
                Err("broken".into())
            }))
            .unwrap();
        let counter = count.clone();
        dispatcher
            .on(Subscription::callback(move |_: &Event| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let err = dispatcher.notify(&Event::new("test")).unwrap_err();
        assert!(matches!(err, DispatchError::Listener(_)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn adding_itself_is_rejected() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let err = dispatcher
            .add_listener(dispatcher.clone(), RegistrationMeta::new())
            .unwrap_err();
        assert!(matches!(
            err,
            HeraldError::Registration(RegistrationError::SelfReference)
        ));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn bulk_containing_itself_registers_nothing() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let err = dispatcher
            .on(Subscription::bulk([
                Subscription::callback(|_: &Event| {}),
                Subscription::listener(dispatcher.clone()),
            ]))
            .unwrap_err();
        assert!(matches!(
            err,
            HeraldError::Registration(RegistrationError::SelfReference)
        ));
        assert!(dispatcher.is_empty());

        let other: SharedListener = Arc::new(NameListener::new("test", |_: &Event| {}));
        let itself: SharedListener = dispatcher.clone();
        assert!(dispatcher.add_listeners([other, itself]).is_err());
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn removal_and_introspection() {
        let dispatcher = EventDispatcher::new();
        let listener: SharedListener = Arc::new(NameListener::new("test", |_: &Event| {}));

        dispatcher
            .add_listener(listener.clone(), RegistrationMeta::new())
            .unwrap();
        assert!(dispatcher.has_listener(listener.as_ref()));
        assert_eq!(dispatcher.listeners().len(), 1);

        assert!(dispatcher.remove_listener(listener.as_ref()));
        assert!(!dispatcher.has_listener(listener.as_ref()));
        assert!(!dispatcher.remove_listener(listener.as_ref()));

        dispatcher.add_listener(listener, RegistrationMeta::new()).unwrap();
        dispatcher.remove_all_listeners();
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn deferred_event_is_delivered_once_on_registration() {
        let dispatcher = EventDispatcher::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let callback_fired = fired.clone();

        let handled = dispatcher
            .notify_until(
                Arc::new(Event::new("foo")),
                Some(Box::new(move |_: &Event| {
                    callback_fired.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .unwrap();
        assert!(!handled);
        assert_eq!(dispatcher.pending_len(), 1);

        // A listener for something else leaves the event queued.
        dispatcher
            .on(Subscription::pattern("bar", |_: &Event| {}))
            .unwrap();
        assert_eq!(dispatcher.pending_len(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        dispatcher
            .on(Subscription::pattern("foo", |_: &Event| {}))
            .unwrap();
        assert_eq!(dispatcher.pending_len(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        dispatcher
            .on(Subscription::pattern("foo", |_: &Event| {}))
            .unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handled_event_is_not_queued() {
        let dispatcher = EventDispatcher::new();
        dispatcher
            .on(Subscription::pattern("foo", |_: &Event| {}))
            .unwrap();
        let fired = Arc::new(AtomicUsize::new(0));
        let callback_fired = fired.clone();

        let handled = dispatcher
            .notify_until(
                Arc::new(Event::new("foo")),
                Some(Box::new(move |_: &Event| {
                    callback_fired.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .unwrap();
        assert!(handled);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.pending_len(), 0);
    }

    #[test]
    fn replay_keeps_queue_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = EventDispatcher::new();
        for name in ["a.one", "b.one", "a.two"] {
            dispatcher
                .notify_until(Arc::new(Event::new(name)), None)
                .unwrap();
        }

        let seen = order.clone();
        dispatcher
            .on(Subscription::pattern("a.*", move |e: &Event| {
                seen.lock().unwrap().push(e.name().to_owned());
            }))
            .unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["a.one", "a.two"]);
        assert_eq!(dispatcher.pending_len(), 1);
    }

    #[test]
    fn failed_replay_keeps_the_event_queued() {
        let dispatcher = EventDispatcher::new();
        dispatcher
            .notify_until(Arc::new(Event::new("foo")), None)
            .unwrap();

        let result = dispatcher.on(Subscription::pattern("foo", |_: &Event| -> Result<(), String> {
            Err("not yet".into())
        }));
        assert!(matches!(result, Err(HeraldError::Dispatch(_))));
        assert_eq!(dispatcher.len(), 1);
        assert_eq!(dispatcher.pending_len(), 1);
    }

    #[test]
    fn listener_added_during_replay_sees_earlier_events() {
        let dispatcher = Arc::new(EventDispatcher::new());
        for name in ["a", "b"] {
            dispatcher
                .notify_until(Arc::new(Event::new(name)), None)
                .unwrap();
        }

        let a_hits = Arc::new(AtomicUsize::new(0));
        let counter = a_hits.clone();
        let weak = Arc::downgrade(&dispatcher);
        dispatcher
            .on(Subscription::pattern("b", move |_: &Event| {
                let Some(d) = weak.upgrade() else {
                    return Ok(());
                };
                let counter = counter.clone();
                d.on(Subscription::pattern("a", move |_: &Event| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .map(|_| ())
            }))
            .unwrap();

        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.pending_len(), 0);
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn nested_dispatcher_delegates() {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::new(EventDispatcher::new());
        let counter = count.clone();
        inner
            .on(Subscription::pattern("test", move |_: &Event| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let outer = EventDispatcher::new();
        outer.add_listener(inner, RegistrationMeta::new()).unwrap();

        assert!(outer.notify(&Event::new("test")).unwrap());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_can_register_during_dispatch() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let weak = Arc::downgrade(&dispatcher);
        dispatcher
            .on(Subscription::pattern("grow", move |_: &Event| {
                if let Some(d) = weak.upgrade() {
                    d.on(Subscription::pattern("grown", |_: &Event| {})).map(|_| ())
                } else {
                    Ok(())
                }
            }))
            .unwrap();

        dispatcher.notify(&Event::new("grow")).unwrap();
        assert_eq!(dispatcher.len(), 2);
        assert!(dispatcher.notify(&Event::new("grown")).unwrap());
    }
}
