//! # herald - In-Process Event Notification
//!
//! `herald` delivers named events to listeners registered on an
//! [`EventDispatcher`]. Listeners select events by exact name, wildcard,
//! regular expression or handler method, run in priority order, and can
//! answer through the event's return value or stop the rest of the pass.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! let dispatcher = Arc::new(EventDispatcher::new());
//! dispatcher.on(Subscription::pattern("car.*", |e: &Event| {
//!     println!("car event: {e}");
//! }))?;
//!
//! let notifier = Notifier::new(dispatcher).with_prefix("car.");
//! notifier.notify("forward", Params::new())?;
//! ```
//!
//! ## Deferred Delivery
//!
//! [`EventDispatcher::notify_until`] keeps an unhandled event and delivers it
//! as soon as a matching listener is added:
//!
//! ```rust,ignore
//! dispatcher.notify_until(Arc::new(Event::new("app.ready")), None)?;
//! // ...later
//! dispatcher.on(Subscription::pattern("app.ready", |_: &Event| boot()))?;
//! ```
//!
//! ## Handler Methods
//!
//! With the `macros` feature, `#[herald::handlers]` routes events to the
//! `on_*` methods of a type:
//!
//! ```rust,ignore
//! #[herald::handlers]
//! impl Car {
//!     fn on_turn_left(&self, #[default(90)] degree: u32, _event: &Event) { /* ... */ }
//! }
//!
//! dispatcher.on(Subscription::object_with_params(Arc::new(car)))?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Error types
    BoxError,
    DispatchError,
    // Event
    Event,
    // Emitter
    EventEmitter,
    // Handler tables
    Args,
    EventHandlers,
    HandlerOutput,
    HandlerTable,
    HeraldError,
    // Listener
    Listener,
    MethodHandler,
    Params,
    RegistrationError,
    RegistrationMeta,
    SEPARATORS,
    Sender,
    SharedListener,
    Value,
    method_name,
    same_listener,
};

pub use herald_std::{
    DefaultEventFactory, DispatcherBuilder, EventDispatcher, EventFactory, Notifier, OnHandled,
    Subscription,
};

/// Standard listener implementations.
pub mod listeners {
    #![allow(clippy::wildcard_imports)]
    pub use herald_std::listeners::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use herald_std::testing::*;
}

/// Prelude module - common imports for Herald.
///
/// # Usage
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DispatchError, Event, EventDispatcher, EventHandlers, HeraldError, Listener, Notifier,
        Params, RegistrationMeta, SharedListener, Subscription, Value,
        listeners::{ClassListener, NameListener, RegexpListener, SimpleListener, WildcardListener},
    };
}

#[cfg(feature = "macros")]
pub use herald_macros::handlers;
