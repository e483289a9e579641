//! # herald-std
//!
//! Standard implementations for the Herald event notification framework.
//!
//! This crate provides:
//! - **Listeners**: [`NameListener`], [`WildcardListener`], [`RegexpListener`],
//!   [`ClassListener`], [`SimpleListener`]
//! - **Dispatch**: [`EventDispatcher`], built directly or through
//!   [`DispatcherBuilder`], with [`Subscription`] as the registration shape
//! - **Notification**: [`Notifier`] and [`EventFactory`]
//! - **Testing**: recorder listeners in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use herald_core;

// Modules
pub mod dispatcher;
pub mod listeners;
pub mod notifier;
pub mod testing;

pub use dispatcher::{DispatcherBuilder, EventDispatcher, OnHandled, Subscription};
pub use listeners::{
    Callback, ClassListener, NameListener, RegexpListener, SimpleListener, WildcardListener,
};
pub use notifier::{DefaultEventFactory, EventFactory, Notifier};
