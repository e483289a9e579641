//! # Listener
//!
//! A Listener decides whether it is interested in an event ([`Listener::matches`])
//! and reacts to it ([`Listener::handle`]). Dispatchers only ever see listeners
//! through this trait, which is what lets a dispatcher be nested inside another
//! one.
//!
//! Listeners are shared: the registrant keeps an `Arc` and the dispatcher
//! stores a clone of it. Removal and lookup compare by identity, see
//! [`same_listener`].

use crate::{error::DispatchError, event::Event};
use std::sync::Arc;

/// A matcher and handler pair invoked during dispatch.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener`",
    label = "missing `Listener` implementation",
    note = "Listeners must implement `matches` and `handle`."
)]
pub trait Listener: Send + Sync + 'static {
    /// Checks if the event can be handled by this listener.
    fn matches(&self, event: &Event) -> bool;

    /// Handles the event.
    ///
    /// Only called after [`matches`](Listener::matches) returned `true` for the
    /// same event. An error aborts the rest of the dispatch pass.
    fn handle(&self, event: &Event) -> Result<(), DispatchError>;
}

impl std::fmt::Debug for dyn Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

/// A listener as stored in a registry.
pub type SharedListener = Arc<dyn Listener>;

/// Identity comparison of two listeners.
///
/// Only the data pointers are compared; two `Arc`s of the same value are the
/// same listener even if they were unsized through different paths.
pub fn same_listener(a: &dyn Listener, b: &dyn Listener) -> bool {
    std::ptr::addr_eq(a as *const dyn Listener, b as *const dyn Listener)
}
