//! # herald-core
//!
//! Core types for the Herald event notification framework.
//!
//! This crate has minimal dependencies and is designed to be imported by code
//! that only defines listeners or raises events, without pulling in the
//! standard listener and dispatcher implementations of `herald-std`.
//!
//! # Building Blocks
//!
//! - [`Event`]: a named occurrence with parameters and a response slot.
//!   Listeners answer through the return value and control the rest of the
//!   pass through [`Event::stop_propagation`].
//! - [`Listener`]: `matches` + `handle`. Everything a dispatcher invokes is a
//!   Listener, including other dispatchers.
//! - [`EventHandlers`] / [`HandlerTable`]: objects whose methods handle events,
//!   one method per event name.
//! - [`EventEmitter`]: anything that accepts listeners.
//!
//! # Error Types
//!
//! - [`HeraldError`] - Top-level error type
//! - [`RegistrationError`] - Listener registration errors
//! - [`DispatchError`] - Errors raised by listeners during a pass

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod emitter;
mod error;
mod event;
mod handlers;
mod listener;
mod response;

// Re-exports
pub use emitter::{EventEmitter, RegistrationMeta};
pub use error::{BoxError, DispatchError, HeraldError, RegistrationError};
pub use event::{Event, Params, Sender};
pub use handlers::{Args, EventHandlers, HandlerTable, MethodHandler, SEPARATORS, method_name};
pub use listener::{Listener, SharedListener, same_listener};
pub use response::HandlerOutput;
pub use serde_json::Value;
