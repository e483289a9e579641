//! Error types for Herald.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`HeraldError`] - Top-level error type for all Herald operations
//! - [`RegistrationError`] - Errors raised while adding listeners
//! - [`DispatchError`] - Errors raised while an event is being handled

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// A listener could not be registered.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// A listener failed while handling an event.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors that can occur while registering a listener.
///
/// A failed registration leaves the registry untouched.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The subscription shape cannot be turned into a listener.
    #[error("no listener can be created from {0}")]
    Invalid(String),

    /// A dispatcher was added to itself.
    #[error("adding a dispatcher to itself would cause an infinite loop")]
    SelfReference,

    /// A regular expression or wildcard pattern did not compile.
    #[error("invalid pattern `{pattern}`")]
    InvalidPattern {
        /// The pattern as supplied at registration.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: BoxError,
    },
}

/// Errors that can occur while an event is being handled.
///
/// Any of these aborts the current dispatch pass.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler method declares a parameter the event does not carry.
    #[error("missing parameter '{parameter}' for '{method}'")]
    MissingParameter {
        /// Handler method name.
        method: String,
        /// Name of the declared parameter.
        parameter: String,
    },

    /// An event parameter could not be converted to the declared type.
    #[error("invalid parameter '{parameter}' for '{method}'")]
    InvalidParameter {
        /// Handler method name.
        method: String,
        /// Name of the declared parameter.
        parameter: String,
        /// The conversion error.
        #[source]
        source: serde_json::Error,
    },

    /// A listener callback returned an error.
    #[error("listener error")]
    Listener(#[source] BoxError),
}

// Convenience conversion
impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Listener(err)
    }
}
