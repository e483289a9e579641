//! Handler tables for method-per-event listeners.
//!
//! An object opts into method dispatch by implementing [`EventHandlers`]: it
//! describes, once, which of its methods handle which events. The table maps a
//! normalized method name to an invoker, so `turn.left`, `turn_left` and
//! `Turn-Left` all reach the `on_turn_left` method.
//!
//! Tables are usually generated by `#[herald::handlers]`, but can be written
//! by hand:
//!
//! ```rust,ignore
//! impl EventHandlers for Car {
//!     fn handler_table() -> HandlerTable<Self> {
//!         HandlerTable::new().method("on_turn_left", |car: &Car, args: &Args<'_>| {
//!             let degree: u32 = args.optional("degree", || 90)?;
//!             car.turn(degree);
//!             Ok(None)
//!         })
//!     }
//! }
//! ```

use crate::{error::DispatchError, event::Event};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashMap, fmt};

/// Characters removed from an event name before it becomes a method name.
pub const SEPARATORS: [char; 4] = ['_', '.', '-', ':'];

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c) || c.is_whitespace()
}

/// The method name an event is routed to.
///
/// `"on"` followed by the camel-cased event name: separators are dropped and
/// the letter after each one is upper-cased. Only ASCII letters change case,
/// matching the case folding used when resolving handlers.
///
/// ```rust,ignore
/// assert_eq!(method_name("turn.left"), "onTurnLeft");
/// assert_eq!(method_name("user:logged_in"), "onUserLoggedIn");
/// ```
pub fn method_name(event_name: &str) -> String {
    let mut name = String::with_capacity(event_name.len() + 2);
    name.push_str("on");
    let mut upper = true;
    for c in event_name.chars() {
        if is_separator(c) {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// Key under which a method is stored and looked up.
///
/// Case-insensitive and separator-blind, so `onTurnLeft` and `on_turn_left`
/// collide.
fn lookup_key(method: &str) -> String {
    method
        .chars()
        .filter(|c| !is_separator(*c))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Argument resolution for one handler invocation.
pub struct Args<'a> {
    method: &'a str,
    event: &'a Event,
    from_params: bool,
}

impl<'a> Args<'a> {
    /// Create the arguments for `method`.
    ///
    /// When `from_params` is false, every declared parameter is treated as
    /// absent from the event.
    pub fn new(method: &'a str, event: &'a Event, from_params: bool) -> Self {
        Self {
            method,
            event,
            from_params,
        }
    }

    /// The event being handled.
    pub fn event(&self) -> &'a Event {
        self.event
    }

    /// Resolve a parameter that has no default.
    pub fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T, DispatchError> {
        match self.lookup(name) {
            Some(value) => self.decode(name, value),
            None => Err(DispatchError::MissingParameter {
                method: self.method.to_owned(),
                parameter: name.to_owned(),
            }),
        }
    }

    /// Resolve a parameter, falling back to `default` when it is absent.
    pub fn optional<T: DeserializeOwned>(
        &self,
        name: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, DispatchError> {
        match self.lookup(name) {
            Some(value) => self.decode(name, value),
            None => Ok(default()),
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        if self.from_params {
            self.event.param(name)
        } else {
            None
        }
    }

    fn decode<T: DeserializeOwned>(&self, name: &str, value: &Value) -> Result<T, DispatchError> {
        serde_json::from_value(value.clone()).map_err(|source| DispatchError::InvalidParameter {
            method: self.method.to_owned(),
            parameter: name.to_owned(),
            source,
        })
    }
}

type Invoke<T> =
    Box<dyn Fn(&T, &Args<'_>) -> Result<Option<Value>, DispatchError> + Send + Sync + 'static>;

/// A single handler method.
pub struct MethodHandler<T> {
    name: &'static str,
    invoke: Invoke<T>,
}

impl<T> MethodHandler<T> {
    /// The method name as declared.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the method on `target`.
    ///
    /// A `Some` result is the value the method wants stored on the event.
    pub fn invoke(
        &self,
        target: &T,
        event: &Event,
        params_as_args: bool,
    ) -> Result<Option<Value>, DispatchError> {
        let args = Args::new(self.name, event, params_as_args);
        (self.invoke)(target, &args)
    }
}

/// The methods of `T` that handle events.
pub struct HandlerTable<T> {
    methods: HashMap<String, MethodHandler<T>>,
}

impl<T> HandlerTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register a handler method.
    ///
    /// A later method with the same normalized name replaces the earlier one.
    pub fn method<F>(mut self, name: &'static str, invoke: F) -> Self
    where
        F: Fn(&T, &Args<'_>) -> Result<Option<Value>, DispatchError> + Send + Sync + 'static,
    {
        self.methods.insert(
            lookup_key(name),
            MethodHandler {
                name,
                invoke: Box::new(invoke),
            },
        );
        self
    }

    /// The handler for an event, if the table has one.
    pub fn resolve(&self, event_name: &str) -> Option<&MethodHandler<T>> {
        self.methods.get(&lookup_key(&method_name(event_name)))
    }

    /// Names of all registered methods.
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.values().map(|m| m.name)
    }

    /// Get the number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if the table has no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<T> Default for HandlerTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandlerTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("methods", &self.method_names().collect::<Vec<_>>())
            .finish()
    }
}

/// An object whose methods handle events.
///
/// Usually implemented with `#[herald::handlers]` on an `impl` block.
pub trait EventHandlers: Send + Sync + Sized + 'static {
    /// Build the table of handler methods. Called once per listener.
    fn handler_table() -> HandlerTable<Self>;
}
