//! Method-per-event listeners.

use herald_core::{DispatchError, Event, EventHandlers, HandlerTable, Listener};
use std::{fmt, sync::Arc};

/// Routes each event to a method of a target object.
///
/// An event named `turn.left` is handled by the method registered as
/// `on_turn_left` (or `onTurnLeft`) in the target's [`HandlerTable`]. Events
/// without a method are not matched.
///
/// With [`params_as_args`](ClassListener::params_as_args), the method's
/// declared parameters are filled from the event's parameters by name.
/// Otherwise every declared parameter falls back to its default.
///
/// # Example
///
/// ```rust,ignore
/// struct Garage { turns: AtomicUsize }
///
/// #[herald::handlers]
/// impl Garage {
///     fn on_turn_left(&self, #[default(90)] degree: u32, _event: &Event) {
///         self.turns.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let listener = ClassListener::new(Arc::new(Garage::default())).params_as_args(true);
/// ```
pub struct ClassListener<T: EventHandlers> {
    target: Arc<T>,
    table: HandlerTable<T>,
    params_as_args: bool,
}

impl<T: EventHandlers> ClassListener<T> {
    /// Create a listener for `target`. Builds the handler table once.
    pub fn new(target: Arc<T>) -> Self {
        Self {
            target,
            table: T::handler_table(),
            params_as_args: false,
        }
    }

    /// Fill method parameters from event parameters.
    pub fn params_as_args(mut self, enabled: bool) -> Self {
        self.params_as_args = enabled;
        self
    }

    /// The object methods are invoked on.
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// The handler table built for the target.
    pub fn table(&self) -> &HandlerTable<T> {
        &self.table
    }
}

impl<T: EventHandlers> Listener for ClassListener<T> {
    fn matches(&self, event: &Event) -> bool {
        self.table.resolve(event.name()).is_some()
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        let Some(method) = self.table.resolve(event.name()) else {
            return Ok(());
        };
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(event = %event, method = method.name(), "invoking handler method");
        }
        if let Some(value) = method.invoke(&self.target, event, self.params_as_args)? {
            event.set_return_value(value);
        }
        Ok(())
    }
}

impl<T: EventHandlers> fmt::Debug for ClassListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassListener")
            .field("target", &std::any::type_name::<T>())
            .field("table", &self.table)
            .field("params_as_args", &self.params_as_args)
            .finish()
    }
}
