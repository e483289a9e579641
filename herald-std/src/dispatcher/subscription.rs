//! The shapes accepted by [`EventDispatcher::on`](super::EventDispatcher::on).

use crate::listeners::{
    Callback, ClassListener, NameListener, RegexpListener, SimpleListener, WildcardListener,
};
use herald_core::{Event, EventHandlers, HandlerOutput, Listener, RegistrationError, SharedListener};
use std::{fmt, sync::Arc};

/// Something that can be turned into one or more listeners.
///
/// | Variant | Listener |
/// |---------|----------|
/// | `Listener` | registered as is |
/// | `Callback` | [`SimpleListener`] |
/// | `Object` | a prebuilt [`ClassListener`] |
/// | `Pattern` with `/body/flags` | [`RegexpListener`] |
/// | `Pattern` containing `*` | [`WildcardListener`] |
/// | other `Pattern` | [`NameListener`] |
/// | `Bulk` | each element in turn |
///
/// A `Pattern` without a callback cannot become a listener.
pub enum Subscription {
    /// A ready-made listener.
    Listener(SharedListener),
    /// A catch-all callback.
    Callback(Callback),
    /// An object whose methods handle events.
    Object(SharedListener),
    /// An event name, wildcard or regular expression.
    Pattern {
        /// The pattern.
        pattern: String,
        /// The callback to run on match.
        callback: Option<Callback>,
    },
    /// Several subscriptions registered with the same metadata.
    Bulk(Vec<Subscription>),
}

impl Subscription {
    /// A ready-made listener.
    pub fn listener(listener: SharedListener) -> Self {
        Self::Listener(listener)
    }

    /// A catch-all callback.
    pub fn callback<F, R>(f: F) -> Self
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::Callback(Callback::new(f))
    }

    /// Route events to methods of `target`.
    pub fn object<T: EventHandlers>(target: Arc<T>) -> Self {
        Self::Object(Arc::new(ClassListener::new(target)))
    }

    /// Route events to methods of `target`, filling method parameters from
    /// event parameters.
    pub fn object_with_params<T: EventHandlers>(target: Arc<T>) -> Self {
        Self::Object(Arc::new(ClassListener::new(target).params_as_args(true)))
    }

    /// A name, wildcard or regular expression pattern with its callback.
    pub fn pattern<F, R>(pattern: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::Pattern {
            pattern: pattern.into(),
            callback: Some(Callback::new(f)),
        }
    }

    /// Several subscriptions at once.
    pub fn bulk(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        Self::Bulk(subscriptions.into_iter().collect())
    }

    /// Build the listeners, in registration order.
    ///
    /// Either every listener is built or none is.
    pub fn into_listeners(self) -> Result<Vec<SharedListener>, RegistrationError> {
        let mut listeners = Vec::new();
        self.build_into(&mut listeners)?;
        Ok(listeners)
    }

    fn build_into(self, out: &mut Vec<SharedListener>) -> Result<(), RegistrationError> {
        match self {
            Self::Listener(listener) | Self::Object(listener) => out.push(listener),
            Self::Callback(callback) => out.push(Arc::new(SimpleListener::with_callback(callback))),
            Self::Pattern {
                pattern,
                callback: Some(callback),
            } => out.push(pattern_listener(&pattern, callback)?),
            Self::Pattern {
                pattern,
                callback: None,
            } => {
                return Err(RegistrationError::Invalid(format!(
                    "pattern `{pattern}` without a callback"
                )));
            }
            Self::Bulk(subscriptions) => {
                for subscription in subscriptions {
                    subscription.build_into(out)?;
                }
            }
        }
        Ok(())
    }
}

fn pattern_listener(pattern: &str, callback: Callback) -> Result<SharedListener, RegistrationError> {
    if RegexpListener::is_delimited(pattern) {
        Ok(Arc::new(RegexpListener::with_callback(pattern, callback)?))
    } else if pattern.contains('*') {
        Ok(Arc::new(WildcardListener::with_callback(pattern, callback)?))
    } else {
        Ok(Arc::new(NameListener::with_callback(pattern, callback)))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listener(_) => f.write_str("Listener"),
            Self::Callback(_) => f.write_str("Callback"),
            Self::Object(_) => f.write_str("Object"),
            Self::Pattern { pattern, callback } => f
                .debug_struct("Pattern")
                .field("pattern", pattern)
                .field("has_callback", &callback.is_some())
                .finish(),
            Self::Bulk(subscriptions) => f.debug_tuple("Bulk").field(subscriptions).finish(),
        }
    }
}

impl<L: Listener> From<Arc<L>> for Subscription {
    fn from(listener: Arc<L>) -> Self {
        Self::Listener(listener)
    }
}

impl From<SharedListener> for Subscription {
    fn from(listener: SharedListener) -> Self {
        Self::Listener(listener)
    }
}

impl From<Vec<Subscription>> for Subscription {
    fn from(subscriptions: Vec<Subscription>) -> Self {
        Self::Bulk(subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(subscription: Subscription) -> Vec<String> {
        subscription
            .into_listeners()
            .unwrap()
            .iter()
            .map(|l| {
                let probes = ["car.forward", "car.turn.left", "truck.forward"];
                probes
                    .iter()
                    .filter(|name| l.matches(&Event::new(**name)))
                    .map(|name| name.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect()
    }

    #[test]
    fn pattern_shape_selects_listener_kind() {
        assert_eq!(
            names(Subscription::pattern("car.forward", |_: &Event| {})),
            vec!["car.forward"]
        );
        assert_eq!(
            names(Subscription::pattern("car.*", |_: &Event| {})),
            vec!["car.forward,car.turn.left"]
        );
        assert_eq!(
            names(Subscription::pattern(r"/^car\.turn\./", |_: &Event| {})),
            vec!["car.turn.left"]
        );
        assert_eq!(
            names(Subscription::callback(|_: &Event| {})),
            vec!["car.forward,car.turn.left,truck.forward"]
        );
    }

    #[test]
    fn bulk_keeps_order() {
        let bulk = Subscription::bulk([
            Subscription::pattern("truck.*", |_: &Event| {}),
            Subscription::pattern("car.forward", |_: &Event| {}),
        ]);
        assert_eq!(names(bulk), vec!["truck.forward", "car.forward"]);
    }

    #[test]
    fn pattern_without_callback_is_invalid() {
        let subscription = Subscription::Pattern {
            pattern: "car.forward".into(),
            callback: None,
        };
        assert!(matches!(
            subscription.into_listeners(),
            Err(RegistrationError::Invalid(_))
        ));
    }

    #[test]
    fn one_bad_element_fails_the_whole_bulk() {
        let bulk = Subscription::bulk([
            Subscription::pattern("car.forward", |_: &Event| {}),
            Subscription::pattern("/(/", |_: &Event| {}),
        ]);
        assert!(matches!(
            bulk.into_listeners(),
            Err(RegistrationError::InvalidPattern { .. })
        ));
    }
}
