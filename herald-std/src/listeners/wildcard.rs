//! Wildcard matching on event names.

use super::{callback::Callback, regexp::RegexpListener};
use herald_core::{DispatchError, Event, HandlerOutput, Listener, RegistrationError};
use regex::Regex;

/// Listens to events whose name matches a wildcard pattern.
///
/// Each `*` stands for one or more characters of any kind, dots included, and
/// the pattern must cover the whole name: `car.*` matches `car.forward` and
/// `car.turn.left`, but neither `car.` nor `truck.forward`.
#[derive(Debug, Clone)]
pub struct WildcardListener {
    pattern: String,
    inner: RegexpListener,
}

impl WildcardListener {
    /// Create a listener for `pattern`.
    pub fn new<F, R>(pattern: &str, f: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::with_callback(pattern, Callback::new(f))
    }

    /// Create a listener from an existing callback.
    pub fn with_callback(pattern: &str, callback: Callback) -> Result<Self, RegistrationError> {
        let source = format!("^{}$", regex::escape(pattern).replace(r"\*", "(.+)"));
        let regex = Regex::new(&source).map_err(|e| RegistrationError::InvalidPattern {
            pattern: pattern.to_owned(),
            source: Box::new(e),
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            inner: RegexpListener::from_regex(regex, callback),
        })
    }

    /// The wildcard pattern as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Listener for WildcardListener {
    fn matches(&self, event: &Event) -> bool {
        self.inner.matches(event)
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        self.inner.handle(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wildcard(pattern: &str) -> WildcardListener {
        WildcardListener::new(pattern, |_: &Event| {}).unwrap()
    }

    #[test]
    fn star_spans_segments() {
        let listener = wildcard("car.*");
        assert!(listener.matches(&Event::new("car.forward")));
        assert!(listener.matches(&Event::new("car.turn.left")));
        assert!(!listener.matches(&Event::new("truck.forward")));
        assert!(!listener.matches(&Event::new("car.")));
    }

    #[test]
    fn literal_parts_are_not_regex() {
        let listener = wildcard("car.*");
        assert!(!listener.matches(&Event::new("carXforward")));

        let listener = wildcard("a+b.*");
        assert!(listener.matches(&Event::new("a+b.c")));
        assert!(!listener.matches(&Event::new("aab.c")));
    }

    #[test]
    fn match_is_anchored() {
        let listener = wildcard("*.left");
        assert!(listener.matches(&Event::new("car.turn.left")));
        assert!(!listener.matches(&Event::new("car.turn.left.now")));
    }
}
