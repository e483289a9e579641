//! Regular expression matching on event names.

use super::callback::Callback;
use herald_core::{BoxError, DispatchError, Event, HandlerOutput, Listener, RegistrationError};
use regex::Regex;
use std::sync::LazyLock;

// A delimited pattern: `/body/flags`.
#[allow(clippy::expect_used)]
static DELIMITED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/.+/[a-zA-Z]*$").expect("constant regex pattern is valid"));

/// Listens to events whose name matches a regular expression.
///
/// Patterns are written between slashes, optionally followed by flags:
/// `/^car\.turn\.(left|right)$/` or `/^CAR\./i`.
///
/// | Flag | Meaning |
/// |------|---------|
/// | `i` | case-insensitive |
/// | `m` | multi-line anchors |
/// | `s` | `.` matches newlines |
/// | `x` | ignore whitespace and `#` comments |
/// | `U` | swap greediness |
/// | `u` | accepted, patterns are always Unicode |
#[derive(Debug, Clone)]
pub struct RegexpListener {
    pattern: String,
    regex: Regex,
    callback: Callback,
}

impl RegexpListener {
    /// Create a listener from a `/body/flags` pattern.
    pub fn new<F, R>(pattern: &str, f: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&Event) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::with_callback(pattern, Callback::new(f))
    }

    /// Create a listener from a `/body/flags` pattern and an existing callback.
    pub fn with_callback(pattern: &str, callback: Callback) -> Result<Self, RegistrationError> {
        let regex = compile(pattern).map_err(|source| RegistrationError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
            callback,
        })
    }

    /// Create a listener from an already compiled expression.
    pub fn from_regex(regex: Regex, callback: Callback) -> Self {
        Self {
            pattern: format!("/{}/", regex.as_str()),
            regex,
            callback,
        }
    }

    /// Check if a string has the `/body/flags` shape.
    pub fn is_delimited(pattern: &str) -> bool {
        DELIMITED.is_match(pattern)
    }

    /// The pattern as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn compile(pattern: &str) -> Result<Regex, BoxError> {
    if !RegexpListener::is_delimited(pattern) {
        return Err("pattern must have the form /body/flags".into());
    }
    // The shape check guarantees a leading slash and a later closing one.
    let close = pattern.rfind('/').unwrap_or(0);
    let body = &pattern[1..close];
    let mut flags = String::new();
    for flag in pattern[close + 1..].chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => flags.push(flag),
            'u' => {}
            other => return Err(format!("unsupported flag '{other}'").into()),
        }
    }
    let source = if flags.is_empty() {
        body.to_owned()
    } else {
        format!("(?{flags}){body}")
    };
    Ok(Regex::new(&source)?)
}

impl Listener for RegexpListener {
    fn matches(&self, event: &Event) -> bool {
        self.regex.is_match(event.name())
    }

    fn handle(&self, event: &Event) -> Result<(), DispatchError> {
        self.callback.call(event)
    }
}
