//! Handler output conversion.

use crate::error::BoxError;
use serde_json::Value;

/// Trait for converting a handler's output into an optional return value.
///
/// A `Some` outcome is stored on the event with
/// [`Event::set_return_value`](crate::Event::set_return_value); `None` leaves
/// the event untouched.
///
/// # Default Implementations
///
/// - `()` → no return value
/// - `Value` → that value
/// - `Option<Value>` → as is
/// - `Result<T, E>` → delegates to inner `T` or propagates the error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `HandlerOutput`",
    label = "handlers must return `()`, a `Value`, an `Option<Value>` or a `Result` of those",
    note = "HandlerOutput must implement the `into_outcome` method."
)]
pub trait HandlerOutput {
    /// Convert the output into an optional return value or an error.
    fn into_outcome(self) -> Result<Option<Value>, BoxError>;
}

impl HandlerOutput for () {
    fn into_outcome(self) -> Result<Option<Value>, BoxError> {
        Ok(None)
    }
}

impl HandlerOutput for Value {
    fn into_outcome(self) -> Result<Option<Value>, BoxError> {
        Ok(Some(self))
    }
}

impl HandlerOutput for Option<Value> {
    fn into_outcome(self) -> Result<Option<Value>, BoxError> {
        Ok(self)
    }
}

impl<T, E> HandlerOutput for Result<T, E>
where
    T: HandlerOutput,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Option<Value>, BoxError> {
        match self {
            Ok(t) => t.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_has_no_outcome() {
        assert_eq!(().into_outcome().unwrap(), None);
    }

    #[test]
    fn values_are_kept() {
        assert_eq!(json!(3).into_outcome().unwrap(), Some(json!(3)));
        assert_eq!(Some(Value::Null).into_outcome().unwrap(), Some(Value::Null));
    }

    #[test]
    fn results_delegate_or_fail() {
        let ok: Result<Value, std::io::Error> = Ok(json!("x"));
        assert_eq!(ok.into_outcome().unwrap(), Some(json!("x")));

        let err: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        assert_eq!(err.into_outcome().unwrap_err().to_string(), "boom");
    }
}
