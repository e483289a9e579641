//! Procedural macros for Herald.
//!
//! This crate provides:
//! - `#[handlers]` - Attribute macro that turns the `on_*` methods of an impl
//!   block into an `EventHandlers` table

use proc_macro::TokenStream;

mod handlers;

/// Generate an `EventHandlers` implementation from an impl block.
///
/// Every method named `on_*` that takes `&self` becomes a handler for the
/// event of the same name (`on_turn_left` handles `turn.left`). Parameters
/// are filled as follows:
///
/// | Parameter | Value |
/// |-----------|-------|
/// | `&Event` | the event being handled |
/// | `Option<T>` | the event parameter, or `None` |
/// | `#[default(expr)] name: T` | the event parameter, or `expr` |
/// | `name: T` | the event parameter, required |
///
/// Event parameters are looked up by the parameter name, without leading
/// underscores. They are only read when the listener was created with
/// `params_as_args(true)`. Otherwise defaults apply.
///
/// The return value goes through `HandlerOutput`, so a method may return
/// `()`, a `Value`, `Option<Value>` or a `Result` of those.
///
/// # Example
///
/// ```rust,ignore
/// #[herald::handlers]
/// impl Car {
///     fn on_turn_left(&self, #[default(90)] degree: u32, _event: &Event) {
///         self.steer(-(degree as i32));
///     }
///
///     fn on_honk(&self, times: Option<u32>) -> Value {
///         json!("beep".repeat(times.unwrap_or(1) as usize))
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    handlers::handlers_impl(attr, item)
}
