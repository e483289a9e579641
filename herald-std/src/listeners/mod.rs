//! Standard listener implementations.
//!
//! | Listener | Matches |
//! |----------|---------|
//! | [`NameListener`] | the exact event name |
//! | [`WildcardListener`] | a pattern where `*` stands for one or more characters |
//! | [`RegexpListener`] | a `/body/flags` regular expression |
//! | [`ClassListener`] | events the target object has a handler method for |
//! | [`SimpleListener`] | every event |

mod callback;
mod class;
mod name;
mod regexp;
mod simple;
mod wildcard;

pub use callback::Callback;
pub use class::ClassListener;
pub use name::NameListener;
pub use regexp::RegexpListener;
pub use simple::SimpleListener;
pub use wildcard::WildcardListener;
