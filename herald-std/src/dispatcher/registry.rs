//! Ordered listener storage.
//!
//! Listeners are keyed by a signed integer and invoked in ascending key
//! order. The requested priority is negated to get the starting key, so
//! higher priorities sort first. When the key is taken, it is nudged by `+1`
//! (after the existing entry) or, for important registrations, by `-1`
//! (before it) until a free slot is found.

use herald_core::{Listener, RegistrationMeta, SharedListener, same_listener};
use std::collections::BTreeMap;

#[derive(Default)]
pub(crate) struct Registry {
    entries: BTreeMap<i64, SharedListener>,
}

impl Registry {
    /// Insert a listener and return the key it was stored under.
    pub(crate) fn insert(&mut self, listener: SharedListener, meta: RegistrationMeta) -> i64 {
        let step = if meta.important { -1 } else { 1 };
        let mut key = -i64::from(meta.priority);
        while self.entries.contains_key(&key) {
            key += step;
        }
        self.entries.insert(key, listener);
        key
    }

    /// Remove the first entry holding `listener`.
    pub(crate) fn remove(&mut self, listener: &dyn Listener) -> Option<i64> {
        let key = self.key_of(listener)?;
        self.entries.remove(&key);
        Some(key)
    }

    pub(crate) fn contains(&self, listener: &dyn Listener) -> bool {
        self.key_of(listener).is_some()
    }

    /// Listeners in invocation order.
    pub(crate) fn snapshot(&self) -> Vec<SharedListener> {
        self.entries.values().cloned().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn key_of(&self, listener: &dyn Listener) -> Option<i64> {
        self.entries
            .iter()
            .find(|(_, l)| same_listener(l.as_ref(), listener))
            .map(|(key, _)| *key)
    }
}
