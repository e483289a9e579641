#![allow(dead_code)]

use herald::{Event, Params, Subscription, Value};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Params
// ============================================================================

/// Build event parameters from a `json!` object.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

// ============================================================================
// Recorders
// ============================================================================

/// Shared log of which subscriber ran, in order.
#[derive(Clone, Default)]
pub struct OrderLog {
    pub entries: Arc<Mutex<Vec<&'static str>>>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catch-all subscription that appends `id` when invoked.
    pub fn subscriber(&self, id: &'static str) -> Subscription {
        let entries = self.entries.clone();
        Subscription::callback(move |_: &Event| entries.lock().unwrap().push(id))
    }

    /// A pattern subscription that appends `id` when invoked.
    pub fn on_pattern(&self, pattern: &str, id: &'static str) -> Subscription {
        let entries = self.entries.clone();
        Subscription::pattern(pattern, move |_: &Event| entries.lock().unwrap().push(id))
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().unwrap().clone()
    }
}

/// Counts how often the subscriptions it hands out were invoked.
#[derive(Clone, Default)]
pub struct HitCounter {
    pub hits: Arc<AtomicUsize>,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pattern(&self, pattern: &str) -> Subscription {
        let hits = self.hits.clone();
        Subscription::pattern(pattern, move |_: &Event| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Senders
// ============================================================================

#[derive(Debug, PartialEq)]
pub struct Car {
    pub plate: &'static str,
}
