//! Flat telemetry records and static attribute maps

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-side attributes published once per entity
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// One telemetry value: a reading, a monotonic counter or a dynamometer card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Count(u64),
    Number(f64),
    /// Ordered `[position_in, load_lb]` pairs
    Card(Vec<[f64; 2]>),
}

impl TelemetryValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Count(c) => Some(*c as f64),
            Self::Card(_) => None,
        }
    }
}

/// Flat key/value record produced by one well step
///
/// Keys are ordered so that serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Telemetry(BTreeMap<String, TelemetryValue>);

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), TelemetryValue::Number(value));
    }

    pub fn set_count(&mut self, key: &str, value: u64) {
        self.0.insert(key.to_string(), TelemetryValue::Count(value));
    }

    pub fn set_card(&mut self, key: &str, card: Vec<[f64; 2]>) {
        self.0.insert(key.to_string(), TelemetryValue::Card(card));
    }

    /// Copy `source` to `alias` when the source is present
    pub fn alias(&mut self, alias: &str, source: &str) {
        if let Some(v) = self.0.get(source).cloned() {
            self.0.insert(alias.to_string(), v);
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(TelemetryValue::as_f64)
    }

    pub fn value(&self, key: &str) -> Option<&TelemetryValue> {
        self.0.get(key)
    }

    pub fn card(&self, key: &str) -> Option<&[[f64; 2]]> {
        match self.0.get(key) {
            Some(TelemetryValue::Card(card)) => Some(card),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TelemetryValue)> {
        self.0.iter()
    }
}
