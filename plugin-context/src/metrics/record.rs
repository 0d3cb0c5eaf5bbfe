//! Metric records: labelled bundles of counters and gauges.

use super::{FlatMetrics, EXPORT_COUNTERS_KEY, EXPORT_GAUGES_KEY, EXPORT_LABELS_KEY};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A label attached to a metric record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelPair {
    /// Label key.
    pub key: String,
    /// Label value.
    pub value: String,
}

impl LabelPair {
    /// Creates a new label pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A monotonically increasing counter.
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicU64::new(0),
        }
    }

    /// Returns the counter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `delta` to the counter.
    pub fn add(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Adds one to the counter.
    pub fn inc(&self) {
        self.add(1);
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A gauge holding the last value set.
#[derive(Debug)]
pub struct Gauge {
    name: String,
    bits: AtomicU64,
}

impl Gauge {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bits: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Returns the gauge name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the gauge value.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// A named bundle of counters and gauges with immutable labels.
///
/// The owning plugin creates its instruments once and updates them while
/// running; exporters only read.
#[derive(Debug, Default)]
pub struct MetricsRecord {
    labels: Vec<LabelPair>,
    counters: RwLock<Vec<Arc<Counter>>>,
    gauges: RwLock<Vec<Arc<Gauge>>>,
}

impl MetricsRecord {
    /// Creates a record with the given labels.
    #[must_use]
    pub fn new(labels: Vec<LabelPair>) -> Self {
        Self {
            labels,
            counters: RwLock::new(Vec::new()),
            gauges: RwLock::new(Vec::new()),
        }
    }

    /// Returns the labels.
    #[must_use]
    pub fn labels(&self) -> &[LabelPair] {
        &self.labels
    }

    /// Returns the counter named `name`, creating it on first use.
    pub fn create_counter(&self, name: &str) -> Arc<Counter> {
        let mut counters = self.counters.write();
        if let Some(existing) = counters.iter().find(|c| c.name() == name) {
            return existing.clone();
        }
        let counter = Arc::new(Counter::new(name));
        counters.push(counter.clone());
        counter
    }

    /// Returns the gauge named `name`, creating it on first use.
    pub fn create_gauge(&self, name: &str) -> Arc<Gauge> {
        let mut gauges = self.gauges.write();
        if let Some(existing) = gauges.iter().find(|g| g.name() == name) {
            return existing.clone();
        }
        let gauge = Arc::new(Gauge::new(name));
        gauges.push(gauge.clone());
        gauge
    }

    /// Flattens the record into its export form.
    ///
    /// The result holds exactly the keys `labels`, `counters` and `gauges`,
    /// each a JSON object whose values are strings.
    #[must_use]
    pub fn export(&self) -> FlatMetrics {
        let labels: serde_json::Map<String, serde_json::Value> = self
            .labels
            .iter()
            .map(|l| (l.key.clone(), serde_json::Value::String(l.value.clone())))
            .collect();
        let counters: serde_json::Map<String, serde_json::Value> = self
            .counters
            .read()
            .iter()
            .map(|c| (c.name().to_string(), serde_json::Value::String(c.get().to_string())))
            .collect();
        let gauges: serde_json::Map<String, serde_json::Value> = self
            .gauges
            .read()
            .iter()
            .map(|g| (g.name().to_string(), serde_json::Value::String(g.get().to_string())))
            .collect();

        let mut exported = FlatMetrics::with_capacity(3);
        exported.insert(EXPORT_LABELS_KEY.to_string(), serde_json::Value::Object(labels).to_string());
        exported.insert(EXPORT_COUNTERS_KEY.to_string(), serde_json::Value::Object(counters).to_string());
        exported.insert(EXPORT_GAUGES_KEY.to_string(), serde_json::Value::Object(gauges).to_string());
        exported
    }
}
