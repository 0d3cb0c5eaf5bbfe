//! Self-monitoring metrics.
//!
//! This module provides:
//! - Metric records owned by pipeline contexts ([`MetricsRecord`])
//! - The registry of live pipelines the exporter walks ([`ConfigRegistry`])
//! - The export dispatcher merging native metrics with host-provided agent
//!   stats ([`MetricsDispatcher`])
//! - A periodic exporter pushing both to a [`MetricsSink`]

mod dispatcher;
mod exporter;
#[cfg(test)]
mod integration_tests;
mod meta_cache;
mod record;
mod registry;
mod sampler;

pub use dispatcher::{
    HostProvidedMetricsProvider, MetricExportType, MetricsDispatcher, MetricsProvider,
    NativeMetricsProvider,
};
pub use exporter::{ExportBatch, LoggingMetricsSink, MetricsSink, PeriodicExporter};
pub use meta_cache::{MetaCacheMetrics, NoopMetaCache};
pub use record::{Counter, Gauge, LabelPair, MetricsRecord};
pub use registry::ConfigRegistry;
pub use sampler::{
    AgentStatSampler, ProcessRuntimeSource, RuntimeMetricsSource, Sample, SampleValue,
    METRIC_AGENT_MEMORY_USED_MB, METRIC_AGENT_TASKS_TOTAL, METRIC_AGENT_THREADS_TOTAL,
};

use std::collections::HashMap;

/// One exported metric entry: string keys to string values.
pub type FlatMetrics = HashMap<String, String>;

/// Export key holding the JSON-encoded labels of a record.
pub const EXPORT_LABELS_KEY: &str = "labels";
/// Export key holding the JSON-encoded counters of a record.
pub const EXPORT_COUNTERS_KEY: &str = "counters";
/// Export key holding the JSON-encoded gauges of a record.
pub const EXPORT_GAUGES_KEY: &str = "gauges";
