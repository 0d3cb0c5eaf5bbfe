//! Agent-level process stats handed to the host agent.
//!
//! The host owns the metric definitions; this side only samples values and
//! formats them as decimal strings under the host's key names.

use super::FlatMetrics;
use std::fs;

/// Agent key for resident memory, in megabytes.
pub const METRIC_AGENT_MEMORY_USED_MB: &str = "agent_runtime_memory_used_mb";
/// Agent key for live async tasks.
pub const METRIC_AGENT_TASKS_TOTAL: &str = "agent_runtime_tasks_total";
/// Agent key for OS threads.
pub const METRIC_AGENT_THREADS_TOTAL: &str = "agent_runtime_threads_total";

/// Runtime counter name for resident memory.
pub const RUNTIME_RESIDENT_BYTES: &str = "/memory/resident:bytes";
/// Runtime counter name for live async tasks.
pub const RUNTIME_TASKS: &str = "/sched/tasks:tasks";
/// Runtime counter name for OS threads.
pub const RUNTIME_THREADS: &str = "/sched/threads:threads";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Runtime counter name to agent key.
const AGENT_STAT_TABLE: &[(&str, &str)] = &[
    (RUNTIME_RESIDENT_BYTES, METRIC_AGENT_MEMORY_USED_MB),
    (RUNTIME_TASKS, METRIC_AGENT_TASKS_TOTAL),
    (RUNTIME_THREADS, METRIC_AGENT_THREADS_TOTAL),
];

/// A sampled runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SampleValue {
    /// The counter is unknown or could not be read.
    #[default]
    Unsupported,
    /// An unsigned integer counter.
    Uint64(u64),
    /// A floating-point counter.
    Float64(f64),
}

/// One named counter to be filled in by a [`RuntimeMetricsSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Runtime counter name.
    pub name: String,
    /// Value filled in by the source.
    pub value: SampleValue,
}

impl Sample {
    /// Creates an unfilled sample.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SampleValue::Unsupported,
        }
    }
}

/// A facility exposing named runtime counters.
pub trait RuntimeMetricsSource: Send + Sync {
    /// Fills every sample in one pass, so values are mutually consistent.
    ///
    /// Names the source does not know are set to [`SampleValue::Unsupported`].
    fn read(&self, samples: &mut [Sample]);
}

/// Reads counters of the current process.
///
/// Memory and thread counts come from `/proc/self/status`, read once per
/// batch. Task counts come from the tokio runtime of the calling thread and
/// are zero outside of one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRuntimeSource;

impl ProcessRuntimeSource {
    fn proc_status_field(status: &str, field: &str) -> Option<u64> {
        status
            .lines()
            .find_map(|line| line.strip_prefix(field))
            .and_then(|rest| rest.trim_start_matches(':').split_whitespace().next())
            .and_then(|value| value.parse().ok())
    }

    fn live_tasks() -> u64 {
        tokio::runtime::Handle::try_current()
            .map(|handle| handle.metrics().num_alive_tasks() as u64)
            .unwrap_or(0)
    }
}

impl RuntimeMetricsSource for ProcessRuntimeSource {
    fn read(&self, samples: &mut [Sample]) {
        let status = fs::read_to_string("/proc/self/status").ok();
        let status = status.as_deref();

        for sample in samples.iter_mut() {
            sample.value = match sample.name.as_str() {
                RUNTIME_RESIDENT_BYTES => status
                    .and_then(|s| Self::proc_status_field(s, "VmRSS"))
                    .map_or(SampleValue::Unsupported, |kb| SampleValue::Uint64(kb * 1024)),
                RUNTIME_THREADS => status
                    .and_then(|s| Self::proc_status_field(s, "Threads"))
                    .map_or(SampleValue::Unsupported, SampleValue::Uint64),
                RUNTIME_TASKS => SampleValue::Uint64(Self::live_tasks()),
                _ => SampleValue::Unsupported,
            };
        }
    }
}

/// Samples agent-level stats for the host-provided export path.
pub struct AgentStatSampler {
    source: Box<dyn RuntimeMetricsSource>,
}

impl Default for AgentStatSampler {
    fn default() -> Self {
        Self::new(Box::new(ProcessRuntimeSource))
    }
}

impl AgentStatSampler {
    /// Creates a sampler reading from `source`.
    #[must_use]
    pub fn new(source: Box<dyn RuntimeMetricsSource>) -> Self {
        Self { source }
    }

    /// Returns the agent keys this sampler may produce.
    #[must_use]
    pub fn agent_keys() -> Vec<&'static str> {
        AGENT_STAT_TABLE.iter().map(|(_, key)| *key).collect()
    }

    /// Samples every configured counter and returns a single agent stat map.
    ///
    /// A key is either present with a well-formed decimal value or absent.
    #[must_use]
    pub fn get_agent_stat(&self) -> Vec<FlatMetrics> {
        let mut samples: Vec<Sample> = AGENT_STAT_TABLE
            .iter()
            .map(|(name, _)| Sample::new(*name))
            .collect();
        self.source.read(&mut samples);

        let mut metric = FlatMetrics::with_capacity(samples.len());
        for (sample, (_, key)) in samples.iter().zip(AGENT_STAT_TABLE) {
            if let Some(value) = format_value(key, sample.value) {
                metric.insert((*key).to_string(), value);
            }
        }
        vec![metric]
    }
}

impl std::fmt::Debug for AgentStatSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentStatSampler")
            .field("keys", &Self::agent_keys())
            .finish_non_exhaustive()
    }
}

fn format_value(key: &str, value: SampleValue) -> Option<String> {
    match value {
        SampleValue::Uint64(v) if key.ends_with("_mb") => Some((v / BYTES_PER_MB).to_string()),
        SampleValue::Uint64(v) => Some(v.to_string()),
        SampleValue::Float64(v) => Some(v.to_string()),
        SampleValue::Unsupported => None,
    }
}
