//! Configuration types.
//!
//! All configs deserialize from JSON with per-field defaults, so a partial
//! document (or `{}`) is always valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::metrics::MetricExportType;

/// How the topic of collected events is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicType {
    /// No topic.
    #[default]
    None,
    /// Topic extracted from the file path.
    Filepath,
    /// Topic taken from the machine group.
    MachineGroupTopic,
    /// Topic given verbatim by `topic_format`.
    Custom,
    /// Agent default topic.
    Default,
}

/// Pipeline-scope settings shared by every plugin of one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineScopeConfig {
    /// How the topic is derived.
    #[serde(default)]
    pub topic_type: TopicType,
    /// Topic format, meaningful for `filepath` and `custom`.
    #[serde(default)]
    pub topic_format: String,
    /// Scheduling priority of the pipeline.
    #[serde(default = "default_priority")]
    pub priority: u32,
    /// Whether event timestamps keep nanosecond precision.
    #[serde(default)]
    pub enable_timestamp_nanosecond: bool,
    /// Whether the legacy content tag layout is used.
    #[serde(default)]
    pub using_old_content_tag: bool,
}

fn default_priority() -> u32 {
    1
}

impl Default for PipelineScopeConfig {
    fn default() -> Self {
        Self {
            topic_type: TopicType::default(),
            topic_format: String::new(),
            priority: default_priority(),
            enable_timestamp_nanosecond: false,
            using_old_content_tag: false,
        }
    }
}

impl PipelineScopeConfig {
    /// Creates a pipeline-scope config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a pipeline-scope config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the topic type and format.
    #[must_use]
    pub fn with_topic(mut self, topic_type: TopicType, format: impl Into<String>) -> Self {
        self.topic_type = topic_type;
        self.topic_format = format.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

/// Settings for [`PipelineContext`](crate::context::PipelineContext) behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum bytes of a corrupt checkpoint payload written to the alarm log.
    #[serde(default = "default_checkpoint_alarm_max_bytes")]
    pub checkpoint_alarm_max_bytes: usize,
}

fn default_checkpoint_alarm_max_bytes() -> usize {
    1024
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            checkpoint_alarm_max_bytes: default_checkpoint_alarm_max_bytes(),
        }
    }
}

/// Settings for the periodic metrics exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Seconds between two export passes.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Which metric sources are exported on each pass.
    #[serde(default = "default_export_types")]
    pub export_types: Vec<MetricExportType>,
}

fn default_interval_seconds() -> u64 {
    60
}

fn default_export_types() -> Vec<MetricExportType> {
    vec![MetricExportType::Direct, MetricExportType::CppProvided]
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            export_types: default_export_types(),
        }
    }
}

impl ExporterConfig {
    /// Creates an exporter config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval_seconds(mut self, seconds: u64) -> Self {
        self.interval_seconds = seconds;
        self
    }

    /// Sets the exported source types.
    #[must_use]
    pub fn with_export_types(mut self, types: Vec<MetricExportType>) -> Self {
        self.export_types = types;
        self
    }

    /// Returns the interval, never shorter than one second.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }
}

/// Settings for the `tracing` subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pipeline_scope_defaults() {
        let config = PipelineScopeConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineScopeConfig::default());
        assert_eq!(config.priority, 1);
        assert_eq!(config.topic_type, TopicType::None);
    }

    #[test]
    fn test_pipeline_scope_from_json() {
        let config = PipelineScopeConfig::from_json(
            r#"{"topic_type": "machine_group_topic", "priority": 3, "enable_timestamp_nanosecond": true}"#,
        )
        .unwrap();

        assert_eq!(config.topic_type, TopicType::MachineGroupTopic);
        assert_eq!(config.priority, 3);
        assert!(config.enable_timestamp_nanosecond);
        assert!(!config.using_old_content_tag);
    }

    #[test]
    fn test_pipeline_scope_builders() {
        let config = PipelineScopeConfig::new()
            .with_topic(TopicType::Filepath, "/var/log/(.*)/app.log")
            .with_priority(5);

        assert_eq!(config.topic_type, TopicType::Filepath);
        assert_eq!(config.topic_format, "/var/log/(.*)/app.log");
        assert_eq!(config.priority, 5);
    }

    #[test]
    fn test_pipeline_scope_rejects_unknown_topic_type() {
        assert!(PipelineScopeConfig::from_json(r#"{"topic_type": "nope"}"#).is_err());
    }

    #[test]
    fn test_exporter_config_defaults() {
        let config: ExporterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.interval_seconds, 60);
        assert_eq!(
            config.export_types,
            vec![MetricExportType::Direct, MetricExportType::CppProvided]
        );
    }

    #[test]
    fn test_exporter_interval_floor() {
        let config = ExporterConfig::new().with_interval_seconds(0);
        assert_eq!(config.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_context_config_default() {
        assert_eq!(ContextConfig::default().checkpoint_alarm_max_bytes, 1024);
    }
}
