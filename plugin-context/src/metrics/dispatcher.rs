//! Export dispatch across the native and host-provided metric sources.

use super::{AgentStatSampler, ConfigRegistry, FlatMetrics, MetaCacheMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which side of the export boundary a metric batch comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricExportType {
    /// Plugin and runner records, exported as labels/counters/gauges maps.
    Direct,
    /// Agent-level values whose definitions live on the host side.
    CppProvided,
}

impl MetricExportType {
    /// Returns the wire literal.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::CppProvided => "cpp_provided",
        }
    }

    /// Parses a wire literal. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "direct" => Some(Self::Direct),
            "cpp_provided" => Some(Self::CppProvided),
            _ => None,
        }
    }
}

impl fmt::Display for MetricExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source of metric entries on one side of the export boundary.
pub trait MetricsProvider: Send + Sync {
    /// The export type this provider answers.
    fn export_type(&self) -> MetricExportType;

    /// Collects the current metric entries.
    fn collect(&self) -> Vec<FlatMetrics>;
}

/// Records of every live pipeline, followed by the metadata cache's metrics.
pub struct NativeMetricsProvider {
    registry: Arc<ConfigRegistry>,
    meta_cache: Arc<dyn MetaCacheMetrics>,
}

impl NativeMetricsProvider {
    /// Creates a provider over the given registry and metadata cache.
    #[must_use]
    pub fn new(registry: Arc<ConfigRegistry>, meta_cache: Arc<dyn MetaCacheMetrics>) -> Self {
        Self {
            registry,
            meta_cache,
        }
    }
}

impl MetricsProvider for NativeMetricsProvider {
    fn export_type(&self) -> MetricExportType {
        MetricExportType::Direct
    }

    fn collect(&self) -> Vec<FlatMetrics> {
        let mut metrics = Vec::new();
        self.registry
            .for_each_context(|ctx| metrics.extend(ctx.export_metric_records()));
        metrics.extend(self.meta_cache.get_meta_manager_metrics());
        metrics
    }
}

/// Agent-level stats sampled for the host.
#[derive(Debug, Default)]
pub struct HostProvidedMetricsProvider {
    sampler: AgentStatSampler,
}

impl HostProvidedMetricsProvider {
    /// Creates a provider over the given sampler.
    #[must_use]
    pub fn new(sampler: AgentStatSampler) -> Self {
        Self { sampler }
    }
}

impl MetricsProvider for HostProvidedMetricsProvider {
    fn export_type(&self) -> MetricExportType {
        MetricExportType::CppProvided
    }

    fn collect(&self) -> Vec<FlatMetrics> {
        self.sampler.get_agent_stat()
    }
}

/// Maps an export solicitation to the matching provider.
pub struct MetricsDispatcher {
    native: Box<dyn MetricsProvider>,
    host_provided: Box<dyn MetricsProvider>,
}

impl MetricsDispatcher {
    /// Creates a dispatcher from its two providers.
    #[must_use]
    pub fn new(native: Box<dyn MetricsProvider>, host_provided: Box<dyn MetricsProvider>) -> Self {
        Self {
            native,
            host_provided,
        }
    }

    /// Wires the default providers over a registry and metadata cache.
    #[must_use]
    pub fn with_defaults(registry: Arc<ConfigRegistry>, meta_cache: Arc<dyn MetaCacheMetrics>) -> Self {
        Self::new(
            Box::new(NativeMetricsProvider::new(registry, meta_cache)),
            Box::new(HostProvidedMetricsProvider::default()),
        )
    }

    /// Returns the metrics for a wire export type.
    ///
    /// Unrecognized types yield an empty list.
    #[must_use]
    pub fn get_metrics(&self, export_type: &str) -> Vec<FlatMetrics> {
        MetricExportType::parse(export_type).map_or_else(Vec::new, |t| self.collect(t))
    }

    /// Returns the metrics for a known export type.
    #[must_use]
    pub fn collect(&self, export_type: MetricExportType) -> Vec<FlatMetrics> {
        match export_type {
            MetricExportType::Direct => self.native.collect(),
            MetricExportType::CppProvided => self.host_provided.collect(),
        }
    }
}

impl fmt::Debug for MetricsDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsDispatcher")
            .field("native", &self.native.export_type())
            .field("host_provided", &self.host_provided.export_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NoopMetaCache;

    #[test]
    fn test_export_type_literals() {
        assert_eq!(MetricExportType::parse("direct"), Some(MetricExportType::Direct));
        assert_eq!(MetricExportType::parse("cpp_provided"), Some(MetricExportType::CppProvided));
        assert_eq!(MetricExportType::parse("Direct"), None);
        assert_eq!(MetricExportType::CppProvided.to_string(), "cpp_provided");
    }

    #[test]
    fn test_export_type_serde_matches_wire_literals() {
        let json = serde_json::to_string(&MetricExportType::CppProvided).unwrap();
        assert_eq!(json, "\"cpp_provided\"");
        let parsed: MetricExportType = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(parsed, MetricExportType::Direct);
    }

    #[test]
    fn test_empty_direct_and_unknown() {
        let dispatcher = MetricsDispatcher::with_defaults(
            Arc::new(ConfigRegistry::new()),
            Arc::new(NoopMetaCache),
        );

        assert!(dispatcher.get_metrics("direct").is_empty());
        assert!(dispatcher.get_metrics("unknown").is_empty());
        assert!(dispatcher.get_metrics("").is_empty());
    }

    #[test]
    fn test_cpp_provided_is_single_map() {
        let dispatcher = MetricsDispatcher::with_defaults(
            Arc::new(ConfigRegistry::new()),
            Arc::new(NoopMetaCache),
        );

        assert_eq!(dispatcher.get_metrics("cpp_provided").len(), 1);
    }

    #[test]
    fn test_provider_tags() {
        let native = NativeMetricsProvider::new(Arc::new(ConfigRegistry::new()), Arc::new(NoopMetaCache));
        assert_eq!(native.export_type(), MetricExportType::Direct);
        assert_eq!(
            HostProvidedMetricsProvider::default().export_type(),
            MetricExportType::CppProvided
        );
    }
}
