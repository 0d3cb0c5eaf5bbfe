//! Self-reported metrics of the Kubernetes metadata cache.

use super::FlatMetrics;

/// Source of the metadata cache's own metrics, in native export form.
pub trait MetaCacheMetrics: Send + Sync {
    /// Returns the cache's metric entries.
    fn get_meta_manager_metrics(&self) -> Vec<FlatMetrics>;
}

/// Used when no metadata cache runs in this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetaCache;

impl MetaCacheMetrics for NoopMetaCache {
    fn get_meta_manager_metrics(&self) -> Vec<FlatMetrics> {
        Vec::new()
    }
}
