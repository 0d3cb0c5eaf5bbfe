//! Registry of live pipeline contexts.

use crate::context::PipelineContext;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Reason given to a pipeline's runtime token when it is removed.
pub const PIPELINE_STOPPED_REASON: &str = "pipeline stopped";

/// The set of running pipelines, keyed by config name.
///
/// A pipeline is inserted when it starts and removed when it stops. The
/// metrics exporter walks this registry to collect every context's records.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: RwLock<BTreeMap<String, Arc<PipelineContext>>>,
}

impl ConfigRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a started pipeline, returning the context it replaced.
    pub fn insert(&self, ctx: Arc<PipelineContext>) -> Option<Arc<PipelineContext>> {
        let config_name = ctx.config_name();
        info!(config = %config_name, "Pipeline registered");
        self.configs.write().insert(config_name, ctx)
    }

    /// Unregisters a stopped pipeline and cancels its runtime token.
    pub fn remove(&self, config_name: &str) -> Option<Arc<PipelineContext>> {
        let removed = self.configs.write().remove(config_name);
        if let Some(ref ctx) = removed {
            ctx.runtime_token().cancel(PIPELINE_STOPPED_REASON);
            info!(config = %config_name, "Pipeline unregistered");
        }
        removed
    }

    /// Gets a running pipeline's context.
    #[must_use]
    pub fn get(&self, config_name: &str) -> Option<Arc<PipelineContext>> {
        self.configs.read().get(config_name).cloned()
    }

    /// Returns the config names of running pipelines, sorted.
    #[must_use]
    pub fn config_names(&self) -> Vec<String> {
        self.configs.read().keys().cloned().collect()
    }

    /// Returns the number of running pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    /// Returns true if no pipeline is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }

    /// Visits every context in config-name order while holding the read lock.
    pub fn for_each_context<F>(&self, mut f: F)
    where
        F: FnMut(&PipelineContext),
    {
        for ctx in self.configs.read().values() {
            f(ctx);
        }
    }
}
