//! A pipeline wired for tests.

use std::sync::Arc;

use crate::checkpoint::InMemoryCheckpointStore;
use crate::config::ContextConfig;
use crate::context::PipelineContext;
use crate::extensions::{ExtensionCatalog, PluginRunner};

/// A context bound to a runner over an in-memory checkpoint store.
///
/// The fixture owns the runner, as a pipeline would.
#[derive(Debug)]
pub struct TestPipeline {
    /// The pipeline's context.
    pub context: Arc<PipelineContext>,
    /// The factories extensions are built from.
    pub catalog: Arc<ExtensionCatalog>,
    /// The pipeline's runner.
    pub runner: Arc<PluginRunner>,
    /// The store behind the context's checkpoints.
    pub store: Arc<InMemoryCheckpointStore>,
}

impl TestPipeline {
    /// Creates a pipeline named `config_name` in project `proj`, logstore `store`.
    #[must_use]
    pub fn new(config_name: impl Into<String>) -> Self {
        Self::with_config(config_name, ContextConfig::default())
    }

    /// Creates a pipeline with a custom context config.
    #[must_use]
    pub fn with_config(config_name: impl Into<String>, config: ContextConfig) -> Self {
        let store = Arc::new(InMemoryCheckpointStore::new());
        let context = Arc::new(PipelineContext::new(store.clone()).with_config(config));
        context.init_context("proj", "store", config_name);

        let catalog = Arc::new(ExtensionCatalog::new());
        let runner = Arc::new(PluginRunner::new(catalog.clone(), &context));
        context.bind_runner(&runner);

        Self {
            context,
            catalog,
            runner,
            store,
        }
    }

    /// Renames the pipeline, keeping its store.
    pub fn rename(&self, config_name: impl Into<String>) {
        self.context.init_context("proj", "store", config_name);
    }
}
