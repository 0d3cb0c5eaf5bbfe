//! The pipeline context: identity, plugins and extension resolution.

use super::ContextMeta;
use crate::cancellation::CancellationToken;
use crate::checkpoint::CheckpointStore;
use crate::config::{ContextConfig, PipelineScopeConfig};
use crate::errors::ContextError;
use crate::extensions::{
    is_plugin_type_with_id, Extension, ExtensionConfig, ExtensionRunner, PluginMeta,
};
use crate::metrics::MetricsRecord;
use crate::observability::{emit_alarm, AlarmType};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{debug, Span};

/// The handle a pipeline gives each of its plugins.
///
/// One context exists per running pipeline. It is shared by every plugin of
/// that pipeline, possibly from many threads at once.
pub struct PipelineContext {
    meta: RwLock<ContextMeta>,
    plugin_names: Mutex<String>,
    pub(super) metrics_records: RwLock<Vec<Arc<MetricsRecord>>>,
    pub(super) logstore_config_metric_record: RwLock<Option<Arc<MetricsRecord>>>,
    /// Not owned: the pipeline owns its runner.
    runner: RwLock<Option<Weak<dyn ExtensionRunner>>>,
    pub(super) checkpoint_store: Arc<dyn CheckpointStore>,
    pipeline_scope_config: PipelineScopeConfig,
    pub(super) config: ContextConfig,
    runtime_token: Arc<CancellationToken>,
}

impl PipelineContext {
    /// Creates a context persisting checkpoints to `checkpoint_store`.
    #[must_use]
    pub fn new(checkpoint_store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            meta: RwLock::new(ContextMeta::default()),
            plugin_names: Mutex::new(String::new()),
            metrics_records: RwLock::new(Vec::new()),
            logstore_config_metric_record: RwLock::new(None),
            runner: RwLock::new(None),
            checkpoint_store,
            pipeline_scope_config: PipelineScopeConfig::default(),
            config: ContextConfig::default(),
            runtime_token: Arc::new(CancellationToken::new()),
        }
    }

    /// Sets the context behavior config.
    #[must_use]
    pub fn with_config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the pipeline-scope config exposed to plugins.
    #[must_use]
    pub fn with_pipeline_scope_config(mut self, config: PipelineScopeConfig) -> Self {
        self.pipeline_scope_config = config;
        self
    }

    /// Binds the pipeline's identity. A later call replaces it entirely.
    pub fn init_context(
        &self,
        project: impl Into<String>,
        logstore: impl Into<String>,
        config_name: impl Into<String>,
    ) {
        *self.meta.write() = ContextMeta::new(project, logstore, config_name);
    }

    /// Returns a copy of the identity.
    #[must_use]
    pub fn meta(&self) -> ContextMeta {
        self.meta.read().clone()
    }

    /// Returns the project.
    #[must_use]
    pub fn project(&self) -> String {
        self.meta.read().project.clone()
    }

    /// Returns the logstore.
    #[must_use]
    pub fn logstore(&self) -> String {
        self.meta.read().logstore.clone()
    }

    /// Returns the config name.
    #[must_use]
    pub fn config_name(&self) -> String {
        self.meta.read().config_name.clone()
    }

    /// Appends a plugin to the audit trail. Repeats are kept.
    pub fn add_plugin(&self, name: &str) {
        let mut names = self.plugin_names.lock();
        if !names.is_empty() {
            names.push(',');
        }
        names.push_str(name);
    }

    /// Returns the comma-joined plugin audit trail.
    #[must_use]
    pub fn plugin_names(&self) -> String {
        self.plugin_names.lock().clone()
    }

    /// Returns the pipeline-scope config.
    #[must_use]
    pub fn pipeline_scope_config(&self) -> &PipelineScopeConfig {
        &self.pipeline_scope_config
    }

    /// Returns the token cancelled when the pipeline stops.
    #[must_use]
    pub fn runtime_token(&self) -> &Arc<CancellationToken> {
        &self.runtime_token
    }

    /// Returns a span carrying the pipeline identity, for plugin logs.
    #[must_use]
    pub fn span(&self) -> Span {
        let meta = self.meta.read();
        tracing::info_span!(
            "pipeline",
            project = %meta.project,
            logstore = %meta.logstore,
            config = %meta.config_name,
        )
    }

    /// Binds the runner extensions are resolved through.
    ///
    /// Only a weak reference is kept; once the runner is dropped, extension
    /// lookups fail with [`ContextError::NotInitialized`].
    pub fn bind_runner<R>(&self, runner: &Arc<R>)
    where
        R: ExtensionRunner + 'static,
    {
        let runner: Arc<dyn ExtensionRunner> = runner.clone();
        *self.runner.write() = Some(Arc::downgrade(&runner));
    }

    fn runner(&self) -> Option<Arc<dyn ExtensionRunner>> {
        self.runner.read().as_ref().and_then(Weak::upgrade)
    }

    /// Resolves an extension by name, creating a shared instance on demand.
    ///
    /// Declared extensions are returned as is. A plain type name that was not
    /// declared is created once per pipeline with `cfg`; later calls return
    /// the same instance whatever `cfg` they pass. A `type/id` name must have
    /// been declared.
    pub fn get_extension(
        &self,
        name: &str,
        cfg: &ExtensionConfig,
    ) -> Result<Arc<dyn Extension>, ContextError> {
        let runner = self.runner().ok_or(ContextError::NotInitialized)?;

        if let Some(existing) = runner.get_extension(name) {
            return Ok(existing);
        }

        if is_plugin_type_with_id(name) {
            return Err(ContextError::ExtensionNotFound {
                name: name.to_string(),
            });
        }

        let plugin_meta = PluginMeta::implicit(name);
        if let Err(e) = runner.load_extension(&plugin_meta, cfg) {
            emit_alarm(
                AlarmType::ExtensionLoad,
                &self.meta(),
                &format!("load extension {plugin_meta} error: {e}"),
            );
            return Err(e.into());
        }

        debug!(extension = %plugin_meta, config = %self.config_name(), "Extension resolved");
        runner
            .get_extension(&plugin_meta.plugin_type_with_id)
            .ok_or(ContextError::ExtensionInconsistent {
                name: plugin_meta.plugin_type_with_id,
            })
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("meta", &*self.meta.read())
            .field("plugin_names", &*self.plugin_names.lock())
            .field("metric_records", &self.metrics_records.read().len())
            .field("runner_bound", &self.runner().is_some())
            .finish_non_exhaustive()
    }
}
