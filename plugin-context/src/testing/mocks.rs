//! Test doubles for the context's collaborators.

use parking_lot::Mutex;
use serde::Deserialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::checkpoint::CheckpointStore;
use crate::context::PipelineContext;
use crate::errors::{CheckpointError, ExtensionError};
use crate::extensions::{decode_config, Extension, ExtensionCatalog, ExtensionConfig};
use crate::metrics::{FlatMetrics, MetaCacheMetrics, RuntimeMetricsSource, Sample, SampleValue};

/// An extension that records its lifecycle.
#[derive(Debug)]
pub struct MockExtension {
    description: String,
    fail_init: bool,
    dependency: Option<String>,
    init_count: AtomicUsize,
    stopped: AtomicBool,
    config: ExtensionConfig,
}

impl MockExtension {
    /// Creates a mock extension.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            fail_init: false,
            dependency: None,
            init_count: AtomicUsize::new(0),
            stopped: AtomicBool::new(false),
            config: ExtensionConfig::Null,
        }
    }

    /// Makes `init` fail.
    #[must_use]
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Makes `init` resolve another extension through the context.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependency = Some(name.into());
        self
    }

    /// Keeps the config the extension was created with.
    #[must_use]
    pub fn with_config(mut self, config: ExtensionConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the config the extension was created with.
    #[must_use]
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Returns the number of `init` calls.
    #[must_use]
    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    /// Returns true once `stop` was called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Extension for MockExtension {
    fn description(&self) -> &str {
        &self.description
    }

    fn init(&self, ctx: &PipelineContext) -> Result<(), ExtensionError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(ExtensionError::init_failed(&self.description, "mock init failure"));
        }
        if let Some(dependency) = &self.dependency {
            ctx.get_extension(dependency, &ExtensionConfig::Null)
                .map_err(|e| ExtensionError::init_failed(&self.description, e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), ExtensionError> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Settings understood by [`CountingFactory`] extensions.
#[derive(Debug, Default, Deserialize)]
struct MockSettings {
    #[serde(default)]
    fail_init: bool,
}

/// Registers a [`MockExtension`] factory and counts what it builds.
///
/// A config of `{"fail_init": true}` builds an extension whose `init` fails.
#[derive(Debug, Clone)]
pub struct CountingFactory {
    plugin_type: String,
    created: Arc<AtomicUsize>,
    configs: Arc<Mutex<Vec<ExtensionConfig>>>,
}

impl CountingFactory {
    /// Creates a factory for `plugin_type`.
    #[must_use]
    pub fn new(plugin_type: impl Into<String>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            created: Arc::new(AtomicUsize::new(0)),
            configs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers the factory in `catalog`.
    pub fn register(&self, catalog: &ExtensionCatalog) {
        let description = self.plugin_type.clone();
        let created = self.created.clone();
        let configs = self.configs.clone();
        catalog.register(self.plugin_type.clone(), move |cfg| {
            let settings: MockSettings = decode_config(&description, cfg)?;
            created.fetch_add(1, Ordering::SeqCst);
            configs.lock().push(cfg.clone());
            let mut extension = MockExtension::new(description.clone()).with_config(cfg.clone());
            if settings.fail_init {
                extension = extension.failing_init();
            }
            Ok(Arc::new(extension) as Arc<dyn Extension>)
        });
    }

    /// Returns how many extensions were built.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Returns the configs passed to each build, in order.
    #[must_use]
    pub fn configs(&self) -> Vec<ExtensionConfig> {
        self.configs.lock().clone()
    }
}

/// A checkpoint store whose every operation fails.
#[derive(Debug, Clone, Default)]
pub struct FailingCheckpointStore;

impl CheckpointStore for FailingCheckpointStore {
    fn save_checkpoint(&self, _config_name: &str, _key: &str, _value: &[u8])
        -> Result<(), CheckpointError> {
        Err(CheckpointError::storage("store unavailable"))
    }

    fn get_checkpoint(&self, _config_name: &str, _key: &str)
        -> Result<Option<Vec<u8>>, CheckpointError> {
        Err(CheckpointError::storage("store unavailable"))
    }
}

/// A metadata cache reporting fixed entries.
#[derive(Debug, Clone, Default)]
pub struct StaticMetaCache {
    metrics: Vec<FlatMetrics>,
}

impl StaticMetaCache {
    /// Creates a cache reporting `metrics`.
    #[must_use]
    pub fn new(metrics: Vec<FlatMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetaCacheMetrics for StaticMetaCache {
    fn get_meta_manager_metrics(&self) -> Vec<FlatMetrics> {
        self.metrics.clone()
    }
}

/// A runtime source with preset values. Unset names read as unsupported.
#[derive(Debug, Default)]
pub struct FixedRuntimeSource {
    values: HashMap<String, SampleValue>,
    reads: Arc<AtomicUsize>,
}

impl FixedRuntimeSource {
    /// Creates a source with no values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value reported for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: SampleValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Returns a handle counting batched reads.
    #[must_use]
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

impl RuntimeMetricsSource for FixedRuntimeSource {
    fn read(&self, samples: &mut [Sample]) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        for sample in samples {
            sample.value = self.values.get(&sample.name).copied().unwrap_or_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_factory_records_configs() {
        let catalog = ExtensionCatalog::new();
        let factory = CountingFactory::new("ext_mock");
        factory.register(&catalog);

        let ext = catalog.create("ext_mock", &serde_json::json!({"a": 1})).unwrap();

        assert_eq!(factory.created(), 1);
        assert_eq!(factory.configs(), vec![serde_json::json!({"a": 1})]);
        let mock = ext.downcast_ref::<MockExtension>().unwrap();
        assert_eq!(mock.config(), &serde_json::json!({"a": 1}));
        assert_eq!(mock.init_count(), 0);
    }

    #[test]
    fn test_failing_store() {
        let store = FailingCheckpointStore;
        assert!(store.save_checkpoint("cfg", "k", b"v").is_err());
        assert!(store.get_checkpoint("cfg", "k").is_err());
    }
}
