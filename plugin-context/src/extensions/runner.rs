//! In-process extension runner.

use super::{Extension, ExtensionCatalog, ExtensionConfig, ExtensionRunner, PluginMeta};
use crate::context::PipelineContext;
use crate::errors::ExtensionError;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Holds the extensions of one pipeline.
///
/// Lookups take a read lock on the table. Creation is serialized by a
/// per-pipeline mutex and re-checks the table under it, so two plugins racing
/// for the same extension get the same instance. The mutex is reentrant
/// because an extension's `init` may itself request another extension; a
/// request for an identity still being created fails as a cycle.
pub struct PluginRunner {
    catalog: Arc<ExtensionCatalog>,
    context: Weak<PipelineContext>,
    extensions: RwLock<BTreeMap<String, Arc<dyn Extension>>>,
    creation: ReentrantMutex<()>,
    /// Identities whose creation is in progress on the thread holding `creation`.
    in_progress: Mutex<BTreeSet<String>>,
}

impl PluginRunner {
    /// Creates a runner for the pipeline owning `context`.
    #[must_use]
    pub fn new(catalog: Arc<ExtensionCatalog>, context: &Arc<PipelineContext>) -> Self {
        Self {
            catalog,
            context: Arc::downgrade(context),
            extensions: RwLock::new(BTreeMap::new()),
            creation: ReentrantMutex::new(()),
            in_progress: Mutex::new(BTreeSet::new()),
        }
    }

    /// Creates and registers an extension declared in the pipeline definition.
    pub fn declare_extension(&self, name: &str, cfg: &ExtensionConfig) -> Result<(), ExtensionError> {
        self.load_extension(&PluginMeta::parse(name), cfg)
    }

    /// Lists registered extension identities, sorted.
    #[must_use]
    pub fn extension_names(&self) -> Vec<String> {
        self.extensions.read().keys().cloned().collect()
    }

    /// Returns the number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.read().len()
    }

    /// Returns true if no extension is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.read().is_empty()
    }

    /// Stops and unregisters every extension.
    ///
    /// All extensions are stopped even if some fail; the first failure is
    /// returned.
    pub fn stop(&self) -> Result<(), ExtensionError> {
        let _creation = self.creation.lock();
        let drained = std::mem::take(&mut *self.extensions.write());

        let mut first_error = None;
        for (name, extension) in drained {
            if let Err(e) = extension.stop() {
                warn!(extension = %name, error = %e, "Failed to stop extension");
                first_error.get_or_insert(e);
            } else {
                debug!(extension = %name, "Extension stopped");
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl ExtensionRunner for PluginRunner {
    fn get_extension(&self, name: &str) -> Option<Arc<dyn Extension>> {
        self.extensions.read().get(name).cloned()
    }

    fn load_extension(&self, meta: &PluginMeta, cfg: &ExtensionConfig) -> Result<(), ExtensionError> {
        if self.extensions.read().contains_key(&meta.plugin_type_with_id) {
            return Ok(());
        }

        let _creation = self.creation.lock();
        if self.extensions.read().contains_key(&meta.plugin_type_with_id) {
            return Ok(());
        }

        let context = self.context.upgrade().ok_or_else(|| ExtensionError::ContextGone {
            name: meta.plugin_type_with_id.clone(),
        })?;

        if !self.in_progress.lock().insert(meta.plugin_type_with_id.clone()) {
            warn!(extension = %meta, "Cyclic extension dependency");
            return Err(ExtensionError::init_failed(
                &meta.plugin_type_with_id,
                "cyclic extension dependency",
            ));
        }
        let created = {
            let _span = context.span().entered();
            self.catalog
                .create(&meta.plugin_type, cfg)
                .and_then(|extension| extension.init(&context).map(|()| extension))
        };
        self.in_progress.lock().remove(&meta.plugin_type_with_id);
        let extension = created?;

        self.extensions
            .write()
            .insert(meta.plugin_type_with_id.clone(), extension);
        context.add_plugin(&meta.plugin_type_with_id);

        info!(
            extension = %meta,
            config = %context.config_name(),
            "Extension loaded"
        );
        Ok(())
    }
}

impl std::fmt::Debug for PluginRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRunner")
            .field("extensions", &self.extension_names())
            .finish_non_exhaustive()
    }
}
