//! Catalog of extension factories.

use super::{Extension, ExtensionConfig};
use crate::errors::ExtensionError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory function type for creating extensions from their configuration.
pub type ExtensionFactory =
    Arc<dyn Fn(&ExtensionConfig) -> Result<Arc<dyn Extension>, ExtensionError> + Send + Sync>;

/// Registry of extension factories keyed by extension type.
///
/// Usually populated once at startup and shared by every pipeline runner.
#[derive(Default)]
pub struct ExtensionCatalog {
    factories: RwLock<HashMap<String, ExtensionFactory>>,
}

impl ExtensionCatalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory, replacing any previous one for the same type.
    pub fn register<F>(&self, plugin_type: impl Into<String>, factory: F)
    where
        F: Fn(&ExtensionConfig) -> Result<Arc<dyn Extension>, ExtensionError>
            + Send
            + Sync
            + 'static,
    {
        self.factories
            .write()
            .insert(plugin_type.into(), Arc::new(factory));
    }

    /// Checks if a factory is registered for the type.
    #[must_use]
    pub fn contains(&self, plugin_type: &str) -> bool {
        self.factories.read().contains_key(plugin_type)
    }

    /// Lists registered types, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Builds a new, uninitialized extension of the given type.
    pub fn create(
        &self,
        plugin_type: &str,
        cfg: &ExtensionConfig,
    ) -> Result<Arc<dyn Extension>, ExtensionError> {
        // Clone the factory out so it runs without holding the lock.
        let factory = self
            .factories
            .read()
            .get(plugin_type)
            .cloned()
            .ok_or_else(|| ExtensionError::unknown_type(plugin_type))?;
        factory(cfg)
    }
}

impl std::fmt::Debug for ExtensionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionCatalog")
            .field("types", &self.types())
            .finish()
    }
}

/// Decodes an extension configuration into the extension's settings type.
///
/// A `null` configuration yields the type's defaults.
pub fn decode_config<T>(name: &str, cfg: &ExtensionConfig) -> Result<T, ExtensionError>
where
    T: DeserializeOwned + Default,
{
    if cfg.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(cfg.clone())
        .map_err(|e| ExtensionError::invalid_config(name, e.to_string()))
}
