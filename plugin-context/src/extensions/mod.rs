//! Extensions: shared, pipeline-scoped helpers that plugins look up by name.
//!
//! This module provides:
//! - The [`Extension`] trait implemented by extension plugins
//! - A catalog of extension factories keyed by type
//! - The [`ExtensionRunner`] seam the context resolves extensions through,
//!   and [`PluginRunner`], its in-process implementation

mod catalog;
mod plugin_meta;
mod runner;

pub use catalog::{decode_config, ExtensionCatalog, ExtensionFactory};
pub use plugin_meta::{is_plugin_type_with_id, PluginMeta, IMPLICIT_PLUGIN_ID};
pub use runner::PluginRunner;

use crate::context::PipelineContext;
use crate::errors::ExtensionError;
use std::any::Any;
use std::sync::Arc;

/// Opaque extension configuration. Its shape is defined by each extension type.
pub type ExtensionConfig = serde_json::Value;

/// A shared helper plugin, created at most once per pipeline and name.
pub trait Extension: Send + Sync {
    /// Returns a short human-readable description.
    fn description(&self) -> &str;

    /// Binds the extension to its pipeline. Called once, right after creation.
    fn init(&self, ctx: &PipelineContext) -> Result<(), ExtensionError>;

    /// Releases resources when the pipeline stops.
    fn stop(&self) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Returns `self` for downcasting to the concrete extension type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Extension {
    /// Downcasts to a concrete extension type.
    #[must_use]
    pub fn downcast_ref<T: Extension + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// The pipeline-side table of live extensions.
///
/// Implementations are the single source of truth for extension identity:
/// [`load_extension`](Self::load_extension) must not create a second instance
/// for an identity that is already registered.
pub trait ExtensionRunner: Send + Sync {
    /// Looks up a registered extension by plugin type with ID.
    fn get_extension(&self, name: &str) -> Option<Arc<dyn Extension>>;

    /// Creates, initializes and registers an extension under `meta`'s identity.
    ///
    /// Succeeds without side effects when the identity is already registered.
    fn load_extension(&self, meta: &PluginMeta, cfg: &ExtensionConfig)
        -> Result<(), ExtensionError>;
}
