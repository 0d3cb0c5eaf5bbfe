//! Plugin identity records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Plugin ID given to extensions created on demand rather than declared.
pub const IMPLICIT_PLUGIN_ID: &str = "default";

/// Identity of a plugin instance within one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginMeta {
    /// Full identity, `type` or `type/id`.
    pub plugin_type_with_id: String,
    /// The plugin type.
    pub plugin_type: String,
    /// The instance ID, empty when the name carries none.
    pub plugin_id: String,
}

impl PluginMeta {
    /// Parses a declared name of the form `type` or `type/id`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.split_once('/') {
            Some((plugin_type, plugin_id)) => Self {
                plugin_type_with_id: name.to_string(),
                plugin_type: plugin_type.to_string(),
                plugin_id: plugin_id.to_string(),
            },
            None => Self {
                plugin_type_with_id: name.to_string(),
                plugin_type: name.to_string(),
                plugin_id: String::new(),
            },
        }
    }

    /// Identity for an extension of type `plugin_type` created on demand.
    ///
    /// Deterministic, so concurrent requests for the same type resolve to
    /// the same registration.
    #[must_use]
    pub fn implicit(plugin_type: &str) -> Self {
        Self {
            plugin_type_with_id: format!("{plugin_type}/{IMPLICIT_PLUGIN_ID}"),
            plugin_type: plugin_type.to_string(),
            plugin_id: IMPLICIT_PLUGIN_ID.to_string(),
        }
    }
}

impl fmt::Display for PluginMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plugin_type_with_id)
    }
}

/// Returns true if `name` names a specific instance (`type/id`).
#[must_use]
pub fn is_plugin_type_with_id(name: &str) -> bool {
    name.contains('/')
}
