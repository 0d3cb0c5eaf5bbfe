//! Pipeline identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the pipeline a context belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMeta {
    /// The project the pipeline ships to.
    pub project: String,
    /// The logstore (dataset) within the project.
    pub logstore: String,
    /// The pipeline's config name.
    pub config_name: String,
    /// Unique ID of this context instance, regenerated on each init.
    pub instance_id: Uuid,
}

impl Default for ContextMeta {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl ContextMeta {
    /// Creates identity metadata with a fresh instance ID.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        logstore: impl Into<String>,
        config_name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            logstore: logstore.into(),
            config_name: config_name.into(),
            instance_id: Uuid::new_v4(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> std::collections::HashMap<String, serde_json::Value> {
        let mut map = std::collections::HashMap::new();
        map.insert("project".to_string(), serde_json::json!(self.project));
        map.insert("logstore".to_string(), serde_json::json!(self.logstore));
        map.insert("config_name".to_string(), serde_json::json!(self.config_name));
        map.insert("instance_id".to_string(), serde_json::json!(self.instance_id.to_string()));
        map
    }
}
