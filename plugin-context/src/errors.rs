//! Error types for the plugin context.
//!
//! Every failure here is local to the requesting call. Nothing in this crate
//! aborts the process.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type returned by [`PipelineContext`](crate::context::PipelineContext) operations.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The pipeline runner is absent, so extensions cannot be resolved.
    #[error("pipeline not initialized")]
    NotInitialized,

    /// A named-with-ID extension was requested but never declared.
    #[error("not found extension: {name}")]
    ExtensionNotFound {
        /// The requested extension name.
        name: String,
    },

    /// Lazy extension creation failed.
    #[error("{0}")]
    ExtensionLoad(#[from] ExtensionError),

    /// The runner accepted a new extension but the follow-up lookup missed it.
    #[error("failed to load extension: {name}")]
    ExtensionInconsistent {
        /// The plugin type with ID that was registered.
        name: String,
    },

    /// A checkpoint value could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The checkpoint store failed.
    #[error("{0}")]
    Store(#[from] CheckpointError),
}

impl ContextError {
    /// Returns a stable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ExtensionNotFound { .. } => "EXTENSION_NOT_FOUND",
            Self::ExtensionLoad(_) => "EXTENSION_LOAD_FAILED",
            Self::ExtensionInconsistent { .. } => "EXTENSION_INCONSISTENT",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Store(_) => "CHECKPOINT_STORE",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));

        match self {
            Self::ExtensionNotFound { name } | Self::ExtensionInconsistent { name } => {
                map.insert("name".to_string(), serde_json::json!(name));
            }
            Self::ExtensionLoad(err) => {
                map.insert("name".to_string(), serde_json::json!(err.name()));
            }
            _ => {}
        }

        map
    }
}

impl From<serde_json::Error> for ContextError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised while creating or registering an extension.
#[derive(Debug, Clone, Error)]
pub enum ExtensionError {
    /// No factory is registered for the extension type.
    #[error("can't find plugin {plugin_type}")]
    UnknownType {
        /// The extension type.
        plugin_type: String,
    },

    /// The extension configuration was rejected.
    #[error("invalid config for extension {name}: {reason}")]
    InvalidConfig {
        /// The plugin type with ID.
        name: String,
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The extension failed to initialize.
    #[error("init extension {name} error: {reason}")]
    InitFailed {
        /// The plugin type with ID.
        name: String,
        /// The reason for failure.
        reason: String,
    },

    /// The extension failed to stop.
    #[error("stop extension {name} error: {reason}")]
    StopFailed {
        /// The plugin type with ID.
        name: String,
        /// The reason for failure.
        reason: String,
    },

    /// The owning pipeline context has been dropped.
    #[error("pipeline context of extension {name} is gone")]
    ContextGone {
        /// The plugin type with ID.
        name: String,
    },
}

impl ExtensionError {
    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(plugin_type: impl Into<String>) -> Self {
        Self::UnknownType {
            plugin_type: plugin_type.into(),
        }
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an init failed error.
    #[must_use]
    pub fn init_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InitFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a stop failed error.
    #[must_use]
    pub fn stop_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StopFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the extension name or type the error refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::UnknownType { plugin_type } => plugin_type,
            Self::InvalidConfig { name, .. }
            | Self::InitFailed { name, .. }
            | Self::StopFailed { name, .. }
            | Self::ContextGone { name } => name,
        }
    }
}

/// Errors raised by a [`CheckpointStore`](crate::checkpoint::CheckpointStore).
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The backing storage failed.
    #[error("checkpoint storage error: {0}")]
    Storage(String),

    /// The store is closed.
    #[error("checkpoint store closed")]
    Closed,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckpointError {
    /// Creates a storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}
