//! Checkpoint persistence boundary.
//!
//! The context facade delegates durable state to a [`CheckpointStore`]. The
//! storage engine behind it is not part of this crate; an in-memory store is
//! provided for tests and embedding.

mod memory;

pub use memory::InMemoryCheckpointStore;

use crate::errors::CheckpointError;

/// Suffix appended to config names by a past naming-scheme migration.
pub const MIGRATED_CONFIG_SUFFIX: &str = "/1";

/// Key-value storage for checkpoints, namespaced by config name.
///
/// Implementations own their per-key consistency; callers do not synchronize.
pub trait CheckpointStore: Send + Sync {
    /// Persists `value` under (`config_name`, `key`).
    fn save_checkpoint(&self, config_name: &str, key: &str, value: &[u8])
        -> Result<(), CheckpointError>;

    /// Reads the value under (`config_name`, `key`).
    ///
    /// A missing entry is `Ok(None)`, not an error.
    fn get_checkpoint(&self, config_name: &str, key: &str)
        -> Result<Option<Vec<u8>>, CheckpointError>;
}

/// Strips the migration suffix so reads find checkpoints written before it.
///
/// Names of two characters or fewer are returned unchanged.
#[must_use]
pub fn normalize_config_name(config_name: &str) -> &str {
    if config_name.len() > MIGRATED_CONFIG_SUFFIX.len() {
        if let Some(stripped) = config_name.strip_suffix(MIGRATED_CONFIG_SUFFIX) {
            return stripped;
        }
    }
    config_name
}
