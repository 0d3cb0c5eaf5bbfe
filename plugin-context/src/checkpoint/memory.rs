//! In-memory checkpoint store.

use super::CheckpointStore;
use crate::errors::CheckpointError;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// A [`CheckpointStore`] backed by a concurrent map.
///
/// Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    entries: DashMap<(String, String), Vec<u8>>,
    closed: AtomicBool,
}

impl InMemoryCheckpointStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the keys stored under `config_name`, sorted.
    #[must_use]
    pub fn keys(&self, config_name: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == config_name)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Rejects all further operations.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn ensure_open(&self) -> Result<(), CheckpointError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(CheckpointError::Closed)
        } else {
            Ok(())
        }
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    fn save_checkpoint(
        &self,
        config_name: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), CheckpointError> {
        self.ensure_open()?;
        self.entries
            .insert((config_name.to_string(), key.to_string()), value.to_vec());
        Ok(())
    }

    fn get_checkpoint(
        &self,
        config_name: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, CheckpointError> {
        self.ensure_open()?;
        Ok(self
            .entries
            .get(&(config_name.to_string(), key.to_string()))
            .map(|value| value.clone()))
    }
}
