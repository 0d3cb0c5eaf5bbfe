//! Checkpoint access for a pipeline context.
//!
//! Writes always go to the current config name. Reads strip one trailing
//! migration suffix first, so a config renamed `name/1` keeps reading the
//! state its predecessor `name` wrote.

use super::PipelineContext;
use crate::checkpoint::normalize_config_name;
use crate::errors::ContextError;
use crate::observability::{emit_alarm, AlarmType};
use crate::utils::{describe_payload, payload_digest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Bytes of a payload shown in debug logs.
const DEBUG_PAYLOAD_BYTES: usize = 256;

impl PipelineContext {
    /// Persists `value` under `key` for the current config name.
    pub fn save_checkpoint(&self, key: &str, value: &[u8]) -> Result<(), ContextError> {
        let config_name = self.config_name();
        debug!(
            config = %config_name,
            key,
            value = %describe_payload(value, DEBUG_PAYLOAD_BYTES),
            "Save checkpoint"
        );
        self.checkpoint_store
            .save_checkpoint(&config_name, key, value)
            .map_err(Into::into)
    }

    /// Reads the checkpoint stored under `key`.
    ///
    /// Store failures and empty values both read as absent.
    pub fn get_checkpoint(&self, key: &str) -> Option<Vec<u8>> {
        let config_name = self.config_name();
        let lookup_name = normalize_config_name(&config_name);

        match self.checkpoint_store.get_checkpoint(lookup_name, key) {
            Ok(Some(value)) if !value.is_empty() => {
                debug!(
                    config = %lookup_name,
                    key,
                    value = %describe_payload(&value, DEBUG_PAYLOAD_BYTES),
                    "Get checkpoint"
                );
                Some(value)
            }
            Ok(_) => {
                debug!(config = %lookup_name, key, "Checkpoint not found");
                None
            }
            Err(e) => {
                debug!(config = %lookup_name, key, error = %e, "Checkpoint read failed");
                None
            }
        }
    }

    /// Serializes `value` as JSON and persists it under `key`.
    pub fn save_checkpoint_object<T>(&self, key: &str, value: &T) -> Result<(), ContextError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        self.save_checkpoint(key, &bytes)
    }

    /// Reads and decodes the JSON checkpoint under `key`.
    ///
    /// An undecodable payload raises a checkpoint alarm and reads as absent.
    pub fn load_checkpoint_object<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get_checkpoint(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                let message = self.invalid_checkpoint_message(key, &bytes, &e);
                emit_alarm(AlarmType::CheckpointInvalid, &self.meta(), &message);
                None
            }
        }
    }

    /// Alarm text for an undecodable checkpoint, with the payload bounded by
    /// `checkpoint_alarm_max_bytes`.
    pub(super) fn invalid_checkpoint_message(
        &self,
        key: &str,
        bytes: &[u8],
        error: &dyn std::fmt::Display,
    ) -> String {
        format!(
            "invalid checkpoint, key: {key}, val: {}, sha256: {}, error: {error}",
            describe_payload(bytes, self.config.checkpoint_alarm_max_bytes),
            payload_digest(bytes),
        )
    }

    /// Decodes the JSON checkpoint under `key` into `out`.
    ///
    /// Returns true if `out` was overwritten. On any miss `out` is left as is.
    pub fn get_checkpoint_object<T>(&self, key: &str, out: &mut T) -> bool
    where
        T: DeserializeOwned,
    {
        match self.load_checkpoint_object(key) {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }
}
