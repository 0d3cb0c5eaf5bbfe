//! Alarms: error-level events operators are expected to act on.

use crate::context::ContextMeta;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Log target every alarm is emitted under.
pub const ALARM_TARGET: &str = "alarm";

/// Kinds of alarm raised by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmType {
    /// A stored checkpoint could not be decoded.
    CheckpointInvalid,
    /// An extension could not be created or initialized.
    ExtensionLoad,
}

static CHECKPOINT_INVALID_COUNT: AtomicU64 = AtomicU64::new(0);
static EXTENSION_LOAD_COUNT: AtomicU64 = AtomicU64::new(0);

impl AlarmType {
    /// Returns the wire name of the alarm.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckpointInvalid => "CHECKPOINT_INVALID_ALARM",
            Self::ExtensionLoad => "EXTENSION_LOAD_ALARM",
        }
    }

    /// Returns how many alarms of this kind the process has raised.
    #[must_use]
    pub fn count(self) -> u64 {
        self.counter().load(Ordering::Relaxed)
    }

    fn counter(self) -> &'static AtomicU64 {
        match self {
            Self::CheckpointInvalid => &CHECKPOINT_INVALID_COUNT,
            Self::ExtensionLoad => &EXTENSION_LOAD_COUNT,
        }
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raises an alarm attributed to the pipeline identified by `meta`.
pub fn emit_alarm(alarm: AlarmType, meta: &ContextMeta, message: &str) {
    alarm.counter().fetch_add(1, Ordering::Relaxed);
    tracing::error!(
        target: ALARM_TARGET,
        alarm = alarm.as_str(),
        project = %meta.project,
        logstore = %meta.logstore,
        config = %meta.config_name,
        "{message}"
    );
}
