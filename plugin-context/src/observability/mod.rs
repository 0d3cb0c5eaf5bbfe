//! Logging setup and alarms.

mod alarm;
mod logging;

pub use alarm::{emit_alarm, AlarmType};
pub use logging::init_logging;
