//! Small helpers shared across modules.

mod payload;

pub use payload::{cut_string, describe_payload, payload_digest};
