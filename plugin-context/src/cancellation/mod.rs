//! Cooperative shutdown signalling for pipelines and background exporters.

mod token;

pub use token::{CancelCallback, CancellationToken};
