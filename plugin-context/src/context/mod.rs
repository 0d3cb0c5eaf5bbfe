//! The per-pipeline context facade handed to plugins.
//!
//! This module provides:
//! - Pipeline identity (project, logstore, config name)
//! - Extension resolution through the pipeline's runner
//! - Metric record registration and export
//! - Checkpoint persistence with config-name normalization on read

mod checkpoints;
mod meta;
mod pipeline;
mod records;

pub use meta::ContextMeta;
pub use pipeline::PipelineContext;
