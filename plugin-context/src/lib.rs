//! # Plugin Context
//!
//! The per-pipeline context facade handed to collector plugins.
//!
//! Each running pipeline owns one [`PipelineContext`](context::PipelineContext).
//! Plugins use it to:
//!
//! - **Resolve extensions**: find declared extensions or lazily create shared ones
//! - **Self-monitor**: register metric records that the agent exports periodically
//! - **Checkpoint**: persist small pieces of state across restarts
//!
//! The [`metrics`] module defines the export boundary: metrics produced natively
//! by in-process plugins are merged with process-level stats handed over to the
//! host agent through a narrow string-map interface.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plugin_context::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryCheckpointStore::new());
//! let ctx = PipelineContext::new(store);
//! ctx.init_context("project", "logstore", "my-config");
//!
//! let record = ctx.register_metric_record(vec![LabelPair::new("plugin_type", "input_file")]);
//! record.create_counter("proc_in_records_total").add(10);
//!
//! ctx.save_checkpoint_object("offset", &42_u64)?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod checkpoint;
pub mod config;
pub mod context;
pub mod errors;
pub mod extensions;
pub mod metrics;
pub mod observability;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::checkpoint::{CheckpointStore, InMemoryCheckpointStore};
    pub use crate::config::{
        ContextConfig, ExporterConfig, LoggingConfig, PipelineScopeConfig, TopicType,
    };
    pub use crate::context::{ContextMeta, PipelineContext};
    pub use crate::errors::{CheckpointError, ContextError, ExtensionError};
    pub use crate::extensions::{
        Extension, ExtensionCatalog, ExtensionConfig, ExtensionRunner, PluginMeta, PluginRunner,
    };
    pub use crate::metrics::{
        AgentStatSampler, ConfigRegistry, FlatMetrics, LabelPair, LoggingMetricsSink,
        MetaCacheMetrics, MetricExportType, MetricsDispatcher, MetricsRecord, MetricsSink,
        PeriodicExporter,
    };
    pub use crate::observability::{emit_alarm, init_logging, AlarmType};
}
