//! Periodic export of metrics to a sink.

use super::{FlatMetrics, MetricExportType, MetricsDispatcher};
use crate::cancellation::CancellationToken;
use crate::config::ExporterConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, Level};

/// Metrics collected for one export type in one pass.
#[derive(Debug, Clone)]
pub struct ExportBatch {
    /// Which side of the boundary the entries come from.
    pub export_type: MetricExportType,
    /// When the pass collected them.
    pub collected_at: DateTime<Utc>,
    /// The entries.
    pub metrics: Vec<FlatMetrics>,
}

/// Receives exported metric batches, e.g. to forward them upstream.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Publishes one batch. Failures are the sink's to report.
    async fn publish(&self, batch: ExportBatch);
}

/// A sink that logs each batch using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingMetricsSink {
    level: Level,
}

impl Default for LoggingMetricsSink {
    fn default() -> Self {
        Self { level: Level::DEBUG }
    }
}

impl LoggingMetricsSink {
    /// Creates a logging sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

#[async_trait]
impl MetricsSink for LoggingMetricsSink {
    async fn publish(&self, batch: ExportBatch) {
        let export_type = batch.export_type.as_str();
        let count = batch.metrics.len();
        if self.level == Level::INFO {
            info!(export_type, count, "Metrics exported");
        } else {
            debug!(
                export_type,
                count,
                collected_at = %batch.collected_at.to_rfc3339(),
                metrics = ?batch.metrics,
                "Metrics exported"
            );
        }
    }
}

/// Drives the dispatcher on a fixed interval.
pub struct PeriodicExporter {
    dispatcher: Arc<MetricsDispatcher>,
    sink: Arc<dyn MetricsSink>,
    config: ExporterConfig,
}

impl PeriodicExporter {
    /// Creates an exporter.
    #[must_use]
    pub fn new(
        dispatcher: Arc<MetricsDispatcher>,
        sink: Arc<dyn MetricsSink>,
        config: ExporterConfig,
    ) -> Self {
        Self {
            dispatcher,
            sink,
            config,
        }
    }

    /// Runs a single export pass over every configured export type.
    pub async fn export_once(&self) {
        for export_type in &self.config.export_types {
            let metrics = self.dispatcher.collect(*export_type);
            self.sink
                .publish(ExportBatch {
                    export_type: *export_type,
                    collected_at: Utc::now(),
                    metrics,
                })
                .await;
        }
    }

    /// Spawns the export loop on the current tokio runtime.
    ///
    /// The first pass runs immediately. The loop exits when `token` is
    /// cancelled.
    pub fn spawn(self, token: Arc<CancellationToken>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval());
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            info!(
                interval_seconds = self.config.interval().as_secs(),
                "Metrics exporter started"
            );

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => self.export_once().await,
                }
            }

            info!(reason = ?token.reason(), "Metrics exporter stopped");
        })
    }
}

impl std::fmt::Debug for PeriodicExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicExporter")
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
