//! Metric record registration and export for a pipeline context.

use super::PipelineContext;
use crate::metrics::{FlatMetrics, LabelPair, MetricsRecord};
use std::sync::Arc;

impl PipelineContext {
    /// Registers a new metric record with immutable `labels`.
    pub fn register_metric_record(&self, labels: Vec<LabelPair>) -> Arc<MetricsRecord> {
        let record = Arc::new(MetricsRecord::new(labels));
        self.metrics_records.write().push(record.clone());
        record
    }

    /// Returns the most recently registered record, registering an unlabelled
    /// one if there is none.
    ///
    /// Two threads calling this on an empty context at the same moment may
    /// each register a record; the check and the registration are not atomic.
    pub fn get_metric_record(&self) -> Arc<MetricsRecord> {
        if let Some(last) = self.metrics_records.read().last() {
            return last.clone();
        }
        self.register_metric_record(Vec::new())
    }

    /// Creates or replaces the pipeline-level record.
    ///
    /// This record is not part of [`export_metric_records`](Self::export_metric_records).
    pub fn register_logstore_config_metric_record(&self, labels: Vec<LabelPair>) -> Arc<MetricsRecord> {
        let record = Arc::new(MetricsRecord::new(labels));
        *self.logstore_config_metric_record.write() = Some(record.clone());
        record
    }

    /// Returns the pipeline-level record, if registered.
    #[must_use]
    pub fn logstore_config_metric_record(&self) -> Option<Arc<MetricsRecord>> {
        self.logstore_config_metric_record.read().clone()
    }

    /// Returns the number of registered records.
    #[must_use]
    pub fn metric_record_count(&self) -> usize {
        self.metrics_records.read().len()
    }

    /// Exports every registered record in registration order.
    #[must_use]
    pub fn export_metric_records(&self) -> Vec<FlatMetrics> {
        self.metrics_records
            .read()
            .iter()
            .map(|record| record.export())
            .collect()
    }
}
