#![cfg(feature = "surreal")]

use std::sync::Arc;
use std::time::Duration;

use crate::observe::StorageMetrics;
use crate::spi::metrics_labels;

#[derive(Clone)]
pub struct SurrealMetricsProxy {
    metrics: Arc<dyn StorageMetrics>,
}

impl SurrealMetricsProxy {
    pub fn new(metrics: Arc<dyn StorageMetrics>) -> Self {
        Self { metrics }
    }

    pub fn as_arc(&self) -> Arc<dyn StorageMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn record_request(
        &self,
        collection: &str,
        kind: &str,
        code: Option<&str>,
        rows: u64,
        latency: Duration,
    ) {
        self.metrics
            .record_request(metrics_labels(collection, kind, code), rows, latency);
    }
}
