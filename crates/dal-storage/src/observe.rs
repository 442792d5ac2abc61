use std::time::Duration;

pub struct StorageLabels<'a> {
    pub collection: &'a str,
    pub kind: &'a str,
    pub code: Option<&'a str>,
}

pub trait StorageMetrics: Send + Sync {
    fn record_request(&self, _labels: StorageLabels<'_>, _rows: u64, _latency: Duration) {}
}

#[derive(Default)]
pub struct NoopStorageMetrics;

impl StorageMetrics for NoopStorageMetrics {}

pub static NOOP_STORAGE_METRICS: NoopStorageMetrics = NoopStorageMetrics;
