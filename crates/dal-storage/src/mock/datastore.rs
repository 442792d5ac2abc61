use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::errors::StorageResult;
use crate::observe::{NoopStorageMetrics, StorageMetrics};
use crate::spi::health::HealthInfo;
use crate::spi::Datastore;

#[derive(Clone)]
pub struct MockDatastore {
    pub(crate) state: Arc<MockState>,
    metrics: Arc<dyn StorageMetrics>,
}

impl Default for MockDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDatastore {
    pub fn new() -> Self {
        let metrics: Arc<dyn StorageMetrics> = Arc::new(NoopStorageMetrics);
        Self {
            state: Arc::new(MockState::default()),
            metrics,
        }
    }

    pub fn with_metrics(metrics: Arc<dyn StorageMetrics>) -> Self {
        Self {
            state: Arc::new(MockState::default()),
            metrics,
        }
    }

    pub(crate) fn state(&self) -> Arc<MockState> {
        Arc::clone(&self.state)
    }

    pub(crate) fn metrics_handle(&self) -> Arc<dyn StorageMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Raw copy of a collection in insertion order, soft-deleted documents
    /// included.
    pub fn dump(&self, collection: &str) -> Vec<Value> {
        self.state
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Datastore for MockDatastore {
    async fn health(&self) -> StorageResult<HealthInfo> {
        Ok(HealthInfo::healthy())
    }

    fn metrics(&self) -> &dyn StorageMetrics {
        self.metrics.as_ref()
    }
}

#[derive(Default)]
pub(crate) struct MockState {
    pub collections: RwLock<HashMap<String, Vec<Value>>>,
}
