use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{StorageError, StorageResult};
use crate::model::Document;
use crate::observe::{StorageLabels, StorageMetrics, NOOP_STORAGE_METRICS};

pub mod filter;
pub mod health;
pub mod pipeline;
pub mod query;
pub mod repo;

pub use filter::{Condition, DeletedFilter, Filter};
pub use health::HealthInfo;
pub use pipeline::{Pipeline, Stage};
pub use query::NamedArgs;
pub use repo::Repository;

#[async_trait]
pub trait Datastore: Send + Sync {
    async fn health(&self) -> StorageResult<HealthInfo> {
        Ok(HealthInfo::healthy())
    }
    fn metrics(&self) -> &dyn StorageMetrics {
        &NOOP_STORAGE_METRICS
    }
}

/// Rejects a filter that is not pinned to a tenant by equality on at least
/// one of `scope_fields`.
pub fn tenant_guard(collection: &str, scope_fields: &[&str], filter: &Filter) -> StorageResult<()> {
    let scoped = scope_fields.iter().any(|field| match filter.equals(field) {
        Some(Value::String(v)) => !v.trim().is_empty(),
        _ => false,
    });
    if scoped {
        Ok(())
    } else {
        Err(StorageError::schema(format!(
            "tenant guard failed for collection '{collection}': filter must include one of {scope_fields:?}"
        )))
    }
}

/// Inserted documents must carry every scope field.
pub fn ensure_scoped_document(
    collection: &str,
    scope_fields: &[&str],
    doc: &Document,
) -> StorageResult<()> {
    for field in scope_fields {
        match doc.get(*field) {
            Some(Value::String(v)) if !v.trim().is_empty() => {}
            _ => {
                return Err(StorageError::schema(format!(
                    "document for collection '{collection}' is missing tenant field '{field}'"
                )))
            }
        }
    }
    Ok(())
}

pub fn metrics_labels<'a>(
    collection: &'a str,
    kind: &'a str,
    code: Option<&'a str>,
) -> StorageLabels<'a> {
    StorageLabels {
        collection,
        kind,
        code,
    }
}
