use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dal_types::prelude::{new_object_id, Timestamp};
use serde_json::Value;

use crate::errors::{StorageError, StorageResult};
use crate::model::{
    DeleteResult, Document, Entity, Sort, UpdateResult, CREATED_AT_FIELD, DELETED_AT_FIELD,
    DELETED_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use crate::observe::StorageMetrics;
use crate::spi::filter::{json_cmp, lookup, Filter};
use crate::spi::pipeline::{Pipeline, Stage};
use crate::spi::repo::Repository;
use crate::spi::{ensure_scoped_document, metrics_labels, tenant_guard};

use super::datastore::{MockDatastore, MockState};

pub struct InMemoryRepository<T: Entity> {
    state: Arc<MockState>,
    metrics: Arc<dyn StorageMetrics>,
    _marker: PhantomData<T>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(ds: &MockDatastore) -> Self {
        Self {
            state: ds.state(),
            metrics: ds.metrics_handle(),
            _marker: PhantomData,
        }
    }

    fn decode(value: Value) -> StorageResult<T> {
        serde_json::from_value(value)
            .map_err(|err| StorageError::schema(format!("deserialize entity failed: {err}")))
    }

    fn observe<R>(&self, kind: &str, started: Instant, rows: u64, result: &StorageResult<R>) {
        let code = result.as_ref().err().map(|err| err.code().0);
        self.metrics.record_request(
            metrics_labels(T::COLLECTION, kind, code),
            rows,
            started.elapsed(),
        );
    }

    fn insert(&self, mut doc: Document) -> StorageResult<T> {
        ensure_scoped_document(T::COLLECTION, T::SCOPE_FIELDS, &doc)?;

        let id = match doc.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::String(_)) | None => new_object_id(),
            Some(_) => return Err(StorageError::schema("document id must be a string")),
        };
        let now = Value::from(Timestamp::now().as_millis());
        doc.insert(ID_FIELD.into(), Value::String(id.clone()));
        doc.insert(CREATED_AT_FIELD.into(), now.clone());
        doc.insert(UPDATED_AT_FIELD.into(), now);
        doc.entry(DELETED_FIELD.to_string())
            .or_insert(Value::Bool(false));
        let value = Value::Object(doc);
        let entity = Self::decode(value.clone())?;

        let mut collections = self.state.collections.write();
        let docs = collections.entry(T::COLLECTION.to_string()).or_default();
        if docs
            .iter()
            .any(|existing| existing.get(ID_FIELD) == Some(&Value::String(id.clone())))
        {
            return Err(StorageError::conflict(format!(
                "document '{id}' already exists in '{}'",
                T::COLLECTION
            )));
        }
        docs.push(value);
        Ok(entity)
    }

    fn merge(&self, filter: &Filter, patch: Document) -> StorageResult<UpdateResult> {
        tenant_guard(T::COLLECTION, T::SCOPE_FIELDS, filter)?;
        let mut collections = self.state.collections.write();
        let Some(docs) = collections.get_mut(T::COLLECTION) else {
            return Ok(UpdateResult::default());
        };

        let mut result = UpdateResult::default();
        for doc in docs.iter_mut().filter(|doc| filter.matches(doc)) {
            result.matched += 1;
            let obj = doc
                .as_object_mut()
                .ok_or_else(|| StorageError::schema("stored document corrupted"))?;
            let before = obj.clone();
            for (key, value) in &patch {
                obj.insert(key.clone(), value.clone());
            }
            if *obj != before {
                obj.insert(
                    UPDATED_AT_FIELD.into(),
                    Value::from(Timestamp::now().as_millis()),
                );
                result.modified += 1;
            }
        }
        Ok(result)
    }

    fn matching(&self, filter: &Filter) -> StorageResult<Vec<Value>> {
        tenant_guard(T::COLLECTION, T::SCOPE_FIELDS, filter)?;
        let collections = self.state.collections.read();
        Ok(collections
            .get(T::COLLECTION)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    fn run_pipeline(&self, pipeline: &Pipeline) -> StorageResult<Vec<Value>> {
        let leading = pipeline
            .leading_match()
            .ok_or_else(|| StorageError::schema("pipeline must start with a match stage"))?;
        let mut items = self.matching(leading)?;
        for stage in pipeline.stages().iter().skip(1) {
            match stage {
                Stage::Match(filter) => items.retain(|doc| filter.matches(doc)),
                Stage::Sort(sorts) => items.sort_by(|a, b| compare(sorts, a, b)),
                Stage::Skip(n) => {
                    let n = usize::try_from(*n).unwrap_or(usize::MAX).min(items.len());
                    items.drain(..n);
                }
                Stage::Limit(n) => items.truncate(usize::try_from(*n).unwrap_or(usize::MAX)),
            }
        }
        Ok(items)
    }

    fn flag_deleted(&self, filter: &Filter) -> StorageResult<DeleteResult> {
        tenant_guard(T::COLLECTION, T::SCOPE_FIELDS, filter)?;
        let mut collections = self.state.collections.write();
        let Some(docs) = collections.get_mut(T::COLLECTION) else {
            return Ok(DeleteResult::default());
        };

        let now = Value::from(Timestamp::now().as_millis());
        let mut result = DeleteResult::default();
        for doc in docs.iter_mut().filter(|doc| filter.matches(doc)) {
            if matches!(doc.get(DELETED_FIELD), Some(Value::Bool(true))) {
                continue;
            }
            let obj = doc
                .as_object_mut()
                .ok_or_else(|| StorageError::schema("stored document corrupted"))?;
            obj.insert(DELETED_FIELD.into(), Value::Bool(true));
            obj.insert(DELETED_AT_FIELD.into(), now.clone());
            obj.insert(UPDATED_AT_FIELD.into(), now.clone());
            result.modified += 1;
        }
        Ok(result)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, doc: Document) -> StorageResult<T> {
        let started = Instant::now();
        let result = self.insert(doc);
        self.observe("create", started, u64::from(result.is_ok()), &result);
        result
    }

    async fn update(&self, filter: &Filter, patch: Document) -> StorageResult<UpdateResult> {
        let started = Instant::now();
        let result = self.merge(filter, patch);
        let rows = result.as_ref().map(|r| r.modified).unwrap_or_default();
        self.observe("update", started, rows, &result);
        result
    }

    async fn find_one(&self, filter: &Filter) -> StorageResult<Option<T>> {
        let started = Instant::now();
        let result = self
            .matching(filter)
            .and_then(|items| items.into_iter().next().map(Self::decode).transpose());
        let rows = result.as_ref().map(|r| u64::from(r.is_some())).unwrap_or_default();
        self.observe("read", started, rows, &result);
        result
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StorageResult<Vec<T>> {
        let started = Instant::now();
        let result = self
            .run_pipeline(pipeline)
            .and_then(|items| items.into_iter().map(Self::decode).collect::<StorageResult<Vec<_>>>());
        let rows = result.as_ref().map(|r| r.len() as u64).unwrap_or_default();
        self.observe("read", started, rows, &result);
        result
    }

    async fn count(&self, filter: &Filter) -> StorageResult<u64> {
        let started = Instant::now();
        let result = self.matching(filter).map(|items| items.len() as u64);
        self.observe("count", started, 0, &result);
        result
    }

    async fn soft_delete(&self, filter: &Filter) -> StorageResult<DeleteResult> {
        let started = Instant::now();
        let result = self.flag_deleted(filter);
        let rows = result.as_ref().map(|r| r.modified).unwrap_or_default();
        self.observe("delete", started, rows, &result);
        result
    }
}

fn compare(sorts: &[Sort], a: &Value, b: &Value) -> Ordering {
    for sort in sorts {
        let field_a = lookup(a, &sort.field).unwrap_or(&Value::Null);
        let field_b = lookup(b, &sort.field).unwrap_or(&Value::Null);
        let ord = json_cmp(field_a, field_b);
        let ord = if sort.asc { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
