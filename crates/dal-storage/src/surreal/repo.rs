#![cfg(feature = "surreal")]

use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use dal_types::prelude::{new_object_id, Timestamp};
use serde_json::Value;

use crate::errors::{StorageError, StorageResult};
use crate::model::{
    DeleteResult, Document, Entity, UpdateResult, CREATED_AT_FIELD, DELETED_FIELD, ID_FIELD,
    UPDATED_AT_FIELD,
};
use crate::named;
use crate::spi::filter::Filter;
use crate::spi::pipeline::Pipeline;
use crate::spi::query::NamedArgs;
use crate::spi::repo::Repository;
use crate::spi::{ensure_scoped_document, tenant_guard};
use crate::surreal::binder::strip_record_id;
use crate::surreal::datastore::SurrealDatastore;
use crate::surreal::errors::map_surreal_error;
use crate::surreal::mapper::{build_filter_clause, compile_pipeline};
use crate::surreal::observe::SurrealMetricsProxy;

pub struct SurrealRepository<T: Entity> {
    datastore: SurrealDatastore,
    metrics: SurrealMetricsProxy,
    _marker: PhantomData<T>,
}

impl<T: Entity> SurrealRepository<T> {
    pub fn new(datastore: SurrealDatastore) -> Self {
        let metrics = datastore.observer();
        Self {
            datastore,
            metrics,
            _marker: PhantomData,
        }
    }

    fn base_params(kind: &str) -> NamedArgs {
        named! {
            "table" => T::COLLECTION,
            "__kind" => kind,
        }
    }

    fn decode(value: Value) -> StorageResult<T> {
        serde_json::from_value(strip_record_id(value))
            .map_err(|err| StorageError::schema(format!("deserialize entity failed: {err}")))
    }

    fn scoped_where(filter: &Filter, params: &mut NamedArgs) -> StorageResult<String> {
        tenant_guard(T::COLLECTION, T::SCOPE_FIELDS, filter)?;
        build_filter_clause(filter, params, "where")
    }

    async fn fetch(&self, statement: &str, params: &NamedArgs, index: usize) -> StorageResult<Vec<Value>> {
        let mut response = self.datastore.pool().run_raw(statement, params).await?;
        response.take::<Vec<Value>>(index).map_err(map_surreal_error)
    }

    /// Runs `statement` and returns the rows of its result set at `index`.
    async fn rows(&self, statement: &str, params: &NamedArgs, index: usize) -> StorageResult<Vec<Value>> {
        let kind = params
            .get("__kind")
            .and_then(Value::as_str)
            .unwrap_or("read")
            .to_string();
        let start = Instant::now();
        let result = self.fetch(statement, params, index).await;
        let rows = result.as_ref().map(|r| r.len() as u64).unwrap_or_default();
        let code = result.as_ref().err().map(|err| err.code().0);
        self.metrics
            .record_request(T::COLLECTION, &kind, code, rows, start.elapsed());
        result
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for SurrealRepository<T> {
    async fn create(&self, mut doc: Document) -> StorageResult<T> {
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
        // A document that cannot be read back must never be stored.
        Self::decode(Value::Object(doc.clone()))?;

        let mut params = Self::base_params("create");
        params.insert("id".into(), Value::String(id));
        params.insert("data".into(), Value::Object(doc));

        let created = self
            .rows(
                "CREATE type::thing($table, $id) CONTENT $data RETURN AFTER",
                &params,
                0,
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::unknown("failed to create record"))?;
        Self::decode(created)
    }

    async fn update(&self, filter: &Filter, patch: Document) -> StorageResult<UpdateResult> {
        let mut params = Self::base_params("update");
        let where_clause = Self::scoped_where(filter, &mut params)?;
        params.insert("patch".into(), Value::Object(patch));

        let select = format!("SELECT * FROM type::table($table) WHERE {where_clause}");
        let before: HashMap<String, Value> = self
            .rows(&select, &params, 0)
            .await?
            .into_iter()
            .filter_map(|doc| {
                let id = doc.get(ID_FIELD)?.as_str()?.to_string();
                Some((id, strip_record_id(doc)))
            })
            .collect();
        if before.is_empty() {
            return Ok(UpdateResult::default());
        }

        let merge =
            format!("UPDATE type::table($table) MERGE $patch WHERE {where_clause} RETURN AFTER");
        let after = self.rows(&merge, &params, 0).await?;

        let changed: Vec<Value> = after
            .into_iter()
            .map(strip_record_id)
            .filter_map(|doc| {
                let id = doc.get(ID_FIELD)?.as_str()?.to_string();
                (before.get(&id) != Some(&doc)).then_some(Value::String(id))
            })
            .collect();

        let result = UpdateResult {
            matched: before.len() as u64,
            modified: changed.len() as u64,
        };
        if !changed.is_empty() {
            let mut touch = params;
            touch.remove("patch");
            touch.insert("ids".into(), Value::Array(changed));
            touch.insert("now".into(), Value::from(Timestamp::now().as_millis()));
            self.rows(&touch_statement(&where_clause), &touch, 0).await?;
        }
        Ok(result)
    }

    async fn find_one(&self, filter: &Filter) -> StorageResult<Option<T>> {
        let mut params = Self::base_params("read");
        let where_clause = Self::scoped_where(filter, &mut params)?;
        let statement = format!("SELECT * FROM type::table($table) WHERE {where_clause} LIMIT 1");
        self.rows(&statement, &params, 0)
            .await?
            .into_iter()
            .next()
            .map(Self::decode)
            .transpose()
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StorageResult<Vec<T>> {
        let mut params = Self::base_params("read");
        if let Some(filter) = pipeline.leading_match() {
            tenant_guard(T::COLLECTION, T::SCOPE_FIELDS, filter)?;
        }
        let compiled = compile_pipeline(pipeline, &mut params)?;

        let mut statement = format!(
            "SELECT * FROM type::table($table) WHERE {}{}",
            compiled.where_clause, compiled.order_clause
        );
        if let Some(limit) = compiled.limit {
            params.insert("limit".into(), Value::from(limit));
            statement.push_str(" LIMIT $limit");
        }
        if let Some(start) = compiled.start {
            params.insert("start".into(), Value::from(start));
            statement.push_str(" START $start");
        }

        self.rows(&statement, &params, 0)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    async fn count(&self, filter: &Filter) -> StorageResult<u64> {
        let mut params = Self::base_params("count");
        let where_clause = Self::scoped_where(filter, &mut params)?;
        let statement = format!(
            "SELECT count() AS total FROM type::table($table) WHERE {where_clause} GROUP ALL"
        );
        let rows = self.rows(&statement, &params, 0).await?;
        Ok(rows
            .first()
            .and_then(|row| row.get("total"))
            .and_then(Value::as_u64)
            .unwrap_or_default())
    }

    async fn soft_delete(&self, filter: &Filter) -> StorageResult<DeleteResult> {
        let mut params = Self::base_params("delete");
        let where_clause = Self::scoped_where(filter, &mut params)?;
        params.insert("now".into(), Value::from(Timestamp::now().as_millis()));
        let statement = format!(
            "UPDATE type::table($table) SET deleted = true, deletedAt = $now, updatedAt = $now \
             WHERE {where_clause} AND deleted != true RETURN AFTER"
        );
        let rows = self.rows(&statement, &params, 0).await?;
        Ok(DeleteResult {
            modified: rows.len() as u64,
        })
    }
}

/// Bumps `updatedAt` on the rows a merge changed, still bounded by the
/// tenant-scoped clause of the merge itself.
fn touch_statement(where_clause: &str) -> String {
    format!(
        "UPDATE type::table($table) SET updatedAt = $now WHERE ({where_clause}) AND _id IN $ids RETURN NONE"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::filter::Filter;

    #[test]
    fn touch_keeps_the_tenant_clause() {
        let filter = Filter::new()
            .eq("_id", "L1")
            .eq("_environmentId", "E1")
            .eq("_organizationId", "O1");
        let mut params = NamedArgs::new();
        let where_clause = build_filter_clause(&filter, &mut params, "where").unwrap();

        let statement = touch_statement(&where_clause);
        assert!(statement.contains(&format!("WHERE ({where_clause}) AND _id IN $ids")));
        assert!(params.values().any(|v| v == "E1"));
        assert!(params.values().any(|v| v == "O1"));
    }
}
