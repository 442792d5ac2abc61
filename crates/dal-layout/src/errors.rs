use dal_errors::prelude::{codes, CauseEntry, ErrorBuilder, ErrorCode, ErrorObj};
use dal_storage::StorageError;
use dal_types::prelude::{EnvironmentId, LayoutId};
use serde_json::Value;
use thiserror::Error;

use crate::entity::LAYOUTS_COLLECTION;

/// Failure of a layout operation. Store errors pass through with their code.
#[derive(Debug, Error)]
#[error("{public}")]
pub struct DalError {
    inner: ErrorObj,
    public: String,
}

pub type DalResult<T> = Result<T, DalError>;

impl DalError {
    pub fn new(inner: ErrorObj) -> Self {
        let view = inner.to_public();
        let public = format!("{}: {}", view.code, view.message);
        Self { inner, public }
    }

    pub fn code(&self) -> ErrorCode {
        self.inner.code
    }

    pub fn as_error_obj(&self) -> &ErrorObj {
        &self.inner
    }

    pub fn into_inner(self) -> ErrorObj {
        self.inner
    }

    /// Soft delete did not modify exactly one layout.
    pub fn delete_not_applied(id: &LayoutId, environment: &EnvironmentId, modified: u64) -> Self {
        Self::layout(
            codes::STORAGE_NOT_FOUND,
            format!("Soft delete of layout {id} in environment {environment} was not performed properly"),
            environment,
            format!("modified={modified}"),
        )
    }

    pub fn update_not_matched(id: &LayoutId, environment: &EnvironmentId) -> Self {
        Self::layout(
            codes::STORAGE_NOT_FOUND,
            format!("Update of layout {id} in environment {environment} was not performed properly"),
            environment,
            "matched=0".into(),
        )
    }

    pub fn update_no_changes(id: &LayoutId, environment: &EnvironmentId) -> Self {
        Self::layout(
            codes::STORAGE_NOOP_UPDATE,
            format!("Update of layout {id} in environment {environment} was not performed properly"),
            environment,
            "modified=0".into(),
        )
    }

    pub fn not_retrieved_after_update(id: &LayoutId, environment: &EnvironmentId) -> Self {
        Self::layout(
            codes::STORAGE_INCONSISTENT_READ,
            format!(
                "Update of layout {id} in environment {environment} was performed but entity could not been retrieved"
            ),
            environment,
            "re-read returned nothing".into(),
        )
    }

    pub fn invalid_query(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION_FAILED)
                .user_msg("Layout query is invalid.")
                .dev_msg(detail)
                .meta_kv("collection", Value::from(LAYOUTS_COLLECTION))
                .build(),
        )
    }

    pub fn misconfigured(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION_FAILED)
                .user_msg("Layout store is misconfigured.")
                .dev_msg(detail)
                .build(),
        )
    }

    pub fn serialization(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION_FAILED)
                .user_msg("Layout could not be encoded.")
                .dev_msg(detail)
                .meta_kv("collection", Value::from(LAYOUTS_COLLECTION))
                .build(),
        )
    }

    fn layout(code: ErrorCode, message: String, environment: &EnvironmentId, dev: String) -> Self {
        Self::new(
            ErrorBuilder::new(code)
                .user_msg(message)
                .dev_msg(dev)
                .meta_kv("collection", Value::from(LAYOUTS_COLLECTION))
                .meta_kv("environment", Value::from(environment.as_str()))
                .build(),
        )
    }
}

impl From<StorageError> for DalError {
    fn from(err: StorageError) -> Self {
        let inner = err.into_inner();
        let code = inner.code;
        let mut obj = inner;
        obj.meta
            .entry("collection")
            .or_insert_with(|| Value::from(LAYOUTS_COLLECTION));
        if obj.cause_chain.is_none() {
            obj.cause_chain = Some(vec![CauseEntry {
                code: code.0.to_string(),
                message: obj.message_dev.clone(),
            }]);
        }
        Self::new(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_layout_and_environment() {
        let id = LayoutId::from("L1");
        let env = EnvironmentId::from("E1");

        let err = DalError::delete_not_applied(&id, &env, 0);
        assert_eq!(err.code(), codes::STORAGE_NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "STORAGE.NOT_FOUND: Soft delete of layout L1 in environment E1 was not performed properly"
        );
        assert_eq!(err.as_error_obj().meta["environment"], Value::from("E1"));

        let noop = DalError::update_no_changes(&id, &env);
        assert_eq!(noop.code(), codes::STORAGE_NOOP_UPDATE);
        assert!(noop.to_string().ends_with("was not performed properly"));

        let lost = DalError::not_retrieved_after_update(&id, &env);
        assert_eq!(lost.code(), codes::STORAGE_INCONSISTENT_READ);
        assert!(lost.to_string().contains("entity could not been retrieved"));
    }

    #[test]
    fn storage_errors_keep_their_code() {
        let err = DalError::from(StorageError::conflict("duplicate _id"));
        assert_eq!(err.code(), codes::STORAGE_CONFLICT);
        let chain = err.as_error_obj().cause_chain.as_ref().unwrap();
        assert_eq!(chain[0].message.as_deref(), Some("duplicate _id"));
    }
}
