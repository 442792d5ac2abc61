use async_trait::async_trait;

use crate::{
    errors::{schema_invalid, ConfigError},
    model::{ConfigMap, NamespaceId},
    settings::{coerce_u64, StoreBackend},
};

#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(
        &self,
        _namespace: &NamespaceId,
        _data: &ConfigMap,
    ) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct BasicValidator;

#[async_trait]
impl Validator for BasicValidator {}

/// Rejects unknown backends, protocols and an empty connection pool.
#[derive(Debug, Default)]
pub struct StoreValidator;

#[async_trait]
impl Validator for StoreValidator {
    async fn validate(&self, _namespace: &NamespaceId, data: &ConfigMap) -> Result<(), ConfigError> {
        let Some(store) = data.get("store").and_then(|v| v.as_object()) else {
            return Ok(());
        };
        if let Some(backend) = store.get("backend") {
            let name = backend.as_str().unwrap_or_default();
            if StoreBackend::parse(name).is_none() {
                return Err(schema_invalid(
                    "validate",
                    &format!("store.backend must be memory or surreal, got {backend}"),
                ));
            }
        }
        let Some(surreal) = store.get("surreal").and_then(|v| v.as_object()) else {
            return Ok(());
        };
        if let Some(protocol) = surreal.get("protocol") {
            if !matches!(protocol.as_str(), Some("ws") | Some("http")) {
                return Err(schema_invalid(
                    "validate",
                    &format!("store.surreal.protocol must be ws or http, got {protocol}"),
                ));
            }
        }
        if let Some(max) = surreal.get("max_connections") {
            if !matches!(coerce_u64(max), Some(n) if n > 0) {
                return Err(schema_invalid(
                    "validate",
                    &format!("store.surreal.max_connections must be a positive integer, got {max}"),
                ));
            }
        }
        Ok(())
    }
}
