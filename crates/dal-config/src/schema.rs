use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{json, Value};

use crate::{
    errors::ConfigError,
    model::{KeyPath, NamespaceId, ReloadClass},
};

#[derive(Clone, Debug)]
pub struct FieldMeta {
    pub reload: ReloadClass,
    pub sensitive: bool,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl FieldMeta {
    fn boot(default_value: Option<Value>, description: &str) -> Self {
        Self {
            reload: ReloadClass::BootOnly,
            sensitive: false,
            default_value,
            description: Some(description.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NamespaceView {
    pub schema: Option<Value>,
    pub fields: HashMap<KeyPath, FieldMeta>,
}

impl NamespaceView {
    /// True when `relative` is a declared field or a parent of one.
    pub fn declares(&self, relative: &str) -> bool {
        self.fields.contains_key(&KeyPath(relative.to_string()))
            || self
                .fields
                .keys()
                .any(|key| key.0.strip_prefix(relative).is_some_and(|rest| rest.starts_with('.')))
    }
}

pub trait SchemaRegistry: Send + Sync {
    fn register_namespace(
        &self,
        namespace: NamespaceId,
        schema: Option<Value>,
        fields: HashMap<KeyPath, FieldMeta>,
    ) -> Result<(), ConfigError>;

    fn get_namespace(&self, ns: &NamespaceId) -> Option<NamespaceView>;

    fn namespaces(&self) -> Vec<NamespaceId>;

    fn field_meta(&self, ns: &NamespaceId, key: &KeyPath) -> Option<FieldMeta>;
}

#[derive(Default)]
pub struct InMemorySchemaRegistry {
    inner: RwLock<HashMap<NamespaceId, NamespaceView>>,
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn register_namespace(
        &self,
        namespace: NamespaceId,
        schema: Option<Value>,
        fields: HashMap<KeyPath, FieldMeta>,
    ) -> Result<(), ConfigError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| crate::errors::schema_invalid("schema", "registry poisoned"))?;
        guard.insert(namespace, NamespaceView { schema, fields });
        Ok(())
    }

    fn get_namespace(&self, ns: &NamespaceId) -> Option<NamespaceView> {
        let guard = self.inner.read().ok()?;
        guard.get(ns).cloned()
    }

    fn namespaces(&self) -> Vec<NamespaceId> {
        self.inner
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn field_meta(&self, ns: &NamespaceId, key: &KeyPath) -> Option<FieldMeta> {
        let guard = self.inner.read().ok()?;
        guard.get(ns).and_then(|view| view.fields.get(key)).cloned()
    }
}

/// Registry with the `store` and `log` namespaces and their defaults.
pub fn dal_registry() -> Result<InMemorySchemaRegistry, ConfigError> {
    let registry = InMemorySchemaRegistry::new();

    let store = HashMap::from([
        (
            KeyPath::from("backend"),
            FieldMeta::boot(Some(json!("memory")), "document store backend: memory | surreal"),
        ),
        (
            KeyPath::from("surreal.endpoint"),
            FieldMeta::boot(Some(json!("127.0.0.1:8000")), "surreal host:port"),
        ),
        (
            KeyPath::from("surreal.namespace"),
            FieldMeta::boot(Some(json!("dal")), "surreal namespace"),
        ),
        (
            KeyPath::from("surreal.database"),
            FieldMeta::boot(Some(json!("layouts")), "surreal database"),
        ),
        (
            KeyPath::from("surreal.protocol"),
            FieldMeta::boot(Some(json!("ws")), "ws | http"),
        ),
        (
            KeyPath::from("surreal.username"),
            FieldMeta::boot(None, "root user"),
        ),
        (
            KeyPath::from("surreal.password"),
            FieldMeta {
                sensitive: true,
                ..FieldMeta::boot(None, "root password")
            },
        ),
        (
            KeyPath::from("surreal.max_connections"),
            FieldMeta::boot(Some(json!(8)), "in-flight request bound"),
        ),
        (
            KeyPath::from("surreal.strict"),
            FieldMeta::boot(Some(json!(true)), "probe the database on connect"),
        ),
    ]);
    registry.register_namespace(NamespaceId("store".into()), None, store)?;

    let log = HashMap::from([(
        KeyPath::from("filter"),
        FieldMeta {
            reload: ReloadClass::HotReloadSafe,
            ..FieldMeta::boot(Some(json!("info")), "tracing env-filter directive")
        },
    )]);
    registry.register_namespace(NamespaceId("log".into()), None, log)?;

    Ok(registry)
}
