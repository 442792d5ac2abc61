use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dal_errors::prelude::codes;
use dal_types::prelude::Timestamp;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::ConfigError;
use crate::model::{
    Checksum, ConfigMap, ConfigValue, KeyPath, NamespaceId, Provenance, ReloadClass,
    SnapshotMetadata, SnapshotVersion,
};
use crate::schema::{dal_registry, SchemaRegistry};
use crate::snapshot::ConfigSnapshot;
use crate::source::{
    cli::CliArgsSource, env::EnvSource, file::FileSource, merge_maps, merge_value, Source,
};
use crate::validate::{StoreValidator, Validator};

#[derive(Clone)]
pub struct Loader {
    /// Order decides precedence: later sources override earlier ones.
    pub sources: Vec<Arc<dyn Source>>,
    pub validator: Arc<dyn Validator>,
    pub schema_registry: Arc<dyn SchemaRegistry>,
}

impl Loader {
    /// Files, then `DAL__*` environment variables, then CLI overrides, checked
    /// against the `store` / `log` schema.
    pub fn layered(paths: Vec<PathBuf>, args: Vec<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            sources: vec![
                Arc::new(FileSource { paths }),
                Arc::new(EnvSource::default()),
                Arc::new(CliArgsSource { args }),
            ],
            validator: Arc::new(StoreValidator),
            schema_registry: Arc::new(dal_registry()?),
        })
    }

    pub async fn load_once(&self) -> Result<ConfigSnapshot, ConfigError> {
        let mut merged = ConfigMap::new();
        let mut provenance = Provenance::default();

        for source in &self.sources {
            let snap = source.load().await?;
            merge_maps(&mut merged, &snap.map);
            provenance.0.extend(snap.provenance.0);
        }

        apply_defaults(&mut merged, self.schema_registry.as_ref());
        enforce_schema(&merged, self.schema_registry.as_ref())?;

        self.validator
            .validate(&NamespaceId("root".to_string()), &merged)
            .await?;

        let issued_at_ms = Timestamp::now().as_millis();
        let metadata = SnapshotMetadata {
            version: SnapshotVersion(format!("v{}", issued_at_ms)),
            checksum: compute_checksum(&merged),
            issued_at_epoch_ms: issued_at_ms,
            reload_summary: build_reload_summary(self.schema_registry.as_ref()),
            provenance,
        };

        Ok(ConfigSnapshot::new(merged, metadata))
    }
}

fn apply_defaults(map: &mut ConfigMap, registry: &dyn SchemaRegistry) {
    for ns in registry.namespaces() {
        if let Some(view) = registry.get_namespace(&ns) {
            for (relative_key, meta) in &view.fields {
                if let Some(default) = &meta.default_value {
                    let full = compose_full_path(&ns, relative_key);
                    if !path_exists(map, &full) {
                        merge_value(map, &full, default.clone());
                    }
                }
            }
        }
    }
}

fn enforce_schema(map: &ConfigMap, registry: &dyn SchemaRegistry) -> Result<(), ConfigError> {
    let mut flattened = Vec::new();
    collect_keys("", map, &mut flattened);
    for key in flattened {
        let (namespace, relative) = split_namespace(&key)?;
        let ns_id = NamespaceId(namespace.to_string());
        let view = registry.get_namespace(&ns_id).ok_or_else(|| {
            ConfigError::from(
                ConfigError::builder(codes::SCHEMA_VALIDATION_FAILED)
                    .user_msg("Configuration namespace not registered.")
                    .dev_msg(format!("unknown namespace: {}", namespace))
                    .build(),
            )
        })?;

        if relative.is_empty() {
            continue;
        }

        if !view.declares(relative) {
            return Err(ConfigError::from(
                ConfigError::builder(codes::SCHEMA_VALIDATION_FAILED)
                    .user_msg("Configuration contains unknown key.")
                    .dev_msg(format!("unknown key: {}", key))
                    .build(),
            ));
        }
    }
    Ok(())
}

fn compute_checksum(map: &ConfigMap) -> Checksum {
    use sha2::{Digest, Sha256};

    let value = serde_json::Value::Object(map.clone());
    let mut hasher = Sha256::new();
    if let Ok(serialised) = serde_json::to_vec(&value) {
        hasher.update(serialised);
    }
    let digest = hasher.finalize();
    Checksum(STANDARD.encode(digest))
}

fn compose_full_path(ns: &NamespaceId, key: &KeyPath) -> String {
    if key.0.is_empty() {
        ns.0.clone()
    } else {
        format!("{}.{}", ns.0, key.0)
    }
}

fn path_exists(map: &ConfigMap, path: &str) -> bool {
    let mut cursor = map;
    let mut segments = path.split('.').filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        match (segments.peek(), cursor.get(segment)) {
            (Some(_), Some(serde_json::Value::Object(child))) => {
                cursor = child;
            }
            (Some(_), Some(_)) => return false,
            (None, Some(_)) => return true,
            (_, None) => return false,
        }
    }
    false
}

fn collect_keys(prefix: &str, map: &ConfigMap, out: &mut Vec<String>) {
    for (key, value) in map {
        let next = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        out.push(next.clone());
        if let ConfigValue::Object(child) = value {
            collect_keys(&next, child, out);
        }
    }
}

fn split_namespace(path: &str) -> Result<(&str, &str), ConfigError> {
    let mut parts = path.splitn(2, '.');
    let ns = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("");
    if ns.is_empty() {
        return Err(ConfigError::from(
            ConfigError::builder(codes::SCHEMA_VALIDATION_FAILED)
                .user_msg("Configuration key missing namespace prefix.")
                .dev_msg(format!("invalid key: {}", path))
                .build(),
        ));
    }
    Ok((ns, rest))
}

fn build_reload_summary(registry: &dyn SchemaRegistry) -> HashMap<KeyPath, ReloadClass> {
    let mut summary = HashMap::new();
    for ns in registry.namespaces() {
        if let Some(view) = registry.get_namespace(&ns) {
            for (key, meta) in view.fields {
                let full = compose_full_path(&ns, &key);
                summary.insert(KeyPath(full), meta.reload);
            }
        }
    }
    summary
}
