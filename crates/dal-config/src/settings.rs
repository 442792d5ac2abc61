use serde_json::Value;

use crate::errors::{schema_invalid, ConfigError};
use crate::model::KeyPath;
use crate::snapshot::ConfigSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Surreal,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "surreal" => Some(Self::Surreal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Surreal => "surreal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurrealSettings {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub protocol: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub max_connections: usize,
    pub strict: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub surreal: SurrealSettings,
}

impl StoreSettings {
    /// Typed view of the `store` namespace. Env and CLI layers deliver every
    /// value as a string, so numbers and booleans accept their string forms.
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Result<Self, ConfigError> {
        let backend_raw = string_at(snapshot, "store.backend")?;
        let backend = StoreBackend::parse(&backend_raw).ok_or_else(|| {
            schema_invalid("settings", &format!("unknown store backend '{backend_raw}'"))
        })?;

        let max_connections = required(snapshot, "store.surreal.max_connections")
            .and_then(|value| {
                coerce_u64(value).ok_or_else(|| {
                    schema_invalid("settings", "store.surreal.max_connections must be an integer")
                })
            })?;
        let strict = required(snapshot, "store.surreal.strict").and_then(|value| {
            coerce_bool(value)
                .ok_or_else(|| schema_invalid("settings", "store.surreal.strict must be a boolean"))
        })?;

        Ok(Self {
            backend,
            surreal: SurrealSettings {
                endpoint: string_at(snapshot, "store.surreal.endpoint")?,
                namespace: string_at(snapshot, "store.surreal.namespace")?,
                database: string_at(snapshot, "store.surreal.database")?,
                protocol: string_at(snapshot, "store.surreal.protocol")?,
                username: snapshot.get::<String>(&KeyPath::from("store.surreal.username")),
                password: snapshot.get::<String>(&KeyPath::from("store.surreal.password")),
                max_connections: usize::try_from(max_connections).unwrap_or(usize::MAX),
                strict,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
}

impl LogSettings {
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: string_at(snapshot, "log.filter")?,
        })
    }
}

fn required<'a>(snapshot: &'a ConfigSnapshot, path: &str) -> Result<&'a Value, ConfigError> {
    snapshot
        .get_raw(&KeyPath::from(path))
        .ok_or_else(|| schema_invalid("settings", &format!("missing key {path}")))
}

fn string_at(snapshot: &ConfigSnapshot, path: &str) -> Result<String, ConfigError> {
    match required(snapshot, path)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(schema_invalid(
            "settings",
            &format!("{path} must be a string, got {other}"),
        )),
    }
}

pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_accepts_string_forms() {
        assert_eq!(coerce_u64(&json!("16")), Some(16));
        assert_eq!(coerce_u64(&json!(4)), Some(4));
        assert_eq!(coerce_u64(&json!("-1")), None);
        assert_eq!(coerce_bool(&json!("FALSE")), Some(false));
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!("maybe")), None);
    }

    #[test]
    fn backend_names() {
        assert_eq!(StoreBackend::parse(" Surreal "), Some(StoreBackend::Surreal));
        assert_eq!(StoreBackend::parse("mongo"), None);
        assert_eq!(StoreBackend::Memory.as_str(), "memory");
    }
}
