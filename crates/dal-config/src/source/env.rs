use async_trait::async_trait;

use crate::{
    errors,
    model::{ConfigMap, Provenance},
};

use super::{merge_value, provenance_entry, Source, SourceSnapshot};

/// Reads `{PREFIX}{SEP}A{SEP}B=value` as key `a.b`. Variables that merely
/// start with the prefix text are ignored.
#[derive(Clone, Debug)]
pub struct EnvSource {
    pub prefix: String,
    pub separator: String,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self {
            prefix: "DAL".into(),
            separator: "__".into(),
        }
    }
}

impl EnvSource {
    fn collect<I>(&self, vars: I) -> ConfigMap
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = ConfigMap::new();
        let lead = format!("{}{}", self.prefix.to_uppercase(), self.separator);
        for (key, value) in vars {
            let Some(trimmed) = key.strip_prefix(&lead) else {
                continue;
            };
            let path = trimmed
                .split(&self.separator)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_lowercase())
                .collect::<Vec<_>>()
                .join(".");
            merge_value(&mut map, &path, serde_json::Value::String(value));
        }
        map
    }
}

#[async_trait]
impl Source for EnvSource {
    fn id(&self) -> &'static str {
        "env"
    }

    async fn load(&self) -> Result<SourceSnapshot, errors::ConfigError> {
        let map = self.collect(std::env::vars());
        let mut provenance = Provenance::default();
        provenance.0.push(provenance_entry("env", "env"));
        Ok(SourceSnapshot { map, provenance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_separator_to_nesting() {
        let source = EnvSource::default();
        let map = source.collect(vec![
            ("DAL__STORE__SURREAL__MAX_CONNECTIONS".to_string(), "4".to_string()),
            ("DALLAS_HOME".to_string(), "x".to_string()),
            ("PATH".to_string(), "/bin".to_string()),
        ]);
        assert_eq!(
            serde_json::Value::Object(map),
            json!({"store": {"surreal": {"max_connections": "4"}}})
        );
    }
}
