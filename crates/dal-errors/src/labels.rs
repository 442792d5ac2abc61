use std::collections::BTreeMap;

use crate::model::ErrorObj;

pub fn labels(err: &ErrorObj) -> BTreeMap<&'static str, String> {
    let mut out = BTreeMap::new();
    out.insert("code", err.code.0.to_string());
    out.insert("kind", err.kind.as_str().to_string());
    out.insert("retryable", err.retryable.as_str().to_string());
    out.insert("severity", err.severity.as_str().to_string());
    for key in ["collection", "environment", "organization"] {
        if let Some(v) = err.meta.get(key).and_then(|v| v.as_str()) {
            out.insert(key, v.to_string());
        }
    }
    out
}
