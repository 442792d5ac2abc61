#![cfg(feature = "surreal")]

use serde_json::Value;

use crate::spi::query::NamedArgs;

/// Strips `__`-prefixed metadata keys before the parameters are bound.
pub fn filtered_bindings(params: &NamedArgs) -> Value {
    let mut map = serde_json::Map::with_capacity(params.len());
    for (k, v) in params {
        if k.starts_with("__") {
            continue;
        }
        map.insert(k.clone(), v.clone());
    }
    Value::Object(map)
}

/// Removes the engine's record id so documents deserialize by `_id` only.
pub fn strip_record_id(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        obj.remove("id");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;
    use serde_json::json;

    #[test]
    fn metadata_keys_are_not_bound() {
        let params = named! {
            "table" => "layouts",
            "__kind" => "read",
        };
        assert_eq!(filtered_bindings(&params), json!({"table": "layouts"}));
    }

    #[test]
    fn record_id_is_stripped() {
        let raw = json!({"id": {"tb": "layouts", "id": {"String": "x"}}, "_id": "x"});
        assert_eq!(strip_record_id(raw), json!({"_id": "x"}));
    }
}
