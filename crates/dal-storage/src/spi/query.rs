use std::collections::BTreeMap;

/// Bound parameters for a backend statement. Keys starting with `__` carry
/// request metadata and are never sent to the store.
pub type NamedArgs = BTreeMap<String, serde_json::Value>;

#[macro_export]
macro_rules! named {
    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = ::std::collections::BTreeMap::new();
        $( map.insert($key.to_string(), ::serde_json::json!($value)); )*
        map
    }};
}
