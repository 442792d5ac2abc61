use dal_types::prelude::*;

#[test]
fn ids_serialize_as_plain_strings() {
    let env = EnvironmentId("env_1".into());
    let value = serde_json::to_value(&env).unwrap();
    assert_eq!(value, serde_json::json!("env_1"));

    let back: LayoutId = serde_json::from_value(serde_json::json!("abc")).unwrap();
    assert_eq!(back.as_str(), "abc");

    let ts: Timestamp = serde_json::from_value(serde_json::json!(1_726_000_000_000i64)).unwrap();
    assert_eq!(ts.as_millis(), 1_726_000_000_000);
}

#[test]
fn scope_contributes_filter_fields() {
    let env_only = TenantScope::environment("E1");
    assert_eq!(env_only.fields(), vec![(ENVIRONMENT_FIELD, "E1")]);
    assert!(env_only.organization_id().is_none());

    let both = TenantScope::both("E1", "O1");
    assert_eq!(
        both.fields(),
        vec![(ENVIRONMENT_FIELD, "E1"), (ORGANIZATION_FIELD, "O1")]
    );
    assert_eq!(both.to_string(), "environment E1 / organization O1");
}

#[test]
fn generated_layout_ids_look_like_object_ids() {
    let id = LayoutId::generate();
    assert!(is_object_id(id.as_str()));
    assert!(!is_object_id("layout-1"));
}
