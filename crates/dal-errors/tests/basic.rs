use dal_errors::prelude::*;
use serde_json::json;

#[test]
fn build_and_render_public() {
    let err = ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
        .user_msg("Soft delete of layout L1 in environment E1 was not performed properly")
        .dev_msg("modified=0")
        .meta_kv("collection", json!("layouts"))
        .meta_kv("environment", json!("E1"))
        .build();

    let public = err.to_public();
    assert_eq!(public.code, "STORAGE.NOT_FOUND");
    assert!(public.message.contains("L1"));

    let audit = err.to_audit();
    assert_eq!(audit.kind, "Storage");
    assert_eq!(audit.http_status, 404);
    assert_eq!(audit.message_dev, Some("modified=0"));

    let lbl = labels(&err);
    assert_eq!(lbl.get("code").unwrap(), "STORAGE.NOT_FOUND");
    assert_eq!(lbl.get("collection").unwrap(), "layouts");
    assert_eq!(lbl.get("environment").unwrap(), "E1");
    assert!(lbl.get("organization").is_none());
}

#[test]
fn registry_classifies_storage_codes() {
    let noop = spec_of(codes::STORAGE_NOOP_UPDATE).unwrap();
    assert_eq!(noop.kind, ErrorKind::Storage);
    assert_eq!(noop.retryable, RetryClass::None);

    let inconsistent = spec_of(codes::STORAGE_INCONSISTENT_READ).unwrap();
    assert_eq!(inconsistent.kind, ErrorKind::Consistency);
    assert!(inconsistent.retryable.is_retryable());

    let provider = spec_of(codes::PROVIDER_UNAVAILABLE).unwrap();
    assert_eq!(provider.http_status, 503);
    assert!(provider.severity > Severity::Warn);

    assert_eq!(iter_specs().count(), REGISTRY.len());
}

#[test]
fn unregistered_code_falls_back_to_unknown_classification() {
    let err = ErrorBuilder::new(ErrorCode("CUSTOM.THING")).build();
    assert_eq!(err.code.0, "CUSTOM.THING");
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert_eq!(err.http_status, 500);
}
