use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{kind::ErrorKind, retry::RetryClass, severity::Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub &'static str);

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

impl CodeSpec {
    pub const fn new(
        code: ErrorCode,
        kind: ErrorKind,
        http_status: u16,
        retryable: RetryClass,
        severity: Severity,
        default_user_msg: &'static str,
    ) -> Self {
        Self {
            code,
            kind,
            http_status,
            retryable,
            severity,
            default_user_msg,
        }
    }
}

pub mod codes {
    use super::ErrorCode;

    pub const SCHEMA_VALIDATION_FAILED: ErrorCode = ErrorCode("SCHEMA.VALIDATION_FAILED");
    pub const PROVIDER_UNAVAILABLE: ErrorCode = ErrorCode("PROVIDER.UNAVAILABLE");
    pub const STORAGE_CONFLICT: ErrorCode = ErrorCode("STORAGE.CONFLICT");
    pub const STORAGE_NOT_FOUND: ErrorCode = ErrorCode("STORAGE.NOT_FOUND");
    pub const STORAGE_NOOP_UPDATE: ErrorCode = ErrorCode("STORAGE.NOOP_UPDATE");
    pub const STORAGE_INCONSISTENT_READ: ErrorCode = ErrorCode("STORAGE.INCONSISTENT_READ");
    pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode("UNKNOWN.INTERNAL");
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();

    let entries = [
        CodeSpec::new(
            SCHEMA_VALIDATION_FAILED,
            ErrorKind::Schema,
            422,
            RetryClass::Permanent,
            Severity::Warn,
            "The request does not match the expected shape.",
        ),
        CodeSpec::new(
            PROVIDER_UNAVAILABLE,
            ErrorKind::Provider,
            503,
            RetryClass::Transient,
            Severity::Error,
            "The document store is temporarily unavailable.",
        ),
        CodeSpec::new(
            STORAGE_CONFLICT,
            ErrorKind::Conflict,
            409,
            RetryClass::None,
            Severity::Warn,
            "The record already exists.",
        ),
        CodeSpec::new(
            STORAGE_NOT_FOUND,
            ErrorKind::Storage,
            404,
            RetryClass::None,
            Severity::Warn,
            "No matching record was found.",
        ),
        CodeSpec::new(
            STORAGE_NOOP_UPDATE,
            ErrorKind::Storage,
            409,
            RetryClass::None,
            Severity::Info,
            "The update did not change the record.",
        ),
        CodeSpec::new(
            STORAGE_INCONSISTENT_READ,
            ErrorKind::Consistency,
            409,
            RetryClass::Transient,
            Severity::Error,
            "The record changed while it was being read back.",
        ),
        CodeSpec::new(
            UNKNOWN_INTERNAL,
            ErrorKind::Unknown,
            500,
            RetryClass::Transient,
            Severity::Error,
            "An unknown error occurred.",
        ),
    ];

    for spec in entries {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code registered: {key}");
        }
    }

    map
});

pub fn spec_of(code: ErrorCode) -> Option<&'static CodeSpec> {
    REGISTRY.get(code.0)
}

pub fn iter_specs() -> impl Iterator<Item = &'static CodeSpec> {
    REGISTRY.values()
}
