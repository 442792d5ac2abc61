use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    code::{self, CodeSpec, ErrorCode},
    kind::ErrorKind,
    retry::RetryClass,
    severity::Severity,
};

#[derive(Clone, Debug, Serialize)]
pub struct CauseEntry {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ErrorObj {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub message_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_dev: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause_chain: Option<Vec<CauseEntry>>,
}

impl ErrorObj {
    fn from_spec(spec: &CodeSpec) -> Self {
        Self {
            code: spec.code,
            kind: spec.kind,
            http_status: spec.http_status,
            retryable: spec.retryable,
            severity: spec.severity,
            message_user: spec.default_user_msg.to_string(),
            message_dev: None,
            meta: Map::new(),
            cause_chain: None,
        }
    }

    fn fallback(code: ErrorCode) -> Self {
        Self {
            code,
            kind: ErrorKind::Unknown,
            http_status: 500,
            retryable: RetryClass::None,
            severity: Severity::Error,
            message_user: "An unknown error occurred.".to_string(),
            message_dev: None,
            meta: Map::new(),
            cause_chain: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorBuilder {
    base: ErrorObj,
}

impl ErrorBuilder {
    /// Starts from the registered spec of `code`. Unregistered codes keep
    /// their code but take the `UNKNOWN.INTERNAL` classification.
    pub fn new(code: ErrorCode) -> Self {
        let base = match code::spec_of(code) {
            Some(spec) => ErrorObj::from_spec(spec),
            None => match code::spec_of(code::codes::UNKNOWN_INTERNAL) {
                Some(spec) => ErrorObj {
                    code,
                    ..ErrorObj::from_spec(spec)
                },
                None => ErrorObj::fallback(code),
            },
        };
        Self { base }
    }

    pub fn user_msg(mut self, msg: impl Into<String>) -> Self {
        self.base.message_user = msg.into();
        self
    }

    pub fn dev_msg(mut self, msg: impl Into<String>) -> Self {
        self.base.message_dev = Some(msg.into());
        self
    }

    pub fn meta_kv(mut self, key: impl Into<String>, value: Value) -> Self {
        self.base.meta.insert(key.into(), value);
        self
    }

    pub fn cause(mut self, entry: CauseEntry) -> Self {
        match &mut self.base.cause_chain {
            Some(chain) => chain.push(entry),
            None => self.base.cause_chain = Some(vec![entry]),
        }
        self
    }

    pub fn retryable(mut self, retryable: RetryClass) -> Self {
        self.base.retryable = retryable;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.base.severity = severity;
        self
    }

    pub fn build(self) -> ErrorObj {
        self.base
    }
}
