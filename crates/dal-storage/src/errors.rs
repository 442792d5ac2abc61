use dal_errors::prelude::{codes, ErrorBuilder, ErrorCode, ErrorObj};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public}")]
pub struct StorageError {
    inner: ErrorObj,
    public: String,
}

impl StorageError {
    pub fn new(inner: ErrorObj) -> Self {
        let view = inner.to_public();
        let public = format!("{}: {}", view.code, view.message);
        Self { inner, public }
    }

    pub fn code(&self) -> ErrorCode {
        self.inner.code
    }

    pub fn as_error_obj(&self) -> &ErrorObj {
        &self.inner
    }

    pub fn into_inner(self) -> ErrorObj {
        self.inner
    }

    pub fn to_public(&self) -> dal_errors::render::PublicErrorView {
        self.inner.to_public()
    }

    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("document store unavailable")
                .dev_msg(msg.into())
                .build(),
        )
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::STORAGE_CONFLICT)
                .user_msg("document already exists")
                .dev_msg(msg.into())
                .build(),
        )
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION_FAILED)
                .user_msg("document store request rejected")
                .dev_msg(msg.into())
                .build(),
        )
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("internal storage error")
                .dev_msg(msg.into())
                .build(),
        )
    }
}

impl From<ErrorObj> for StorageError {
    fn from(value: ErrorObj) -> Self {
        Self::new(value)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
