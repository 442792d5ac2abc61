use dal_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public}")]
pub struct ConfigError {
    inner: ErrorObj,
    public: String,
}

impl ConfigError {
    pub fn builder(code: ErrorCode) -> ErrorBuilder {
        ErrorBuilder::new(code)
    }

    pub fn as_error_obj(&self) -> &ErrorObj {
        &self.inner
    }

    pub fn into_inner(self) -> ErrorObj {
        self.inner
    }
}

impl From<ErrorObj> for ConfigError {
    fn from(inner: ErrorObj) -> Self {
        let view = inner.to_public();
        let public = format!("{}: {}", view.code, view.message);
        Self { inner, public }
    }
}

pub fn schema_invalid(phase: &str, detail: &str) -> ConfigError {
    ConfigError::from(
        ErrorBuilder::new(codes::SCHEMA_VALIDATION_FAILED)
            .user_msg("Configuration is invalid.")
            .dev_msg(format!("{}: {}", phase, detail))
            .build(),
    )
}

pub fn io_provider_unavailable(phase: &str, detail: &str) -> ConfigError {
    ConfigError::from(
        ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
            .user_msg("Configuration source is unavailable.")
            .dev_msg(format!("{}: {}", phase, detail))
            .build(),
    )
}
