use crate::scope::TenantScope;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("empty_field:{0}")]
    EmptyField(&'static str),
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

impl Validate for TenantScope {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.environment_id().map_or(false, |env| env.is_empty()) {
            return Err(ValidateError::EmptyField(crate::scope::ENVIRONMENT_FIELD));
        }
        if self.organization_id().map_or(false, |org| org.is_empty()) {
            return Err(ValidateError::EmptyField(crate::scope::ORGANIZATION_FIELD));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_environment_is_rejected() {
        let scope = TenantScope::both(" ", "org");
        assert_eq!(
            scope.validate(),
            Err(ValidateError::EmptyField("_environmentId"))
        );
        assert_eq!(TenantScope::organization("org").validate(), Ok(()));
    }
}
