use crate::tenant::{EnvironmentId, OrganizationId};

pub const ENVIRONMENT_FIELD: &str = "_environmentId";
pub const ORGANIZATION_FIELD: &str = "_organizationId";

/// Tenant part of a query. A query cannot be built without one, so every
/// read is filtered by an environment, an organization, or both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TenantScope {
    Environment(EnvironmentId),
    Organization(OrganizationId),
    Both {
        environment: EnvironmentId,
        organization: OrganizationId,
    },
}

impl TenantScope {
    pub fn environment(id: impl Into<EnvironmentId>) -> Self {
        Self::Environment(id.into())
    }

    pub fn organization(id: impl Into<OrganizationId>) -> Self {
        Self::Organization(id.into())
    }

    pub fn both(environment: impl Into<EnvironmentId>, organization: impl Into<OrganizationId>) -> Self {
        Self::Both {
            environment: environment.into(),
            organization: organization.into(),
        }
    }

    pub fn environment_id(&self) -> Option<&EnvironmentId> {
        match self {
            Self::Environment(env) | Self::Both { environment: env, .. } => Some(env),
            Self::Organization(_) => None,
        }
    }

    pub fn organization_id(&self) -> Option<&OrganizationId> {
        match self {
            Self::Organization(org) | Self::Both { organization: org, .. } => Some(org),
            Self::Environment(_) => None,
        }
    }

    /// Document field / value pairs this scope contributes to a filter.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::with_capacity(2);
        if let Some(env) = self.environment_id() {
            out.push((ENVIRONMENT_FIELD, env.as_str()));
        }
        if let Some(org) = self.organization_id() {
            out.push((ORGANIZATION_FIELD, org.as_str()));
        }
        out
    }
}

impl std::fmt::Display for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment(env) => write!(f, "environment {env}"),
            Self::Organization(org) => write!(f, "organization {org}"),
            Self::Both {
                environment,
                organization,
            } => write!(f, "environment {environment} / organization {organization}"),
        }
    }
}
