pub use crate::id::{is_object_id, new_object_id, LayoutId, UserId};
pub use crate::scope::{TenantScope, ENVIRONMENT_FIELD, ORGANIZATION_FIELD};
pub use crate::tenant::{EnvironmentId, OrganizationId};
pub use crate::time::Timestamp;
pub use crate::validate::{Validate, ValidateError};
