pub use crate::bootstrap::{open_store, LayoutStore};
pub use crate::entity::{
    ChannelType, LayoutContentType, LayoutEntity, NewLayout, TemplateVariable, VariableType,
};
pub use crate::errors::{DalError, DalResult};
pub use crate::query::LayoutQuery;
pub use crate::repository::LayoutRepository;
pub use dal_storage::prelude::{DeletedFilter, Pagination};
pub use dal_types::prelude::{
    EnvironmentId, LayoutId, OrganizationId, TenantScope, Timestamp, UserId,
};
