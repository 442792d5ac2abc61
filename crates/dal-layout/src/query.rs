use dal_storage::prelude::{DeletedFilter, Filter, ID_FIELD};
use dal_types::prelude::{LayoutId, TenantScope, UserId, Validate};

use crate::entity::{ChannelType, LayoutContentType};
use crate::errors::DalError;

/// The fields a layout listing may filter on. The tenant scope is mandatory,
/// which keeps every query pinned to an environment or organization.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutQuery {
    pub scope: TenantScope,
    pub id: Option<LayoutId>,
    pub name: Option<String>,
    pub channel: Option<ChannelType>,
    pub content_type: Option<LayoutContentType>,
    pub is_default: Option<bool>,
    pub creator_id: Option<UserId>,
    pub deleted: DeletedFilter,
}

impl LayoutQuery {
    pub fn new(scope: TenantScope) -> Self {
        Self {
            scope,
            id: None,
            name: None,
            channel: None,
            content_type: None,
            is_default: None,
            creator_id: None,
            deleted: DeletedFilter::Exclude,
        }
    }

    pub fn with_id(mut self, id: impl Into<LayoutId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_channel(mut self, channel: ChannelType) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_content_type(mut self, content_type: LayoutContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn default_flag(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    pub fn created_by(mut self, creator: impl Into<UserId>) -> Self {
        self.creator_id = Some(creator.into());
        self
    }

    pub fn deleted(mut self, mode: DeletedFilter) -> Self {
        self.deleted = mode;
        self
    }

    pub fn to_filter(&self) -> Result<Filter, DalError> {
        self.scope
            .validate()
            .map_err(|err| DalError::invalid_query(err.to_string()))?;

        let mut filter = Filter::new().deleted(self.deleted);
        for (field, value) in self.scope.fields() {
            filter = filter.eq(field, value);
        }
        if let Some(id) = &self.id {
            filter = filter.eq(ID_FIELD, id.as_str());
        }
        if let Some(name) = &self.name {
            filter = filter.eq("name", name.as_str());
        }
        if let Some(channel) = self.channel {
            filter = filter.eq("channel", channel.as_str());
        }
        if let Some(content_type) = self.content_type {
            filter = filter.eq("contentType", content_type.as_str());
        }
        if let Some(is_default) = self.is_default {
            filter = filter.eq("isDefault", is_default);
        }
        if let Some(creator) = &self.creator_id {
            filter = filter.eq("_creatorId", creator.as_str());
        }
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scope_and_fields_become_equalities() {
        let query = LayoutQuery::new(TenantScope::both("E1", "O1"))
            .on_channel(ChannelType::Email)
            .default_flag(true);
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.equals("_environmentId"), Some(&json!("E1")));
        assert_eq!(filter.equals("_organizationId"), Some(&json!("O1")));
        assert_eq!(filter.equals("channel"), Some(&json!("email")));
        assert_eq!(filter.equals("isDefault"), Some(&json!(true)));
        assert_eq!(filter.deleted_mode(), DeletedFilter::Exclude);
    }

    #[test]
    fn organization_scope_alone_is_enough() {
        let filter = LayoutQuery::new(TenantScope::organization("O1"))
            .to_filter()
            .unwrap();
        assert_eq!(filter.equals("_environmentId"), None);
        assert_eq!(filter.conditions().len(), 1);
    }

    #[test]
    fn blank_scope_is_rejected() {
        let err = LayoutQuery::new(TenantScope::environment("  "))
            .to_filter()
            .unwrap_err();
        assert!(err.to_string().starts_with("SCHEMA.VALIDATION_FAILED"));
    }
}
