use std::sync::Arc;

use dal_storage::prelude::{
    DeletedFilter, Document, Filter, Pagination, Pipeline, Repository, Sort, CREATED_AT_FIELD,
    DELETED_AT_FIELD, DELETED_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use dal_types::prelude::{
    EnvironmentId, LayoutId, OrganizationId, ENVIRONMENT_FIELD, ORGANIZATION_FIELD,
};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::entity::{to_document, LayoutEntity, NewLayout};
use crate::errors::{DalError, DalResult};
use crate::query::LayoutQuery;

/// Fields `update_layout` never writes: identity, tenant, timestamps and the
/// soft-delete state.
const IMMUTABLE_FIELDS: [&str; 7] = [
    ID_FIELD,
    ENVIRONMENT_FIELD,
    ORGANIZATION_FIELD,
    CREATED_AT_FIELD,
    UPDATED_AT_FIELD,
    DELETED_FIELD,
    DELETED_AT_FIELD,
];

/// Tenant-scoped access to the `layouts` collection.
#[derive(Clone)]
pub struct LayoutRepository {
    store: Arc<dyn Repository<LayoutEntity>>,
}

impl LayoutRepository {
    pub fn new(store: Arc<dyn Repository<LayoutEntity>>) -> Self {
        Self { store }
    }

    #[instrument(
        skip(self, layout),
        fields(environment = %layout.environment_id, organization = %layout.organization_id)
    )]
    pub async fn create_layout(&self, layout: NewLayout) -> DalResult<LayoutEntity> {
        let created = self.store.create(layout.into_document()?).await?;
        debug!(layout = %created.id, "layout created");
        Ok(created)
    }

    #[instrument(skip(self), fields(layout = %id, environment = %environment_id))]
    pub async fn delete_layout(
        &self,
        id: &LayoutId,
        environment_id: &EnvironmentId,
        organization_id: &OrganizationId,
    ) -> DalResult<()> {
        let filter = identity(id, environment_id, organization_id);
        let result = self.store.soft_delete(&filter).await?;
        if result.modified != 1 {
            warn!(modified = result.modified, "soft delete not applied");
            return Err(DalError::delete_not_applied(id, environment_id, result.modified));
        }
        debug!("layout soft deleted");
        Ok(())
    }

    /// Matching layouts in creation order, paged by `skip` then `limit`.
    #[instrument(skip(self, query), fields(scope = %query.scope, limit = pagination.limit, skip = pagination.skip))]
    pub async fn filter_layouts(
        &self,
        query: &LayoutQuery,
        pagination: Pagination,
    ) -> DalResult<Vec<LayoutEntity>> {
        let pipeline = Pipeline::new()
            .matching(query.to_filter()?)
            .sort(vec![Sort::ascending(ID_FIELD)])
            .skip(pagination.skip)
            .limit(pagination.limit);
        let layouts = self.store.aggregate(&pipeline).await?;
        debug!(count = layouts.len(), "layouts filtered");
        Ok(layouts)
    }

    /// Flags the layout as default. Other defaults are left untouched and a
    /// missing layout is not an error.
    #[instrument(skip(self), fields(layout = %id, environment = %environment_id))]
    pub async fn set_layout_as_default(
        &self,
        id: &LayoutId,
        environment_id: &EnvironmentId,
        organization_id: &OrganizationId,
    ) -> DalResult<()> {
        let mut patch = Document::new();
        patch.insert("isDefault".into(), Value::Bool(true));
        let result = self
            .store
            .update(&identity(id, environment_id, organization_id), patch)
            .await?;
        debug!(matched = result.matched, modified = result.modified, "default flag set");
        Ok(())
    }

    #[instrument(skip(self, layout), fields(layout = %layout.id, environment = %layout.environment_id))]
    pub async fn update_layout(&self, layout: &LayoutEntity) -> DalResult<LayoutEntity> {
        let mut patch = to_document(layout)?;
        for field in IMMUTABLE_FIELDS {
            patch.remove(field);
        }

        let filter = identity(&layout.id, &layout.environment_id, &layout.organization_id);
        let result = self.store.update(&filter, patch).await?;
        if result.matched == 0 {
            warn!("update matched no layout");
            return Err(DalError::update_not_matched(&layout.id, &layout.environment_id));
        }
        if result.modified == 0 {
            warn!("update changed nothing");
            return Err(DalError::update_no_changes(&layout.id, &layout.environment_id));
        }

        match self.store.find_one(&filter).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!("layout vanished after update");
                Err(DalError::not_retrieved_after_update(
                    &layout.id,
                    &layout.environment_id,
                ))
            }
        }
    }

    #[instrument(skip(self), fields(layout = %id, environment = %environment_id))]
    pub async fn find_layout(
        &self,
        id: &LayoutId,
        environment_id: &EnvironmentId,
        organization_id: &OrganizationId,
        deleted: DeletedFilter,
    ) -> DalResult<Option<LayoutEntity>> {
        let filter = identity(id, environment_id, organization_id).deleted(deleted);
        Ok(self.store.find_one(&filter).await?)
    }

    #[instrument(skip(self, query), fields(scope = %query.scope))]
    pub async fn count_layouts(&self, query: &LayoutQuery) -> DalResult<u64> {
        Ok(self.store.count(&query.to_filter()?).await?)
    }
}

fn identity(id: &LayoutId, environment_id: &EnvironmentId, organization_id: &OrganizationId) -> Filter {
    Filter::new()
        .eq(ID_FIELD, id.as_str())
        .eq(ENVIRONMENT_FIELD, environment_id.as_str())
        .eq(ORGANIZATION_FIELD, organization_id.as_str())
}
