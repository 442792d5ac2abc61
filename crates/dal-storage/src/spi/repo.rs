use async_trait::async_trait;

use crate::errors::StorageResult;
use crate::model::{DeleteResult, Document, Entity, UpdateResult};
use crate::spi::filter::Filter;
use crate::spi::pipeline::Pipeline;

/// Collection-level primitives every backend provides. Filters and pipelines
/// are tenant-guarded by the implementation.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Inserts `doc`, assigning `_id` when absent and stamping `createdAt` /
    /// `updatedAt`.
    async fn create(&self, doc: Document) -> StorageResult<T>;

    /// Merges `patch` into every matching document. `modified` counts only
    /// documents whose content actually changed.
    async fn update(&self, filter: &Filter, patch: Document) -> StorageResult<UpdateResult>;

    async fn find_one(&self, filter: &Filter) -> StorageResult<Option<T>>;

    async fn aggregate(&self, pipeline: &Pipeline) -> StorageResult<Vec<T>>;

    async fn count(&self, filter: &Filter) -> StorageResult<u64>;

    /// Flags matching documents as deleted. Documents that are already
    /// deleted are never counted as modified.
    async fn soft_delete(&self, filter: &Filter) -> StorageResult<DeleteResult>;
}
