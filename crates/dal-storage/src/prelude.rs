pub use crate::errors::{StorageError, StorageResult};
pub use crate::model::{
    DeleteResult, Document, Entity, Pagination, Sort, UpdateResult, CREATED_AT_FIELD,
    DELETED_AT_FIELD, DELETED_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
pub use crate::observe::{NoopStorageMetrics, StorageLabels, StorageMetrics};
pub use crate::spi::{
    ensure_scoped_document, metrics_labels, tenant_guard, Condition, Datastore, DeletedFilter,
    Filter, HealthInfo, NamedArgs, Pipeline, Repository, Stage,
};
