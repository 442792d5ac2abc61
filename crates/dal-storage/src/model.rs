use serde::{de::DeserializeOwned, Serialize};

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";
pub const DELETED_FIELD: &str = "deleted";
pub const DELETED_AT_FIELD: &str = "deletedAt";

/// Raw document as handed to and returned by a store.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Tenant fields. Reads and writes must be filtered by at least one of
    /// them, and inserted documents must carry all of them.
    const SCOPE_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub skip: u64,
}

impl Pagination {
    pub fn new(limit: u64, skip: u64) -> Self {
        Self { limit, skip }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub asc: bool,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            asc: true,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            asc: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub modified: u64,
}
