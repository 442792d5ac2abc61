#![cfg(feature = "surreal")]

use crate::errors::StorageError;
use surrealdb::error::{Api as ApiError, Db as DbError};
use surrealdb::Error as SurrealError;

pub fn map_surreal_error(err: SurrealError) -> StorageError {
    match err {
        SurrealError::Db(db) => map_db_error(db),
        SurrealError::Api(api) => map_api_error(api),
    }
}

fn map_db_error(err: DbError) -> StorageError {
    let err_text = err.to_string();
    if is_duplicate(&err_text) {
        return StorageError::conflict(err_text);
    }
    match err {
        DbError::Ds(msg) | DbError::Tx(msg) => StorageError::provider_unavailable(msg),
        DbError::InvalidQuery(rendered) => StorageError::schema(rendered.to_string()),
        _ if err_text.contains("transaction") => StorageError::provider_unavailable(err_text),
        _ => StorageError::schema(err_text),
    }
}

fn map_api_error(err: ApiError) -> StorageError {
    let err_text = err.to_string();
    if is_duplicate(&err_text) {
        return StorageError::conflict(err_text);
    }
    match err {
        ApiError::Http(msg) | ApiError::Ws(msg) | ApiError::InternalError(msg) => {
            StorageError::provider_unavailable(msg)
        }
        ApiError::Query(msg) => StorageError::schema(msg),
        _ => StorageError::unknown(err_text),
    }
}

fn is_duplicate(text: &str) -> bool {
    text.contains("already exists")
}
