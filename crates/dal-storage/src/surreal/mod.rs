#![cfg(feature = "surreal")]

pub mod binder;
pub mod config;
pub mod datastore;
pub mod errors;
pub mod mapper;
pub mod observe;
pub mod repo;

pub use config::{SurrealConfig, SurrealCredentials, SurrealProtocol};
pub use datastore::SurrealDatastore;
pub use repo::SurrealRepository;
