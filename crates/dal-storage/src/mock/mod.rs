mod datastore;
mod repo;

pub use datastore::MockDatastore;
pub use repo::InMemoryRepository;
