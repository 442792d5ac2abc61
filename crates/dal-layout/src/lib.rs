pub mod bootstrap;
pub mod entity;
pub mod errors;
pub mod prelude;
pub mod query;
pub mod repository;

pub use errors::{DalError, DalResult};
pub use repository::LayoutRepository;
