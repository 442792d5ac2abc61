pub mod errors;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod schema;
pub mod settings;
pub mod snapshot;
pub mod source;
pub mod validate;

pub use errors::ConfigError;
