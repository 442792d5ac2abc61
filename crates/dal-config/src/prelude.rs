pub use crate::errors::ConfigError;
pub use crate::loader::Loader;
pub use crate::model::{Checksum, KeyPath, NamespaceId, ReloadClass, SnapshotVersion};
pub use crate::schema::{dal_registry, FieldMeta, InMemorySchemaRegistry, SchemaRegistry};
pub use crate::settings::{LogSettings, StoreBackend, StoreSettings, SurrealSettings};
pub use crate::snapshot::ConfigSnapshot;
pub use crate::source::{cli::CliArgsSource, env::EnvSource, file::FileSource, Source};
pub use crate::validate::{BasicValidator, StoreValidator, Validator};
