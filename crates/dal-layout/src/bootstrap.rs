use std::sync::Arc;

use dal_config::prelude::{StoreBackend, StoreSettings};
use dal_storage::mock::{InMemoryRepository, MockDatastore};
use dal_storage::prelude::{Datastore, Repository};
use tracing::{info, warn};

use crate::entity::LayoutEntity;
use crate::errors::{DalError, DalResult};
use crate::repository::LayoutRepository;

/// A layout repository together with the datastore that backs it.
#[derive(Clone)]
pub struct LayoutStore {
    pub layouts: LayoutRepository,
    pub datastore: Arc<dyn Datastore>,
}

impl LayoutStore {
    pub fn in_memory() -> Self {
        let ds = MockDatastore::new();
        let repo: Arc<dyn Repository<LayoutEntity>> = Arc::new(InMemoryRepository::new(&ds));
        Self {
            layouts: LayoutRepository::new(repo),
            datastore: Arc::new(ds),
        }
    }
}

/// Opens the backend named by `store.backend`.
pub async fn open_store(settings: &StoreSettings) -> DalResult<LayoutStore> {
    let store = match settings.backend {
        StoreBackend::Memory => LayoutStore::in_memory(),
        StoreBackend::Surreal => open_surreal(settings).await?,
    };
    let health = store.datastore.health().await?;
    if health.ok {
        info!(backend = settings.backend.as_str(), "layout store ready");
    } else {
        warn!(backend = settings.backend.as_str(), reason = %health.message, "layout store unhealthy");
    }
    Ok(store)
}

#[cfg(feature = "surreal")]
async fn open_surreal(settings: &StoreSettings) -> DalResult<LayoutStore> {
    use dal_storage::surreal::{
        SurrealConfig, SurrealCredentials, SurrealDatastore, SurrealProtocol, SurrealRepository,
    };

    let surreal = &settings.surreal;
    let protocol = match surreal.protocol.as_str() {
        "http" => SurrealProtocol::Http,
        _ => SurrealProtocol::Ws,
    };
    let mut config = SurrealConfig {
        endpoint: surreal.endpoint.clone(),
        namespace: surreal.namespace.clone(),
        database: surreal.database.clone(),
        ..SurrealConfig::default()
    }
    .with_protocol(protocol)
    .with_pool(surreal.max_connections)
    .strict_mode(surreal.strict);
    match (&surreal.username, &surreal.password) {
        (Some(user), Some(pass)) => {
            config = config.with_credentials(SurrealCredentials::new(user.as_str(), pass.as_str()));
        }
        (None, None) => {}
        _ => {
            return Err(DalError::misconfigured(
                "store.surreal.username and store.surreal.password must be set together",
            ))
        }
    }

    let ds = SurrealDatastore::connect(config).await?;
    let repo: Arc<dyn Repository<LayoutEntity>> = Arc::new(SurrealRepository::new(ds.clone()));
    Ok(LayoutStore {
        layouts: LayoutRepository::new(repo),
        datastore: Arc::new(ds),
    })
}

#[cfg(not(feature = "surreal"))]
async fn open_surreal(_settings: &StoreSettings) -> DalResult<LayoutStore> {
    Err(DalError::misconfigured(
        "store.backend=surreal requires the `surreal` feature",
    ))
}
