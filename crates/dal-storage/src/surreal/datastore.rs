#![cfg(feature = "surreal")]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::errors::{StorageError, StorageResult};
use crate::observe::{NoopStorageMetrics, StorageMetrics};
use crate::spi::health::HealthInfo;
use crate::spi::query::NamedArgs;
use crate::spi::Datastore;
use crate::surreal::binder::filtered_bindings;
use crate::surreal::config::{SurrealConfig, SurrealCredentials, SurrealProtocol};
use crate::surreal::errors::map_surreal_error;
use crate::surreal::observe::SurrealMetricsProxy;

use surrealdb::engine::remote::http::Client as HttpClient;
use surrealdb::engine::remote::http::Http;
use surrealdb::engine::remote::ws::Client as WsClient;
use surrealdb::engine::remote::ws::Ws;
use surrealdb::opt::auth::Root;
use surrealdb::{Response, Surreal};

#[derive(Clone)]
pub struct SurrealDatastore {
    pool: Arc<SurrealPool>,
    metrics: Arc<dyn StorageMetrics>,
    observer: SurrealMetricsProxy,
    config: SurrealConfig,
}

impl SurrealDatastore {
    pub async fn connect(config: SurrealConfig) -> StorageResult<Self> {
        let pool = SurrealPool::connect(&config).await?;
        if config.strict {
            let health = pool.health().await?;
            if !health.ok {
                warn!(endpoint = %config.endpoint, reason = %health.message, "surreal probe failed");
                return Err(StorageError::provider_unavailable(health.message));
            }
        }
        info!(
            endpoint = %config.endpoint,
            namespace = %config.namespace,
            database = %config.database,
            max_connections = config.max_connections,
            "connected to surreal"
        );
        let metrics: Arc<dyn StorageMetrics> = Arc::new(NoopStorageMetrics);
        let observer = SurrealMetricsProxy::new(metrics.clone());
        Ok(Self {
            pool: Arc::new(pool),
            metrics,
            observer,
            config,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn StorageMetrics>) -> Self {
        self.observer = SurrealMetricsProxy::new(metrics.clone());
        self.metrics = metrics;
        self
    }

    pub fn pool(&self) -> Arc<SurrealPool> {
        Arc::clone(&self.pool)
    }

    pub fn observer(&self) -> SurrealMetricsProxy {
        self.observer.clone()
    }

    pub fn config(&self) -> &SurrealConfig {
        &self.config
    }
}

#[async_trait]
impl Datastore for SurrealDatastore {
    async fn health(&self) -> StorageResult<HealthInfo> {
        self.pool.health().await
    }

    fn metrics(&self) -> &dyn StorageMetrics {
        self.metrics.as_ref()
    }
}

pub struct SurrealPool {
    client: SurrealClient,
    semaphore: Semaphore,
}

impl SurrealPool {
    async fn connect(config: &SurrealConfig) -> StorageResult<Self> {
        let client = match config.protocol {
            SurrealProtocol::Ws => SurrealClient::Ws(Arc::new(Self::connect_ws(config).await?)),
            SurrealProtocol::Http => {
                SurrealClient::Http(Arc::new(Self::connect_http(config).await?))
            }
        };
        Ok(Self {
            client,
            semaphore: Semaphore::new(config.max_connections.max(1)),
        })
    }

    async fn connect_ws(config: &SurrealConfig) -> StorageResult<Surreal<WsClient>> {
        let db = Surreal::new::<Ws>(config.address())
            .await
            .map_err(map_surreal_error)?;
        Self::authenticate(&db, config).await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(map_surreal_error)?;
        Ok(db)
    }

    async fn connect_http(config: &SurrealConfig) -> StorageResult<Surreal<HttpClient>> {
        let db = Surreal::new::<Http>(config.address())
            .await
            .map_err(map_surreal_error)?;
        Self::authenticate(&db, config).await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(map_surreal_error)?;
        Ok(db)
    }

    async fn authenticate<E>(db: &Surreal<E>, config: &SurrealConfig) -> StorageResult<()>
    where
        E: surrealdb::Connection,
    {
        if let Some(SurrealCredentials { username, password }) = &config.credentials {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await
            .map_err(map_surreal_error)?;
        }
        Ok(())
    }

    pub async fn health(&self) -> StorageResult<HealthInfo> {
        let params = NamedArgs::default();
        match self.run_raw("INFO FOR DB", &params).await {
            Ok(_) => Ok(HealthInfo::healthy()),
            Err(err) => Ok(HealthInfo::unhealthy(err.to_string())),
        }
    }

    pub async fn run_raw(&self, statement: &str, params: &NamedArgs) -> StorageResult<Response> {
        let bind = filtered_bindings(params);
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|err| StorageError::provider_unavailable(format!("surreal pool closed: {err}")))?;
        let result = match &self.client {
            SurrealClient::Ws(client) => client.query(statement).bind(bind).await,
            SurrealClient::Http(client) => client.query(statement).bind(bind).await,
        };
        result.map_err(map_surreal_error)
    }
}

enum SurrealClient {
    Ws(Arc<Surreal<WsClient>>),
    Http(Arc<Surreal<HttpClient>>),
}
