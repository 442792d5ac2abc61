#![cfg(feature = "surreal")]

use dal_storage::prelude::*;
use dal_storage::surreal::config::{SurrealConfig, SurrealCredentials, SurrealProtocol};
use dal_storage::surreal::datastore::SurrealDatastore;
use dal_storage::surreal::repo::SurrealRepository;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;

const TEST_ENVIRONMENT: &str = "dal-storage-test";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Note {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_environmentId")]
    environment: String,
    #[serde(rename = "_organizationId")]
    organization: String,
    title: String,
    #[serde(default)]
    deleted: bool,
}

impl Entity for Note {
    const COLLECTION: &'static str = "notes";
    const SCOPE_FIELDS: &'static [&'static str] = &["_environmentId", "_organizationId"];

    fn id(&self) -> &str {
        &self.id
    }
}

fn load_test_config() -> Option<SurrealConfig> {
    let endpoint = env::var("SURREAL_URL").ok()?;
    let namespace = env::var("SURREAL_NAMESPACE").unwrap_or_else(|_| "dal".into());
    let database = env::var("SURREAL_DATABASE").unwrap_or_else(|_| "test".into());
    let protocol = if endpoint.starts_with("http") {
        SurrealProtocol::Http
    } else {
        SurrealProtocol::Ws
    };

    let mut config = SurrealConfig {
        endpoint,
        namespace,
        database,
        protocol,
        credentials: None,
        max_connections: 4,
        strict: true,
    };

    if let (Ok(username), Ok(password)) =
        (env::var("SURREAL_USERNAME"), env::var("SURREAL_PASSWORD"))
    {
        config = config.with_credentials(SurrealCredentials::new(username, password));
    }

    Some(config)
}

fn note(title: &str) -> Document {
    match json!({
        "_environmentId": TEST_ENVIRONMENT,
        "_organizationId": "O1",
        "title": title,
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn surreal_end_to_end_smoke() -> StorageResult<()> {
    let Some(config) = load_test_config() else {
        eprintln!("skipping surreal_end_to_end_smoke: SURREAL_URL not set");
        return Ok(());
    };

    let datastore = SurrealDatastore::connect(config).await?;
    assert!(datastore.health().await?.ok);
    let _ = datastore
        .pool()
        .run_raw("REMOVE TABLE notes", &NamedArgs::default())
        .await;

    let repo = SurrealRepository::<Note>::new(datastore);
    let scope = Filter::new().eq("_environmentId", TEST_ENVIRONMENT);

    let first = repo.create(note("alpha")).await?;
    repo.create(note("beta")).await?;
    assert!(!first.deleted);

    let by_id = scope.clone().eq("_id", first.id.as_str());
    let mut patch = Document::new();
    patch.insert("title".into(), json!("alpha updated"));
    let updated = repo.update(&by_id, patch.clone()).await?;
    assert_eq!(updated, UpdateResult { matched: 1, modified: 1 });
    let again = repo.update(&by_id, patch).await?;
    assert_eq!(again.modified, 0);

    let pipeline = Pipeline::new()
        .matching(scope.clone())
        .sort(vec![Sort::ascending("_id")])
        .limit(10);
    let listed = repo.aggregate(&pipeline).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "alpha updated");

    assert_eq!(repo.soft_delete(&by_id).await?.modified, 1);
    assert_eq!(repo.soft_delete(&by_id).await?.modified, 0);
    assert_eq!(repo.count(&scope).await?, 1);
    assert!(repo
        .find_one(&by_id.deleted(DeletedFilter::Only))
        .await?
        .is_some());

    Ok(())
}
