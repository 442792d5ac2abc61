use dal_config::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

fn temp_config(name: &str, body: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dal-config-{}-{name}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("create temp config");
    file.write_all(body.to_string().as_bytes())
        .expect("write temp config");
    path
}

fn loader_with(paths: Vec<PathBuf>, args: Vec<&str>) -> Loader {
    let registry = Arc::new(dal_registry().expect("registry"));
    Loader {
        sources: vec![
            Arc::new(FileSource { paths }),
            Arc::new(CliArgsSource {
                args: args.into_iter().map(String::from).collect(),
            }),
        ],
        validator: Arc::new(StoreValidator),
        schema_registry: registry,
    }
}

#[tokio::test]
async fn defaults_fill_an_empty_configuration() {
    let loader = loader_with(vec![PathBuf::from("/nonexistent/dal.json")], vec![]);
    let snapshot = loader.load_once().await.expect("snapshot");

    let store = StoreSettings::from_snapshot(&snapshot).expect("store settings");
    assert_eq!(store.backend, StoreBackend::Memory);
    assert_eq!(store.surreal.endpoint, "127.0.0.1:8000");
    assert_eq!(store.surreal.protocol, "ws");
    assert_eq!(store.surreal.max_connections, 8);
    assert!(store.surreal.strict);
    assert_eq!(store.surreal.username, None);

    let log = LogSettings::from_snapshot(&snapshot).expect("log settings");
    assert_eq!(log.filter, "info");
    assert!(!snapshot.checksum().0.is_empty());
}

#[tokio::test]
async fn later_layers_override_and_strings_coerce() {
    let file = temp_config(
        "override",
        &json!({"store": {"backend": "surreal", "surreal": {"database": "from_file"}}}),
    );
    let loader = loader_with(
        vec![file.clone()],
        vec![
            "--store.surreal.database=from_cli",
            "--store.surreal.max_connections=3",
            "store.surreal.strict=false",
        ],
    );
    let snapshot = loader.load_once().await.expect("snapshot");
    let _ = std::fs::remove_file(file);

    let store = StoreSettings::from_snapshot(&snapshot).expect("store settings");
    assert_eq!(store.backend, StoreBackend::Surreal);
    assert_eq!(store.surreal.database, "from_cli");
    assert_eq!(store.surreal.max_connections, 3);
    assert!(!store.surreal.strict);
    assert_eq!(snapshot.metadata().provenance.0.len(), 2);
}

#[tokio::test]
async fn unknown_keys_and_bad_values_are_rejected() {
    let unknown = loader_with(vec![], vec!["--store.colour=blue"]);
    let err = unknown.load_once().await.unwrap_err();
    assert!(err.to_string().starts_with("SCHEMA.VALIDATION_FAILED"));

    let namespace = loader_with(vec![], vec!["--cache.size=1"]);
    assert!(namespace.load_once().await.is_err());

    let backend = loader_with(vec![], vec!["--store.backend=mongo"]);
    assert!(backend.load_once().await.is_err());

    let protocol = loader_with(vec![], vec!["--store.surreal.protocol=grpc"]);
    assert!(protocol.load_once().await.is_err());

    let pool = loader_with(vec![], vec!["--store.surreal.max_connections=0"]);
    assert!(pool.load_once().await.is_err());
}

#[tokio::test]
async fn checksum_tracks_effective_values() {
    let first = loader_with(vec![], vec![]).load_once().await.expect("snapshot");
    let again = loader_with(vec![], vec![]).load_once().await.expect("snapshot");
    assert_eq!(first.checksum(), again.checksum());
    assert!(first.iter_keys().contains(&"store.surreal.endpoint".to_string()));
    assert!(!first.iter_keys().contains(&"store.surreal".to_string()));

    let debug = loader_with(vec![], vec!["--log.filter=debug"])
        .load_once()
        .await
        .expect("snapshot");
    assert_ne!(debug.checksum(), first.checksum());
}

#[test]
fn registry_declares_nested_fields() {
    let registry = dal_registry().expect("registry");
    let store = registry
        .get_namespace(&NamespaceId("store".into()))
        .expect("store namespace");
    assert!(store.declares("surreal"));
    assert!(store.declares("surreal.endpoint"));
    assert!(!store.declares("surr"));

    let meta: HashMap<_, _> = store.fields;
    assert!(meta[&KeyPath::from("surreal.password")].sensitive);
}
