use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::cli::{SetupCmd, VerifyCmd};
use crate::core::client::database::{DatabaseError, MockDatabaseClient};
use crate::setup::{setup, verify, IndexProvisioner, IndexStatus};
use crate::tests::common::InMemoryDatabaseClient;
use crate::types::index::{CatalogIndex, IndexSpec};
use crate::ProvisionerError;
use assert_matches::assert_matches;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use rstest::*;
use std::sync::Arc;
use std::time::Duration;

fn mongodb_args(url: &str) -> MongoDBCliArgs {
    MongoDBCliArgs {
        mongodb_connection_url: url.to_string(),
        mongodb_database_name: Some("bots".to_string()),
        mongodb_connect_timeout_secs: 1,
    }
}

#[fixture]
fn database() -> Arc<InMemoryDatabaseClient> {
    Arc::new(InMemoryDatabaseClient::default())
}

#[rstest]
#[tokio::test]
async fn provision_issues_one_create_indexes_per_collection(database: Arc<InMemoryDatabaseClient>) {
    let summary = IndexProvisioner::new(database.clone()).provision().await.unwrap();

    assert_eq!(summary.collections.len(), 3);
    assert_eq!(summary.index_count(), 6);

    let calls = database.create_calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            (
                "active_actions".to_string(),
                vec![
                    "server_number_1_action_type_1_selected_bots_1_delay_1".to_string(),
                    "server_number_1".to_string(),
                    "action_type_1".to_string(),
                ]
            ),
            ("completed_operations".to_string(), vec!["created_at_1".to_string(), "operation_id_1".to_string()]),
            ("cache_version".to_string(), vec!["key_1".to_string()]),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn provisioning_twice_leaves_the_same_catalog(database: Arc<InMemoryDatabaseClient>) {
    let provisioner = IndexProvisioner::new(database.clone());

    provisioner.provision().await.unwrap();
    let after_first_run = database.index_names();
    provisioner.provision().await.unwrap();

    assert_eq!(database.index_names(), after_first_run);
    assert_eq!(after_first_run["cache_version"], vec!["_id_1".to_string(), "key_1".to_string()]);
}

#[rstest]
#[tokio::test]
async fn verify_after_provision_reports_every_index_present(database: Arc<InMemoryDatabaseClient>) {
    let provisioner = IndexProvisioner::new(database);
    provisioner.provision().await.unwrap();

    let report = provisioner.verify().await.unwrap();
    assert_eq!(report.entries.len(), 6);
    assert!(report.is_satisfied());
}

#[rstest]
#[tokio::test]
async fn verify_on_empty_database_reports_everything_missing(database: Arc<InMemoryDatabaseClient>) {
    let report = IndexProvisioner::new(database.clone()).verify().await.unwrap();

    assert!(report.entries.iter().all(|entry| entry.status == IndexStatus::Missing));
    assert!(database.create_calls.lock().unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn verify_detects_ttl_with_other_expiry() {
    let mut options = IndexOptions::default();
    options.expire_after = Some(Duration::from_secs(3600));
    let stale_ttl = IndexModel::builder().keys(doc! { "created_at": 1 }).options(options).build();
    let database = Arc::new(InMemoryDatabaseClient::default().with_index("completed_operations", stale_ttl));

    let report = IndexProvisioner::new(database).verify().await.unwrap();

    let problems: Vec<_> = report.problems().collect();
    let ttl = problems.iter().find(|entry| entry.spec.name() == "created_at_1").unwrap();
    assert_eq!(ttl.status, IndexStatus::Mismatched { unique: false, expire_after: Some(Duration::from_secs(3600)) });
}

#[rstest]
#[tokio::test]
async fn provision_surfaces_conflicting_definition() {
    // a non-unique key_1 already exists
    let existing = IndexModel::builder().keys(doc! { "key": 1 }).build();
    let database = Arc::new(InMemoryDatabaseClient::default().with_index("cache_version", existing));

    let result = IndexProvisioner::new(database).provision().await;

    assert_matches!(result, Err(ProvisionerError::DatabaseCoreError(DatabaseError::IndexConflict(_))));
}

#[rstest]
#[tokio::test]
async fn provision_stops_at_first_failing_collection() {
    let mut client = MockDatabaseClient::new();
    client
        .expect_create_indexes()
        .times(1)
        .returning(|_, _| Err(DatabaseError::DuplicateKey("E11000 duplicate key error".to_string())));

    let result = IndexProvisioner::new(Arc::new(client)).provision().await;

    assert_matches!(result, Err(ProvisionerError::DatabaseCoreError(DatabaseError::DuplicateKey(_))));
}

/// Catalog of the three collections as `listIndexes` returns it after a legacy
/// shell created the indexes: every number, options included, is a double.
fn shell_catalog(collection: &str, ttl_secs: f64) -> Vec<Document> {
    let id_index = doc! { "v": 2.0, "key": { "_id": 1.0 }, "name": "_id_" };
    match collection {
        "active_actions" => vec![
            id_index,
            doc! {
                "v": 2.0,
                "key": { "server_number": 1.0, "action_type": 1.0, "selected_bots": 1.0, "delay": 1.0 },
                "name": "server_number_1_action_type_1_selected_bots_1_delay_1",
                "unique": true,
            },
            doc! { "v": 2.0, "key": { "server_number": 1.0 }, "name": "server_number_1" },
            doc! { "v": 2.0, "key": { "action_type": 1.0 }, "name": "action_type_1" },
        ],
        "completed_operations" => vec![
            id_index,
            doc! { "v": 2.0, "key": { "created_at": 1.0 }, "name": "created_at_1", "expireAfterSeconds": ttl_secs },
            doc! { "v": 2.0, "key": { "operation_id": 1.0 }, "name": "operation_id_1", "unique": true },
        ],
        "cache_version" => vec![id_index, doc! { "v": 2.0, "key": { "key": 1.0 }, "name": "key_1", "unique": true }],
        _ => vec![],
    }
}

fn client_with_shell_catalog(ttl_secs: f64) -> MockDatabaseClient {
    let mut client = MockDatabaseClient::new();
    client.expect_list_indexes().times(3).returning(move |collection: &str| {
        shell_catalog(collection, ttl_secs).iter().map(CatalogIndex::from_document).collect()
    });
    client
}

#[rstest]
#[tokio::test]
async fn verify_accepts_a_catalog_created_by_a_shell() {
    let client = client_with_shell_catalog(86_400.0);

    let report = IndexProvisioner::new(Arc::new(client)).verify().await.unwrap();

    assert!(report.is_satisfied(), "{}", report);
    let ttl = report.entries.iter().find(|entry| entry.spec.name() == "created_at_1").unwrap();
    assert_eq!(ttl.status, IndexStatus::Present);
}

#[rstest]
#[tokio::test]
async fn verify_reads_double_expiry_when_it_differs() {
    let client = client_with_shell_catalog(3600.0);

    let report = IndexProvisioner::new(Arc::new(client)).verify().await.unwrap();

    let problems: Vec<_> = report.problems().collect();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].spec.name(), "created_at_1");
    assert_eq!(
        problems[0].status,
        IndexStatus::Mismatched { unique: false, expire_after: Some(Duration::from_secs(3600)) }
    );
}

#[rstest]
#[tokio::test]
async fn provisioner_accepts_a_custom_manifest(database: Arc<InMemoryDatabaseClient>) {
    let manifest = vec![IndexSpec::ascending("audit", &["at"]).expire_after(Duration::from_secs(60))];
    let provisioner = IndexProvisioner::with_manifest(database.clone(), manifest);

    let summary = provisioner.provision().await.unwrap();

    assert_eq!(summary.index_count(), 1);
    assert_eq!(database.index_names()["audit"], vec!["_id_1".to_string(), "at_1".to_string()]);
}

#[rstest]
#[tokio::test]
async fn dry_run_does_not_connect() {
    // nothing listens on port 1, a connection attempt would fail
    let setup_cmd = SetupCmd { mongodb_args: mongodb_args("mongodb://127.0.0.1:1"), dry_run: true };

    assert!(setup(&setup_cmd).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn setup_rejects_invalid_connection_url() {
    let setup_cmd = SetupCmd { mongodb_args: mongodb_args("redis://127.0.0.1:6379"), dry_run: false };

    assert_matches!(setup(&setup_cmd).await, Err(ProvisionerError::DatabaseInvalidURIError(_)));
}

#[rstest]
#[tokio::test]
async fn unreachable_database_fails_without_retry() {
    let verify_cmd = VerifyCmd { mongodb_args: mongodb_args("mongodb://127.0.0.1:1") };

    let result = verify(&verify_cmd).await;

    assert_matches!(result, Err(ProvisionerError::DatabaseCoreError(DatabaseError::MongoError(_))));
}
