//! Seeding and downloading against the in-memory platform.

mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mkt_model::{REDACTED_MESSAGE, MARKETPLACE_ID_PLACEHOLDER, RecordExt, ResourceName};
use mkt_seed::{
    BulkExecutor, Downloader, ExecutorSettings, ProgressReporter, RetryPolicy, SeedError, Seeder,
};
use mkt_validate::Validator;
use serde_json::{Value, json};
use support::{InMemoryPlatform, directory, document, sample};

#[derive(Default)]
struct RecordingProgress {
    started: Mutex<Vec<(String, usize)>>,
}

impl ProgressReporter for RecordingProgress {
    fn begin(&self, label: &str, total: usize) {
        self.started.lock().unwrap().push((label.to_string(), total));
    }

    fn advance(&self, _processed: usize, _total: usize) {}

    fn finish(&self, _label: &str) {}
}

fn executor(platform: Arc<InMemoryPlatform>) -> BulkExecutor {
    BulkExecutor::new(platform, &ExecutorSettings::default()).with_retry(RetryPolicy::none())
}

fn position(writes: &[(&'static str, String)], method: &str, path: &str) -> usize {
    writes
        .iter()
        .position(|(m, p)| *m == method && p == path)
        .unwrap_or_else(|| panic!("no {method} {path} in {writes:#?}"))
}

#[tokio::test]
async fn seeding_creates_parents_before_children() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = executor(platform.clone());

    let summary = Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap();

    let writes = platform.writes();
    assert!(position(&writes, "POST", "/catalogs") < position(&writes, "POST", "/buyers"));
    assert!(
        position(&writes, "POST", "/buyers")
            < position(&writes, "POST", "/buyers/coffee-buyer/users")
    );
    assert!(
        position(&writes, "POST", "/products/house-blend/variants/generate")
            < position(&writes, "PUT", "/products/house-blend/variants/house-blend-small")
    );
    assert!(
        position(&writes, "POST", "/products/house-blend/variants/house-blend-small/inventoryrecords")
            > position(&writes, "PUT", "/products/house-blend/variants/house-blend-small")
    );

    assert_eq!(summary.marketplace_id, "target");
    assert_eq!(summary.created[&ResourceName::Categories], 3);
    assert_eq!(summary.created[&ResourceName::Variants], 2);
    assert_eq!(summary.secrets_generated, 3);
    assert_eq!(summary.api_clients_remapped, 1);
    assert!(!summary.created.contains_key(&ResourceName::Promotions));
}

#[tokio::test]
async fn progress_starts_once_per_resource_type_in_priority_order() {
    let platform = Arc::new(InMemoryPlatform::new());
    let progress = Arc::new(RecordingProgress::default());
    let directory = directory();
    let executor = executor(platform).with_progress(progress.clone());

    Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap();

    let started = progress.started.lock().unwrap().clone();
    let labels: Vec<&str> = started.iter().map(|(label, _)| label.as_str()).collect();
    let index = |label: &str| labels.iter().position(|l| *l == label).unwrap();
    assert!(index("Catalogs") < index("Categories"));
    assert!(index("Specs") < index("SpecOptions"));
    assert!(index("ApiClients") < index("Webhooks"));
    assert!(index("SpecProductAssignments") < index("Variants"));
    assert!(index("Variants") < index("VariantInventoryRecords"));
    assert!(started.contains(&("Categories".to_string(), 3)));
}

#[tokio::test]
async fn categories_are_created_one_depth_at_a_time() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = executor(platform.clone());

    Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap();

    let created: Vec<Value> = platform
        .calls()
        .into_iter()
        .filter(|call| call.method == "POST" && call.path == "/catalogs/main-catalog/categories")
        .filter_map(|call| call.body.and_then(|body| body.get("ID").cloned()))
        .collect();
    assert_eq!(created, vec![json!("coffee"), json!("espresso"), json!("single-origin")]);
}

#[tokio::test]
async fn spec_defaults_are_patched_after_options_exist() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = executor(platform.clone());

    Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap();

    let calls = platform.calls();
    let spec_create = calls
        .iter()
        .find(|call| call.method == "POST" && call.path == "/specs")
        .unwrap();
    assert_eq!(spec_create.body.as_ref().unwrap()["DefaultOptionID"], Value::Null);

    let writes = platform.writes();
    assert!(
        position(&writes, "POST", "/specs/size/options") < position(&writes, "PATCH", "/specs/size")
    );
    let spec = &platform.collection("/specs")[0];
    assert_eq!(spec.str_field("DefaultOptionID"), Some("small"));
}

#[tokio::test]
async fn api_clients_get_minted_ids_and_references_follow() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = executor(platform.clone());

    Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap();

    let client = &platform.collection("/apiclients")[0];
    assert_eq!(client.id(), Some("minted-1"));
    let secret = client.str_field("ClientSecret").unwrap();
    assert_ne!(secret, REDACTED_MESSAGE);

    let webhook = &platform.collection("/webhooks")[0];
    assert_eq!(webhook["ApiClientIDs"], json!(["minted-1"]));
    let assignment = &platform.collection("/apiclients/assignments")[0];
    assert_eq!(assignment.str_field("ApiClientID"), Some("minted-1"));
    let catalog = &platform.collection("/catalogs")[0];
    assert_eq!(catalog.str_field("OwnerID"), Some("target"));
}

#[tokio::test]
async fn invalid_documents_are_rejected_before_any_request() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = executor(platform.clone());
    let document = document(
        r"
Objects:
  Buyers:
    - ID: b1
      Name: Buyer
      DefaultCatalogID: nowhere
",
    );

    let error = Seeder::new(&directory, &executor)
        .seed(&document, "target")
        .await
        .unwrap_err();

    assert!(matches!(error, SeedError::ValidationFailed { issue_count } if issue_count >= 1));
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn platform_errors_abort_the_run() {
    let platform = Arc::new(InMemoryPlatform::new());
    platform.fail_next(1, 400);
    let directory = directory();
    let executor = executor(platform.clone());

    let error = Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap_err();

    match error {
        SeedError::Platform(error) => assert_eq!(error.status_code(), Some(400)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(platform.collection("/buyers").is_empty());
}

#[tokio::test]
async fn seeded_marketplace_downloads_into_a_valid_document() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = BulkExecutor::new(
        platform.clone(),
        &ExecutorSettings {
            page_size: 1,
            ..ExecutorSettings::default()
        },
    )
    .with_retry(RetryPolicy::new(vec![Duration::ZERO]));

    Seeder::new(&directory, &executor)
        .seed(&sample(), "target")
        .await
        .unwrap();
    let downloaded = Downloader::new(&directory, &executor)
        .download("target")
        .await
        .unwrap();

    let outcome = Validator::new(&directory).validate(&downloaded);
    assert!(outcome.is_valid(), "{:#?}", outcome.report.messages());

    let original = sample();
    for name in [
        ResourceName::Categories,
        ResourceName::SpecOptions,
        ResourceName::Users,
        ResourceName::Variants,
        ResourceName::VariantInventoryRecords,
        ResourceName::UserGroupAssignments,
    ] {
        assert_eq!(
            downloaded.records(name).len(),
            original.records(name).len(),
            "{name}"
        );
    }

    let catalog = &downloaded.records(ResourceName::Catalogs)[0];
    assert_eq!(catalog.str_field("OwnerID"), Some(MARKETPLACE_ID_PLACEHOLDER));
    let client = &downloaded.records(ResourceName::ApiClients)[0];
    assert_eq!(client.str_field("ClientSecret"), Some(REDACTED_MESSAGE));
    let spec = &downloaded.records(ResourceName::Specs)[0];
    assert!(spec.get("Options").is_none());
    let user = &downloaded.records(ResourceName::Users)[0];
    assert_eq!(user.str_field("BuyerID"), Some("coffee-buyer"));
    let variant = &downloaded.records(ResourceName::Variants)[0];
    assert_eq!(
        variant["Specs"][0],
        json!({ "SpecID": "size", "OptionID": "small", "Name": "Size", "Value": "Small" })
    );
}

#[tokio::test]
async fn download_of_an_empty_marketplace_lists_every_top_level_type() {
    let platform = Arc::new(InMemoryPlatform::new());
    let directory = directory();
    let executor = executor(platform.clone());

    let downloaded = Downloader::new(&directory, &executor)
        .download("target")
        .await
        .unwrap();

    assert_eq!(downloaded.record_count(), 0);
    let listed: Vec<String> = platform.calls().into_iter().map(|call| call.path).collect();
    assert!(listed.contains(&"/catalogs".to_string()));
    assert!(listed.contains(&"/securityprofiles/assignments".to_string()));
    assert!(!listed.iter().any(|path| path.contains('{')));
}
