//! Document loading from files and URLs, and writing documents back out.

use std::path::PathBuf;

use mkt_model::{InputError, ResourceName, SerializedMarketplace};
use mkt_seed::{DocumentSource, SeedError, load_document, write_document};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENT: &str = r"
Meta:
  ToolVersion: 0.1.0
Objects:
  Catalogs:
    - ID: main
      Name: Main
Assignments:
  CatalogAssignments:
    - CatalogID: main
      BuyerID: b1
";

#[test]
fn sources_are_urls_only_with_an_http_scheme() {
    assert!(matches!(
        DocumentSource::parse("https://example.com/doc.yaml"),
        DocumentSource::Url(_)
    ));
    assert!(matches!(
        DocumentSource::parse("HTTP://example.com/doc.yaml"),
        DocumentSource::Url(_)
    ));
    assert_eq!(
        DocumentSource::parse("./data/doc.yaml"),
        DocumentSource::Path(PathBuf::from("./data/doc.yaml"))
    );
    assert_eq!(
        DocumentSource::parse("ftp://example.com/doc.yaml"),
        DocumentSource::Path(PathBuf::from("ftp://example.com/doc.yaml"))
    );
}

#[tokio::test]
async fn loads_a_local_yaml_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("marketplace.yml");
    std::fs::write(&file, DOCUMENT).unwrap();

    let document = load_document(file.to_str().unwrap()).await.unwrap();

    assert_eq!(document.records(ResourceName::Catalogs).len(), 1);
    assert_eq!(document.records(ResourceName::CatalogAssignments).len(), 1);
}

#[tokio::test]
async fn missing_files_are_input_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("absent.yml");

    let error = load_document(file.to_str().unwrap()).await.unwrap_err();

    assert!(matches!(
        error,
        SeedError::Input(InputError::FileNotFound { path }) if path == file
    ));
}

#[tokio::test]
async fn malformed_documents_name_their_source() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.yml");
    std::fs::write(&file, "Objects: [unclosed").unwrap();

    let error = load_document(file.to_str().unwrap()).await.unwrap_err();

    match error {
        SeedError::Input(InputError::MalformedDocument { source_name, .. }) => {
            assert!(source_name.ends_with("broken.yml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn loads_a_document_from_a_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seeds/marketplace.yml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOCUMENT))
        .mount(&server)
        .await;

    let url = format!("{}/seeds/marketplace.yml", server.uri());
    let document = load_document(&url).await.unwrap();

    assert_eq!(document.records(ResourceName::Catalogs).len(), 1);
}

#[tokio::test]
async fn url_errors_carry_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing.yml", server.uri());
    let error = load_document(&url).await.unwrap_err();

    match error {
        SeedError::Platform(error) => assert_eq!(error.status_code(), Some(404)),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn written_documents_load_back_in_either_format() {
    let original: SerializedMarketplace = serde_yaml::from_str(DOCUMENT).unwrap();
    let dir = tempfile::tempdir().unwrap();

    for name in ["nested/out.json", "out.yaml"] {
        let file = dir.path().join(name);
        write_document(&file, &original).unwrap();
        let loaded = load_document(file.to_str().unwrap()).await.unwrap();
        assert_eq!(loaded, original, "{name}");
    }

    let json = std::fs::read_to_string(dir.path().join("nested/out.json")).unwrap();
    assert!(json.starts_with("{\n"));
    assert!(json.ends_with("}\n"));
}
