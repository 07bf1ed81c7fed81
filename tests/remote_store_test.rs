// tests/remote_store_test.rs

use lecture_hub::{
    catalog::{self, Catalog, CourseInput},
    client::RobustClient,
    config::{AppConfig, StoreTarget},
    error::AppError,
    models::{Course, Snapshot},
    store::{self, RemoteStore, SnapshotStore},
};
use mockito::Matcher;
use serde_json::json;
use url::Url;

const FIXTURE: &str = include_str!("fixtures/snapshot.json");

fn remote_store(server: &mockito::ServerGuard, auth: Option<&str>) -> RemoteStore {
    let client = RobustClient::new(&AppConfig::default()).expect("Failed to create client");
    let base_url = Url::parse(&format!("{}/", server.url())).unwrap();
    RemoteStore::new(client, base_url, auth.map(str::to_string))
}

#[tokio::test]
async fn test_load_document_tree_with_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/.json")
        .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(FIXTURE)
        .create_async()
        .await;

    let store = remote_store(&server, Some("secret"));
    let snapshot = store.load().await.expect("load should succeed");

    assert_eq!(snapshot.courses.len(), 2);
    let opened = catalog::open_resource(&snapshot, "r1").unwrap();
    assert_eq!(opened.resource.parent_id, "lec1");
    assert_eq!(opened.links.embed_url, "https://www.youtube.com/embed/abc123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_database_is_empty_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/.json")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let store = remote_store(&server, None);
    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot, Snapshot::default());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credentials_map_to_auth_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/.json")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":"Permission denied"}"#)
        .create_async()
        .await;

    let store = remote_store(&server, Some("wrong"));
    let result = store.load().await;
    assert!(matches!(result, Err(AppError::AuthRejected)), "got {:?}", result.err());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/.json")
        .with_status(200)
        .with_body(r#"{"courses": ["not", "a", "map"]}"#)
        .create_async()
        .await;

    let store = remote_store(&server, None);
    let result = store.load().await;
    assert!(matches!(result, Err(AppError::SnapshotParseFailed { .. })));
}

#[tokio::test]
async fn test_save_puts_whole_tree() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/.json")
        .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
        .match_body(Matcher::PartialJsonString(
            r#"{"courses": {"c9": {"name": "Networks", "code": "CS330"}}}"#.to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let mut snapshot = Snapshot::default();
    snapshot.courses.insert(
        "c9".into(),
        Course {
            name: "Networks".into(),
            code: "CS330".into(),
            description: None,
            has_practicals: false,
            extra: Default::default(),
        },
    );

    let store = remote_store(&server, Some("secret"));
    store.save(&snapshot).await.expect("save should succeed");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_open_store_selects_remote_target() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/.json")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let config = AppConfig {
        store: StoreTarget::Remote {
            base_url: Url::parse(&format!("{}/", server.url())).unwrap(),
            auth: None,
        },
        ..AppConfig::default()
    };
    let store = store::open_store(&config).unwrap();
    assert!(store.describe().contains(&server.url()));
    assert!(store.load().await.unwrap().courses.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_save_changes_patches_only_touched_paths() {
    let mut tree: serde_json::Value = serde_json::from_str(FIXTURE).unwrap();
    tree["settings"] = json!({ "logo": "x" });
    tree["resources"]["lec1"]["r1"]["description"] = "keep me".into();

    let mut server = mockito::Server::new_async().await;
    let get = server
        .mock("GET", "/.json")
        .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
        .with_status(200)
        .with_body(tree.to_string())
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/.json")
        .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
        .match_body(Matcher::Json(json!({
            "courses/c2/code": "MA111",
            "resources/lec1/r3": null
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let put = server.mock("PUT", Matcher::Any).expect(0).create_async().await;

    let store = remote_store(&server, Some("secret"));
    let base = store.load().await.unwrap();
    assert_eq!(base.extra["settings"]["logo"], "x");
    assert_eq!(base.resources["lec1"]["r1"].extra["description"], "keep me");

    let mut catalog = Catalog::new(base.clone());
    catalog
        .update_course(
            "c2",
            CourseInput {
                code: Some("MA111".into()),
                ..Default::default()
            },
        )
        .unwrap();
    catalog.remove_resource("r3").unwrap();
    store.save_changes(&base, catalog.snapshot()).await.unwrap();

    get.assert_async().await;
    patch.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_save_changes_without_changes_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let patch = server.mock("PATCH", Matcher::Any).expect(0).create_async().await;

    let store = remote_store(&server, None);
    let snapshot: Snapshot = serde_json::from_str(FIXTURE).unwrap();
    store.save_changes(&snapshot, &snapshot.clone()).await.unwrap();
    patch.assert_async().await;
}
