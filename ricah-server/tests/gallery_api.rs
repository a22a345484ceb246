use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};

use ricah_config::{
    Config, ConfigMetadata, CorsConfig, ProxyConfig, ServerConfig,
    StorageConfig, StorageMethod, UploadConfig,
};
use ricah_core::{FsObjectStore, MemoryOrderStore, OrderService};
use ricah_model::MediaObject;
use ricah_server::{AppState, create_app};

fn test_config(media_root: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: StorageConfig {
            method: StorageMethod::Filesystem,
            media_root: media_root.to_path_buf(),
            blob: None,
        },
        redis: None,
        cors: CorsConfig {
            allowed_origins: Vec::new(),
            allowed_methods: Vec::new(),
            allowed_headers: Vec::new(),
            allow_credentials: false,
        },
        upload: UploadConfig {
            max_bytes: 10 * 1024 * 1024,
        },
        proxy: ProxyConfig { cache_max_age: 60 },
        dev_mode: true,
        metadata: ConfigMetadata::default(),
    }
}

struct TestGallery {
    server: TestServer,
    _media_dir: tempfile::TempDir,
}

fn gallery() -> TestGallery {
    gallery_with_orders(MemoryOrderStore::new())
}

fn gallery_with_orders(orders: MemoryOrderStore) -> TestGallery {
    let media_dir = tempfile::tempdir().unwrap();
    let service = OrderService::new(
        Arc::new(FsObjectStore::new(media_dir.path())),
        Arc::new(orders),
    );
    let state =
        AppState::new(service, Arc::new(test_config(media_dir.path())));
    let server = TestServer::new(create_app(state)).unwrap();
    TestGallery {
        server,
        _media_dir: media_dir,
    }
}

fn upload_form(name: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "media",
        Part::bytes(bytes.to_vec())
            .file_name(name)
            .mime_type("image/jpeg"),
    )
}

async fn upload(gallery: &TestGallery, name: &str) -> MediaObject {
    let response = gallery
        .server
        .post("/api/v1/upload")
        .multipart(upload_form(name, b"fake-image-bytes"))
        .await;
    response.assert_status_ok();
    response.json::<MediaObject>()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let gallery = gallery();
    let response = gallery.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn empty_gallery_serves_empty_feed() {
    let gallery = gallery();
    let response = gallery.server.get("/api/v1/media").await;
    response.assert_status_ok();
    assert!(response.json::<Vec<MediaObject>>().is_empty());
}

#[tokio::test]
async fn upload_appears_in_feed_and_order() {
    let gallery = gallery();
    let stored = upload(&gallery, "sunset.jpg").await;
    assert_eq!(stored.id.as_str(), "sunset.jpg");

    let feed: Vec<MediaObject> =
        gallery.server.get("/api/v1/media").await.json();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, stored.id);

    let order: Value = gallery.server.get("/api/v1/order").await.json();
    assert_eq!(order["order"], json!(["sunset.jpg"]));
    assert_eq!(order["revision"], 1);
}

#[tokio::test]
async fn reorder_drives_the_feed() {
    let gallery = gallery();
    upload(&gallery, "first.jpg").await;
    upload(&gallery, "second.jpg").await;

    let response = gallery
        .server
        .post("/api/v1/order")
        .json(&json!({
            "order": ["second.jpg", "first.jpg"],
            "revision": 2,
        }))
        .await;
    response.assert_status_ok();

    let feed: Vec<MediaObject> =
        gallery.server.get("/api/v1/media").await.json();
    let ids: Vec<&str> =
        feed.iter().map(|object| object.id.as_str()).collect();
    assert_eq!(ids, vec!["second.jpg", "first.jpg"]);
}

#[tokio::test]
async fn stale_revision_is_a_conflict() {
    let gallery = gallery();
    upload(&gallery, "photo.jpg").await;

    let response = gallery
        .server
        .post("/api/v1/order")
        .json(&json!({ "order": [], "revision": 0 }))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // The losing write changed nothing.
    let order: Value = gallery.server.get("/api/v1/order").await.json();
    assert_eq!(order["order"], json!(["photo.jpg"]));
}

#[tokio::test]
async fn malformed_order_payload_is_rejected_without_apply() {
    let gallery = gallery();
    upload(&gallery, "photo.jpg").await;

    let response = gallery
        .server
        .post("/api/v1/order")
        .json(&json!({ "order": "not-an-array" }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    let order: Value = gallery.server.get("/api/v1/order").await.json();
    assert_eq!(order["order"], json!(["photo.jpg"]));
    assert_eq!(order["revision"], 1);
}

#[tokio::test]
async fn delete_removes_object_and_order_entry() {
    let gallery = gallery();
    let first = upload(&gallery, "first.jpg").await;
    upload(&gallery, "second.jpg").await;

    let response = gallery
        .server
        .delete("/api/v1/media")
        .add_query_param("url", &first.src)
        .await;
    response.assert_status_ok();

    let feed: Vec<MediaObject> =
        gallery.server.get("/api/v1/media").await.json();
    let ids: Vec<&str> =
        feed.iter().map(|object| object.id.as_str()).collect();
    assert_eq!(ids, vec!["second.jpg"]);

    let order: Value = gallery.server.get("/api/v1/order").await.json();
    assert_eq!(order["order"], json!(["second.jpg"]));
}

#[tokio::test]
async fn delete_of_unknown_locator_is_not_found() {
    let gallery = gallery();
    upload(&gallery, "keep.jpg").await;

    let response = gallery
        .server
        .delete("/api/v1/media")
        .add_query_param("url", "/media/ghost.jpg")
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let order: Value = gallery.server.get("/api/v1/order").await.json();
    assert_eq!(order["order"], json!(["keep.jpg"]));
}

#[tokio::test]
async fn stale_order_ids_are_skipped() {
    let gallery = gallery_with_orders(MemoryOrderStore::seeded(vec![
        "ghost.jpg".into(),
        "real.jpg".into(),
    ]));
    upload(&gallery, "real.jpg").await;

    let feed: Vec<MediaObject> =
        gallery.server.get("/api/v1/media").await.json();
    let ids: Vec<&str> =
        feed.iter().map(|object| object.id.as_str()).collect();
    assert_eq!(ids, vec!["real.jpg"]);
}

#[tokio::test]
async fn random_view_is_a_permutation_of_the_feed() {
    let gallery = gallery();
    upload(&gallery, "one.jpg").await;
    upload(&gallery, "two.jpg").await;
    upload(&gallery, "three.jpg").await;

    let response = gallery
        .server
        .get("/api/v1/media")
        .add_query_param("view", "random")
        .await;
    response.assert_status_ok();

    let shuffled: Vec<MediaObject> = response.json();
    let mut ids: Vec<&str> =
        shuffled.iter().map(|object| object.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["one.jpg", "three.jpg", "two.jpg"]);
}

#[tokio::test]
async fn filesystem_media_is_served_statically() {
    let gallery = gallery();
    let stored = upload(&gallery, "pixel.png").await;

    let response = gallery.server.get(&stored.src).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"fake-image-bytes");
}

#[tokio::test]
async fn upload_without_media_field_is_rejected() {
    let gallery = gallery();
    let form = MultipartForm::new().add_part(
        "attachment",
        Part::bytes(b"x".to_vec())
            .file_name("a.jpg")
            .mime_type("image/jpeg"),
    );
    let response = gallery.server.post("/api/v1/upload").multipart(form).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_upload_type_is_rejected() {
    let gallery = gallery();
    let form = MultipartForm::new().add_part(
        "media",
        Part::bytes(b"#!/bin/sh".to_vec())
            .file_name("script.sh")
            .mime_type("text/x-shellscript"),
    );
    let response = gallery.server.post("/api/v1/upload").multipart(form).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
