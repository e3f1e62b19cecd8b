//! HTTP endpoint integration tests.
//!
//! Covers the public surface:
//! - `/api/upload` - validation and link generation
//! - `/api/image/{id}`, `/view/{id}`, `/uploads/{file}` - reads while live
//! - expiry and purge - every read path turns into 404

#[path = "common.rs"]
mod common;

use std::time::Duration;

use axum::http::header;
use common::{PNG_BYTES, TestApp, json, text};
use tempshot::store::{EvictionCause, ImageId};

// =============================================================================
// Banner / Health / Fallback
// =============================================================================

#[tokio::test]
async fn test_index_banner() {
    let app = TestApp::builder().build();

    let resp = app.get("/").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(text(resp).await, "tempshot is running");
}

#[tokio::test]
async fn test_health_reports_active_images() {
    let app = TestApp::builder().build();

    let body = json(app.get("/api/health").await).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_images"], 0);

    app.upload_png().await;
    app.upload_png().await;

    let body = json(app.get("/api/health").await).await;
    assert_eq!(body["active_images"], 2);
    assert_eq!(body["pending_evictions"], 2);
    assert!(body.get("timestamp").is_some(), "Missing 'timestamp' field");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = TestApp::builder().build();

    let resp = app.get("/does/not/exist").await;
    assert_eq!(resp.status(), 404);
    let body = json(resp).await;
    assert_eq!(body["code"], "not_found");
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_returns_links() {
    let app = TestApp::builder().ttl(Duration::from_secs(600)).build();

    let body = app.upload_png().await;
    let id = body["image_id"].as_str().expect("image_id");

    assert_eq!(body["success"], true);
    assert_eq!(body["expires_in_secs"], 600);
    assert_eq!(body["view_url"], format!("/view/{id}"));
    assert_eq!(body["image_url"], format!("/uploads/{id}.png"));
    assert!(app.service.contains(&ImageId::from(id)));
    assert_eq!(app.storage.len(), 1);
}

#[tokio::test]
async fn test_upload_uses_public_url() {
    let app = TestApp::builder()
        .public_url("https://img.example.com")
        .build();

    let body = app.upload_png().await;
    let id = body["image_id"].as_str().expect("image_id");
    assert_eq!(body["view_url"], format!("https://img.example.com/view/{id}"));
}

#[tokio::test]
async fn test_upload_without_image_field_is_rejected() {
    let app = TestApp::builder().build();

    let resp = app.upload("avatar", "cat.png", "image/png", PNG_BYTES).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(json(resp).await["code"], "bad_request");
    assert_eq!(app.service.count(), 0);
}

#[tokio::test]
async fn test_upload_non_image_is_rejected() {
    let app = TestApp::builder().build();

    let resp = app
        .upload("image", "notes.txt", "text/plain", b"hello")
        .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(app.storage.len(), 0);
}

#[tokio::test]
async fn test_upload_empty_file_is_rejected() {
    let app = TestApp::builder().build();

    let resp = app.upload("image", "empty.png", "image/png", b"").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_upload_over_limit_returns_413() {
    let app = TestApp::builder().max_file_size(16).build();

    let resp = app
        .upload("image", "big.png", "image/png", &[0u8; 64])
        .await;
    assert_eq!(resp.status(), 413);
    assert_eq!(json(resp).await["code"], "payload_too_large");
    assert_eq!(app.service.count(), 0);
}

#[tokio::test]
async fn test_upload_over_body_limit_returns_413() {
    let app = TestApp::builder().max_file_size(16).build();

    let resp = app
        .upload("image", "huge.png", "image/png", &vec![0u8; 256 * 1024])
        .await;
    assert_eq!(resp.status(), 413);
}

// =============================================================================
// Reads while live
// =============================================================================

#[tokio::test]
async fn test_image_info_while_live() {
    let app = TestApp::builder().build();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    let resp = app.get(&format!("/api/image/{id}")).await;
    assert_eq!(resp.status(), 200);
    let body = json(resp).await;
    assert_eq!(body["image"]["id"], id.as_str());
    assert_eq!(body["image"]["original_name"], "cat.png");
    assert_eq!(body["image"]["mime_type"], "image/png");
    assert_eq!(body["image"]["size_bytes"], PNG_BYTES.len());
}

#[tokio::test]
async fn test_view_page_renders_image() {
    let app = TestApp::builder().build();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    let resp = app.get(&format!("/view/{id}")).await;
    assert_eq!(resp.status(), 200);
    let html = text(resp).await;
    assert!(html.contains(&format!("/uploads/{id}.png")));
    assert!(html.contains("cat.png"));
}

#[tokio::test]
async fn test_uploaded_file_served_with_headers() {
    let app = TestApp::builder().build();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    let resp = app.get(&format!("/uploads/{id}.png")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(common::bytes(resp).await, PNG_BYTES);
}

#[tokio::test]
async fn test_uploaded_file_with_wrong_extension_is_404() {
    let app = TestApp::builder().build();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    let resp = app.get(&format!("/uploads/{id}.gif")).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_unknown_image_is_404_everywhere() {
    let app = TestApp::builder().build();

    assert_eq!(app.get("/api/image/nope").await.status(), 404);
    assert_eq!(app.get("/view/nope").await.status(), 404);
    assert_eq!(app.get("/uploads/nope.png").await.status(), 404);
    assert_eq!(app.delete("/api/image/nope").await.status(), 404);
}

#[tokio::test]
async fn test_hidden_file_name_is_rejected() {
    let app = TestApp::builder().build();

    let resp = app.get("/uploads/.env").await;
    assert_eq!(resp.status(), 400);
}

// =============================================================================
// Expiry and purge
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_expired_image_disappears_from_every_route() {
    let app = TestApp::builder().ttl(Duration::from_secs(60)).build();
    let mut events = app.service.subscribe();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_eq!(app.get(&format!("/api/image/{id}")).await.status(), 200);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let event = events.recv().await.expect("eviction event");
    assert_eq!(event.id.as_str(), id);
    assert_eq!(event.cause, EvictionCause::Expired);
    assert!(event.storage_deleted());

    assert_eq!(app.get(&format!("/api/image/{id}")).await.status(), 404);
    assert_eq!(app.get(&format!("/view/{id}")).await.status(), 404);
    assert_eq!(app.get(&format!("/uploads/{id}.png")).await.status(), 404);
    assert_eq!(app.storage.len(), 0);
    assert_eq!(json(app.get("/api/health").await).await["active_images"], 0);
}

#[tokio::test(start_paused = true)]
async fn test_expiry_with_failing_delete_still_unlists() {
    let app = TestApp::builder().ttl(Duration::from_secs(5)).build();
    app.storage.fail_deletes(true);
    let mut events = app.service.subscribe();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    tokio::time::sleep(Duration::from_secs(6)).await;
    let event = events.recv().await.expect("eviction event");
    assert!(!event.storage_deleted());

    assert_eq!(app.get(&format!("/api/image/{id}")).await.status(), 404);
    assert_eq!(app.storage.delete_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_purge_then_timer_is_noop() {
    let app = TestApp::builder().ttl(Duration::from_secs(30)).build();
    let id = app.upload_png().await["image_id"]
        .as_str()
        .expect("image_id")
        .to_string();

    let resp = app.delete(&format!("/api/image/{id}")).await;
    assert_eq!(resp.status(), 204);
    assert_eq!(app.get(&format!("/api/image/{id}")).await.status(), 404);
    assert_eq!(app.storage.len(), 0);

    tokio::time::sleep(Duration::from_secs(31)).await;
    tokio::task::yield_now().await;
    assert_eq!(app.storage.delete_calls(), 1);
    assert_eq!(app.service.pending_evictions(), 0);

    assert_eq!(app.delete(&format!("/api/image/{id}")).await.status(), 404);
}
