//! Shared helpers for HTTP integration tests.
//!
//! `TestApp` drives the router in-process with `tower::ServiceExt::oneshot`,
//! backed by `MemoryStorage` so tests can inspect physical deletes.

#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tempshot::http::{AppState, HttpSettings, router};
use tempshot::storage::MemoryStorage;
use tempshot::store::ImageService;

pub const BOUNDARY: &str = "tempshot-test-boundary";

/// A small valid PNG header; content is never decoded.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

pub struct TestApp {
    pub router: Router,
    pub service: ImageService,
    pub storage: MemoryStorage,
}

pub struct TestAppBuilder {
    ttl: Duration,
    max_file_size: usize,
    public_url: Option<String>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            ttl: Duration::from_secs(60),
            max_file_size: 1024,
            public_url: None,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).expect("valid request"))
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::delete(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    /// Posts a single-part multipart body to `/api/upload`.
    pub async fn upload(
        &self,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Response<Body> {
        let request = Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, file_name, content_type, data)))
            .expect("valid request");
        self.send(request).await
    }

    /// Uploads a PNG and returns the parsed JSON response.
    pub async fn upload_png(&self) -> serde_json::Value {
        let resp = self.upload("image", "cat.png", "image/png", PNG_BYTES).await;
        assert_eq!(resp.status(), 200, "upload should succeed");
        json(resp).await
    }
}

impl TestAppBuilder {
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn public_url(mut self, url: &str) -> Self {
        self.public_url = Some(url.to_string());
        self
    }

    pub fn build(self) -> TestApp {
        let storage = MemoryStorage::new();
        let service = ImageService::new(storage.clone(), self.ttl);
        let settings = HttpSettings {
            public_url: self.public_url,
            max_file_size: self.max_file_size,
            allowed_mime_prefix: "image/".to_string(),
        };
        let router = router(AppState::new(service.clone(), settings));
        TestApp {
            router,
            service,
            storage,
        }
    }
}

pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn bytes(resp: Response<Body>) -> Vec<u8> {
    resp.into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec()
}

pub async fn json(resp: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&bytes(resp).await).expect("body is JSON")
}

pub async fn text(resp: Response<Body>) -> String {
    String::from_utf8(bytes(resp).await).expect("body is UTF-8")
}
