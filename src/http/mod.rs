//! HTTP surface over the image store.
//!
//! Routes:
//! - `GET /` - banner
//! - `GET /api/health` - liveness and active image count
//! - `POST /api/upload` - multipart upload (field `image`)
//! - `GET /api/image/{id}` - image metadata
//! - `DELETE /api/image/{id}` - administrative purge
//! - `GET /view/{id}` - HTML viewer page
//! - `GET /uploads/{file}` - stored bytes of a live image

mod error;
mod handlers;
mod templates;
mod types;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::constants::MULTIPART_OVERHEAD;
use crate::store::ImageService;

pub use error::AppError;
pub use types::{
    ErrorResponse, HealthResponse, ImageInfo, ImageInfoResponse, UploadResponse,
};

/// Request-independent settings used by the handlers.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Base for absolute URLs, without trailing slash.
    pub public_url: Option<String>,
    pub max_file_size: usize,
    pub allowed_mime_prefix: String,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            public_url: config
                .server
                .public_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string()),
            max_file_size: config.upload.max_file_size,
            allowed_mime_prefix: config.upload.allowed_mime_prefix.clone(),
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: ImageService,
    pub settings: Arc<HttpSettings>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: ImageService, settings: HttpSettings) -> Self {
        Self {
            service,
            settings: Arc::new(settings),
            started_at: Instant::now(),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route(
            "/api/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/image/{id}",
            get(handlers::image_info).delete(handlers::image_delete),
        )
        .route("/view/{id}", get(handlers::view))
        .route("/uploads/{file}", get(handlers::uploaded_file))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
