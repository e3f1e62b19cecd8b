//! HTTP handlers organized by concern.

mod health;
mod images;
mod view;

use axum::http::{HeaderMap, Method, Uri, header};
use tracing::warn;

use super::{AppError, HttpSettings};

pub(crate) use health::{health, index};
pub(crate) use images::{image_delete, image_info, upload};
pub(crate) use view::{uploaded_file, view};

/// Fallback for unknown routes.
pub(crate) async fn not_found(method: Method, uri: Uri) -> AppError {
    warn!(%method, %uri, "No route matched");
    AppError::NotFound("Page not found".to_string())
}

/// Base of absolute URLs: the configured public URL, else `http://<Host>`.
///
/// Empty when neither is available, which yields root-relative URLs.
pub(crate) fn base_url(settings: &HttpSettings, headers: &HeaderMap) -> String {
    if let Some(url) = &settings.public_url {
        return url.clone();
    }
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{host}"))
        .unwrap_or_default()
}
