//! Viewer page and stored file handlers.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use tracing::info;

use super::super::error::IMAGE_NOT_FOUND;
use super::super::templates::{NOT_FOUND_PAGE, render_view};
use super::super::{AppError, AppState};
use crate::storage::validate_file_name;
use crate::store::ImageId;

/// GET /view/{id} - HTML viewer for a live image.
pub(crate) async fn view(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = ImageId::from(id);
    match state.service.lookup(&id) {
        Ok(record) => {
            info!(image_id = %id, "Image viewed");
            let image_url = format!("/uploads/{}", record.file_name);
            Html(render_view(&record, &image_url, Utc::now())).into_response()
        },
        Err(_) => {
            info!(image_id = %id, "View miss (expired or unknown)");
            (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
        },
    }
}

/// GET /uploads/{file} - Stored bytes, only while the owning image is live.
pub(crate) async fn uploaded_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    validate_file_name(&file)?;

    let id = ImageId::from(file.split('.').next().unwrap_or_default());
    let record = state.service.lookup(&id)?;
    if record.file_name != file {
        return Err(AppError::NotFound(IMAGE_NOT_FOUND.to_string()));
    }

    let data = state
        .service
        .storage()
        .read(&file)
        .await?
        .ok_or_else(|| AppError::NotFound(IMAGE_NOT_FOUND.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, record.mime_type),
            (header::CACHE_CONTROL, "no-store".to_string()),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        data,
    )
        .into_response())
}
