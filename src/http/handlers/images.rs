//! Upload, info and purge handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use tracing::{info, warn};

use super::super::types::{ImageInfo, ImageInfoResponse, UploadResponse};
use super::super::{AppError, AppState, HttpSettings};
use super::base_url;
use crate::constants::UPLOAD_FIELD;
use crate::storage::stored_file_name;
use crate::store::{ImageId, NewImage};

/// Image part extracted from the multipart body.
struct ImageUpload {
    original_name: String,
    mime_type: String,
    data: Bytes,
}

/// POST /api/upload - Store an image and return its viewing link.
pub(crate) async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_image_field(&mut multipart, &state.settings).await?;

    let id = ImageId::generate();
    let file_name = stored_file_name(&id, &upload.original_name);
    let storage = state.service.storage();
    let storage_path = storage.persist(&file_name, &upload.data).await?;

    let image = NewImage {
        id,
        storage_path: storage_path.clone(),
        file_name,
        original_name: upload.original_name,
        mime_type: upload.mime_type,
        size_bytes: upload.data.len() as u64,
    };
    let record = match state.service.register(image) {
        Ok(record) => record,
        Err(e) => {
            if let Err(cleanup) = storage.delete(&storage_path).await {
                warn!(path = %storage_path.display(), error = %cleanup, "Failed to remove rejected upload");
            }
            return Err(e.into());
        },
    };

    let base = base_url(&state.settings, &headers);
    Ok(Json(UploadResponse {
        success: true,
        image_id: record.id.to_string(),
        view_url: format!("{base}/view/{}", record.id),
        image_url: format!("{base}/uploads/{}", record.file_name),
        expires_in_secs: state.service.ttl().as_secs(),
        expires_at: record.expires_at.to_rfc3339(),
    }))
}

/// GET /api/image/{id} - Metadata of a live image.
pub(crate) async fn image_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ImageInfoResponse>, AppError> {
    let id = ImageId::from(id);
    let record = state.service.lookup(&id).inspect_err(|_| {
        info!(image_id = %id, "Image info miss (expired or unknown)");
    })?;

    let base = base_url(&state.settings, &headers);
    Ok(Json(ImageInfoResponse {
        success: true,
        image: ImageInfo {
            id: record.id.to_string(),
            image_url: format!("{base}/uploads/{}", record.file_name),
            original_name: record.original_name,
            mime_type: record.mime_type,
            size_bytes: record.size_bytes,
            uploaded_at: record.uploaded_at.to_rfc3339(),
            expires_at: record.expires_at.to_rfc3339(),
        },
    }))
}

/// DELETE /api/image/{id} - Evict an image before its TTL.
pub(crate) async fn image_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = ImageId::from(id);
    let report = state.service.purge(&id).await?;
    info!(image_id = %id, storage_deleted = report.storage_deleted(), "Image purged");
    Ok(StatusCode::NO_CONTENT)
}

async fn read_image_field(
    multipart: &mut Multipart,
    settings: &HttpSettings,
) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or("upload")
            .to_string();
        let mime_type = field.content_type().map_or_else(
            || {
                mime_guess::from_path(&original_name)
                    .first_or_octet_stream()
                    .to_string()
            },
            str::to_string,
        );

        if !mime_type.starts_with(&settings.allowed_mime_prefix) {
            warn!(%original_name, %mime_type, "Rejected upload with disallowed type");
            return Err(AppError::BadRequest(
                "Only image files can be uploaded".to_string(),
            ));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > settings.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} byte limit",
                settings.max_file_size
            )));
        }
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(ImageUpload {
            original_name,
            mime_type,
            data,
        });
    }

    warn!("Upload rejected: no image field");
    Err(AppError::BadRequest("An image file is required".to_string()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file is too large".to_string())
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}
