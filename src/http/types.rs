//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Error body for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// GET /api/health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub active_images: usize,
    pub pending_evictions: usize,
    pub uptime_secs: u64,
}

/// POST /api/upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub image_id: String,
    pub view_url: String,
    pub image_url: String,
    pub expires_in_secs: u64,
    pub expires_at: String,
}

/// Public view of an image record.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub uploaded_at: String,
    pub expires_at: String,
    pub image_url: String,
}

/// GET /api/image/{id}
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageInfoResponse {
    pub success: bool,
    pub image: ImageInfo,
}
