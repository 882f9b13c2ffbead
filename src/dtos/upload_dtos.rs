// src/dtos/upload_dtos.rs
use serde::Deserialize;

/// Image sent inline as base64 (optionally as a `data:` URL).
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub image_data: String,
    #[serde(default)]
    pub file_name: String,
    pub content_type: String,
}
