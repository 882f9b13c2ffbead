// src/services/storage_service.rs
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use log::{debug, info};
use reqwest::Client;
use thiserror::Error;
use urlencoding::encode;
use uuid::Uuid;

use crate::dtos::upload_dtos::ImageUpload;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage error: {0}")]
    Api(String),
    #[error("{0}")]
    InvalidImage(String),
}

/// Decoded, validated image ready for upload.
#[derive(Debug, Clone)]
pub struct ImageBytes {
    pub bytes: Vec<u8>,
    pub content_type: mime::Mime,
    pub extension: &'static str,
}

/// Checks type and size and decodes the base64 body (a `data:` URL prefix is accepted).
pub fn decode_image(upload: &ImageUpload, max_bytes: usize) -> Result<ImageBytes, StorageError> {
    let content_type: mime::Mime = upload
        .content_type
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| StorageError::InvalidImage("Invalid content type".to_string()))?;

    if content_type.type_() != mime::IMAGE {
        return Err(StorageError::InvalidImage(
            "Invalid file type. Only JPEG, PNG, GIF, and WEBP are allowed.".to_string(),
        ));
    }

    let extension = match content_type.subtype().as_str() {
        "jpeg" | "jpg" => "jpg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        _ => {
            return Err(StorageError::InvalidImage(
                "Invalid file type. Only JPEG, PNG, GIF, and WEBP are allowed.".to_string(),
            ))
        }
    };

    let base64_data = match upload.image_data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => upload.image_data.as_str(),
    };

    let bytes = general_purpose::STANDARD
        .decode(base64_data.trim())
        .map_err(|_| StorageError::InvalidImage("Invalid base64 image data".to_string()))?;

    if bytes.is_empty() {
        return Err(StorageError::InvalidImage("Image is empty".to_string()));
    }
    if bytes.len() > max_bytes {
        return Err(StorageError::InvalidImage(format!(
            "Image is too large (max {} KB)",
            max_bytes / 1024
        )));
    }

    Ok(ImageBytes { bytes, content_type, extension })
}

/// Per-user object path: `<user_id>/<kind>-<millis>.<ext>`.
pub fn object_path(user_id: Uuid, kind: &str, extension: &str) -> String {
    format!("{}/{}-{}.{}", user_id, kind, Utc::now().timestamp_millis(), extension)
}

/// Supabase object storage (`/storage/v1`).
#[derive(Clone)]
pub struct StorageService {
    client: Client,
    supabase_url: String,
    service_role_key: String,
}

impl StorageService {
    pub fn new(client: Client, supabase_url: &str, service_role_key: &str) -> Self {
        Self {
            client,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    /// Uploads `image` to `bucket/path` and returns its public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        image: ImageBytes,
    ) -> Result<String, StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.supabase_url,
            encode(bucket),
            encode_path(path)
        );
        debug!("uploading {} bytes to {}", image.bytes.len(), url);

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Content-Type", image.content_type.essence_str())
            .header("x-upsert", "true")
            .body(image.bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api(format!("{} -> {}", status.as_u16(), text)));
        }

        info!("stored {}/{}", bucket, path);
        Ok(self.public_url(bucket, path))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.supabase_url,
            encode(bucket),
            encode_path(path)
        )
    }
}

fn encode_path(path: &str) -> String {
    path.split('/').map(|seg| encode(seg).into_owned()).collect::<Vec<_>>().join("/")
}
