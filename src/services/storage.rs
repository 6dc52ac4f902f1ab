// src/services/storage.rs
//! Media upload adapter.
//!
//! The only component that knows the remote object store's addressing
//! scheme. Uploads validate MIME type and size before any network call;
//! raster images are re-encoded bounded to 1000x1000; PDF and Word
//! documents are stored verbatim. Deletion is best-effort.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::Utc;
use image::ImageFormat;
use infer::Infer;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::common::error::ApiError;
use crate::common::id_generator::generate_raw_id;
use crate::common::multipart::UploadedFile;

/// Maximum accepted upload size: 5 MiB
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Bound applied to raster image dimensions before upload
const MAX_IMAGE_DIMENSION: u32 = 1000;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File size exceeds 5MB limit")]
    FileTooLarge,

    #[error("Invalid file type: {0}. Allowed: images, PDF, Word documents")]
    InvalidFileType(String),

    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Storage backend not configured: {0}")]
    NotConfigured(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::FileTooLarge | StorageError::InvalidFileType(_) => {
                ApiError::ValidationError(e.to_string())
            }
            other => ApiError::InternalServer(other.to_string()),
        }
    }
}

/// A stored remote object: public URL plus the identifier used to delete it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaObject {
    pub url: String,
    pub media_id: String,
}

/// Seam between upload policy and the concrete remote store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `key`, returning the public URL
    async fn put(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<String, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// S3 backend
// ============================================================================

pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build the client from environment configuration. Required:
    /// S3_BUCKET, S3_REGION, AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY.
    /// Optional: S3_PUBLIC_URL (e.g. a CDN domain) overrides the standard
    /// S3 URL scheme.
    pub async fn from_env() -> Result<Self, StorageError> {
        let bucket = std::env::var("S3_BUCKET")
            .map_err(|_| StorageError::NotConfigured("S3_BUCKET not set".to_string()))?;
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| StorageError::NotConfigured("AWS_ACCESS_KEY_ID not set".to_string()))?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
            StorageError::NotConfigured("AWS_SECRET_ACCESS_KEY not set".to_string())
        })?;

        let credentials =
            Credentials::new(&access_key_id, &secret_access_key, None, None, "env");

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let public_base_url = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.{}.amazonaws.com", bucket, region));

        Ok(Self {
            client: S3Client::new(&aws_config),
            bucket,
            public_base_url,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to upload object");
                StorageError::OperationFailed(format!("Upload failed: {}", e))
            })?;

        info!(key = %key, bucket = %self.bucket, "Object uploaded");
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to delete object");
                StorageError::OperationFailed(format!("Delete failed: {}", e))
            })?;

        info!(key = %key, "Object deleted");
        Ok(())
    }
}

// ============================================================================
// In-memory backend (tests, credential-less local runs)
// ============================================================================

#[derive(Default)]
pub struct MemoryObjectStore {
    pub puts: std::sync::Mutex<Vec<String>>,
    pub deletes: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        self.puts.lock().unwrap().push(key.to_string());
        Ok(format!("memory://{}", key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

// ============================================================================
// Media service
// ============================================================================

pub struct MediaService {
    store: std::sync::Arc<dyn ObjectStore>,
}

impl MediaService {
    pub fn new(store: std::sync::Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Validate and store an uploaded file. The remote call happens only
    /// after the type and size checks pass.
    pub async fn upload(&self, file: &UploadedFile) -> Result<MediaObject, StorageError> {
        if file.data.len() > MAX_FILE_SIZE {
            return Err(StorageError::FileTooLarge);
        }

        let content_type = sniff_content_type(&file.data).ok_or_else(|| {
            StorageError::InvalidFileType("unrecognized file content".to_string())
        })?;

        if !is_allowed_type(content_type) {
            return Err(StorageError::InvalidFileType(content_type.to_string()));
        }

        let data = if is_raster_image(content_type) {
            bound_image_size(&file.data, content_type)
        } else {
            file.data.clone()
        };

        let key = make_storage_key(&file.original_name);
        let url = self.store.put(&key, data, content_type).await?;

        Ok(MediaObject { url, media_id: key })
    }

    /// Best-effort remote deletion. Failures are logged, never surfaced;
    /// a dangling remote object is preferable to blocking the caller.
    pub async fn delete(&self, media_id: &str) {
        if media_id.is_empty() {
            warn!("No media id provided for deletion");
            return;
        }
        if let Err(e) = self.store.delete(media_id).await {
            warn!(error = %e, media_id = %media_id, "Remote media deletion failed");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Sniff content type from bytes; `infer` does not recognize SVG, so XML
/// that opens with an svg tag is detected separately.
fn sniff_content_type(data: &[u8]) -> Option<&'static str> {
    let infer = Infer::new();
    if let Some(info) = infer.get(data) {
        return Some(info.mime_type());
    }

    let head = String::from_utf8_lossy(&data[..data.len().min(512)]);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some("image/svg+xml");
    }

    None
}

fn is_allowed_type(content_type: &str) -> bool {
    matches!(
        content_type,
        "image/jpeg"
            | "image/jpg"
            | "image/png"
            | "image/gif"
            | "image/webp"
            | "image/svg+xml"
            | "application/pdf"
            | "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    )
}

fn is_raster_image(content_type: &str) -> bool {
    matches!(
        content_type,
        "image/jpeg" | "image/jpg" | "image/png" | "image/gif" | "image/webp"
    )
}

/// Re-encode a raster image so neither dimension exceeds the bound. Images
/// that fail to decode (e.g. animated formats) are stored unchanged.
fn bound_image_size(data: &Bytes, content_type: &str) -> Bytes {
    let decoded = match image::load_from_memory(data) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, "Image decode failed, storing original bytes");
            return data.clone();
        }
    };

    if decoded.width() <= MAX_IMAGE_DIMENSION && decoded.height() <= MAX_IMAGE_DIMENSION {
        return data.clone();
    }

    let resized = decoded.resize(
        MAX_IMAGE_DIMENSION,
        MAX_IMAGE_DIMENSION,
        image::imageops::FilterType::Triangle,
    );

    let format = match content_type {
        "image/png" => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    };

    let mut out = Cursor::new(Vec::new());
    match resized.write_to(&mut out, format) {
        Ok(()) => Bytes::from(out.into_inner()),
        Err(e) => {
            warn!(error = %e, "Image re-encode failed, storing original bytes");
            data.clone()
        }
    }
}

/// Storage key: timestamp + random suffix + sanitized name stem, under a
/// fixed folder. The key doubles as the media id used for deletion.
fn make_storage_key(original_name: &str) -> String {
    let stem = original_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original_name);
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    let safe_stem: String = stem
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(64)
        .collect();
    let safe_stem = if safe_stem.is_empty() {
        "upload".to_string()
    } else {
        safe_stem
    };

    match ext {
        Some(ext) if !ext.is_empty() => format!(
            "portfolio/{}-{}-{}.{}",
            Utc::now().timestamp_millis(),
            generate_raw_id(6),
            safe_stem,
            ext
        ),
        _ => format!(
            "portfolio/{}-{}-{}",
            Utc::now().timestamp_millis(),
            generate_raw_id(6),
            safe_stem
        ),
    }
}
