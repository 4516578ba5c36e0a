//! Image attribute codec.
//!
//! Turns the value submitted for an `image` attribute into the storage path
//! that gets persisted:
//!
//! - `null` (or an empty string) deletes the currently stored file and
//!   clears the attribute,
//! - a `data:image/<ext>;base64,...` URI is decoded, verified and written
//!   to storage under a hashed filename,
//! - anything else is taken to be an existing storage path and kept verbatim.
//!
//! Storage writes are not transactional with the database save. A crash
//! between the two can leave an orphaned file.

use std::sync::{Arc, LazyLock};

use base64::Engine;
use regex::Regex;

use crate::alert::AlertSink;
use crate::hashing::sha256_hex;
use crate::storage::{delete_if_present, StorageBackend, StorageError};

/// Storage directory for project cover images.
pub const DEFAULT_DESTINATION: &str = "projects";

static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:image/([^;,/]+);base64,").expect("data URI pattern is valid")
});

/// How a submitted image value is to be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageValue<'a> {
    Clear,
    DataUri(&'a str),
    Path(&'a str),
}

impl<'a> ImageValue<'a> {
    pub fn classify(value: Option<&'a str>) -> Self {
        match value {
            None => ImageValue::Clear,
            Some(v) if v.trim().is_empty() => ImageValue::Clear,
            Some(v) if v.get(..10).is_some_and(|p| p.eq_ignore_ascii_case("data:image")) => {
                ImageValue::DataUri(v)
            }
            Some(v) => ImageValue::Path(v),
        }
    }
}

/// A decoded `data:image/...` payload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Lowercased extension taken from the MIME subtype (`png`, `jpeg`, ...).
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Why a data URI could not be turned into an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("Image data must look like data:image/<type>;base64,<payload>")]
    Malformed,

    #[error("Image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image payload could not be read: {0}")]
    Unreadable(#[from] ::image::ImageError),
}

/// Decode and verify a base64 image data URI.
pub fn decode_data_uri(value: &str) -> Result<DecodedImage, ImageDecodeError> {
    let caps = DATA_URI.captures(value).ok_or(ImageDecodeError::Malformed)?;
    let extension = caps[1].to_ascii_lowercase();
    let payload_start = caps.get(0).map_or(0, |m| m.end());
    let payload: String = value[payload_start..]
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    ::image::load_from_memory(&bytes)?;

    Ok(DecodedImage { extension, bytes })
}

/// Verify that `bytes` hold a readable image and return its usual file
/// extension (`png`, `jpg`, ...).
pub fn detect_image_extension(bytes: &[u8]) -> Result<&'static str, ImageDecodeError> {
    let format = ::image::guess_format(bytes)?;
    ::image::load_from_memory_with_format(bytes, format)?;
    format
        .extensions_str()
        .first()
        .copied()
        .ok_or(ImageDecodeError::Malformed)
}

/// Filename for a stored image: hash of the submitted payload and the
/// current unix time, plus the extension.
pub fn image_filename(payload: &[u8], timestamp: i64, extension: &str) -> String {
    let mut seed = payload.to_vec();
    seed.extend_from_slice(timestamp.to_string().as_bytes());
    format!("{}.{extension}", sha256_hex(&seed))
}

/// Why storing a data URI image failed.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error(transparent)]
    Decode(#[from] ImageDecodeError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Applies submitted image values against a storage backend.
#[derive(Clone)]
pub struct ImageCodec {
    storage: Arc<dyn StorageBackend>,
    destination: String,
}

impl ImageCodec {
    pub fn new(storage: Arc<dyn StorageBackend>, destination: impl Into<String>) -> Self {
        Self {
            storage,
            destination: destination.into().trim_matches('/').to_string(),
        }
    }

    /// Compute the new attribute value for `value`, given the currently
    /// stored path.
    ///
    /// Decode and write failures are pushed to `alerts` and yield `None`
    /// rather than an error, so the surrounding save still goes ahead.
    pub async fn apply(
        &self,
        current: Option<&str>,
        value: Option<&str>,
        alerts: &dyn AlertSink,
    ) -> Option<String> {
        match ImageValue::classify(value) {
            ImageValue::Clear => {
                if let Some(path) = current {
                    self.remove(path).await;
                }
                None
            }
            ImageValue::DataUri(uri) => match self.store(uri).await {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding uploaded image");
                    alerts.error(&e.to_string());
                    None
                }
            },
            ImageValue::Path(path) => Some(path.to_string()),
        }
    }

    /// Best-effort removal of a stored file. A missing file is not an error;
    /// other failures are logged and swallowed.
    pub async fn remove(&self, path: &str) {
        if let Err(e) = delete_if_present(self.storage.as_ref(), path).await {
            tracing::warn!(storage_path = %path, error = %e, "Failed to delete stored image");
        }
    }

    /// Write an uploaded image file, already checked with
    /// [`detect_image_extension`], and return its storage path.
    pub async fn store_upload(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<String, StorageError> {
        self.write(bytes, bytes, extension).await
    }

    async fn store(&self, uri: &str) -> Result<String, ImageStoreError> {
        let decoded = decode_data_uri(uri)?;
        let path = self
            .write(uri.as_bytes(), &decoded.bytes, &decoded.extension)
            .await?;
        Ok(path)
    }

    async fn write(
        &self,
        seed: &[u8],
        bytes: &[u8],
        extension: &str,
    ) -> Result<String, StorageError> {
        let timestamp = chrono::Utc::now().timestamp();
        let filename = image_filename(seed, timestamp, extension);
        let path = if self.destination.is_empty() {
            filename
        } else {
            format!("{}/{}", self.destination, filename)
        };

        self.storage.put(&path, bytes).await?;
        tracing::info!(storage_path = %path, size = bytes.len(), "Stored image");
        Ok(path)
    }
}
