//! Turns a picked image into the `{base64, mimeType}` pair the proxy expects.
//!
//! No size or decode validation happens here. Oversized or corrupt images
//! are only discovered when the model rejects them.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use thiserror::Error;
use tracing::debug;

/// MIME types offered by the file picker.
pub const PICKER_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to read image file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine the image type of '{0}'")]
    UnknownMime(String),

    #[error("'{0}' is not an accepted image type")]
    NotAccepted(String),
}

/// An image as held by the UI: everything derived from its source bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    mime_type: String,
    base64: String,
    preview_url: String,
}

impl UploadedImage {
    /// Builds the image and its derived encodings from one source buffer.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let base64 = general_purpose::STANDARD.encode(bytes);
        let preview_url = format!("data:{mime_type};base64,{base64}");
        Self {
            mime_type,
            base64,
            preview_url,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Payload only, without any `data:` prefix.
    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }
}

/// Reads an image file and encodes it.
pub async fn load(path: impl AsRef<Path>) -> Result<UploadedImage, EncodeError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| EncodeError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let mime_type = mime_from_path(path)
        .or_else(|| sniff_mime(&bytes))
        .ok_or_else(|| EncodeError::UnknownMime(path.display().to_string()))?;

    debug!(path = %path.display(), mime_type, size = bytes.len(), "encoded image");
    Ok(UploadedImage::from_bytes(&bytes, mime_type))
}

/// Reads an image file and returns only its base64 payload.
pub async fn encode(path: impl AsRef<Path>) -> Result<String, EncodeError> {
    Ok(load(path).await?.base64)
}

/// Same as [`load`] but applies the picker's MIME filter.
pub async fn load_picked(path: impl AsRef<Path>) -> Result<UploadedImage, EncodeError> {
    let image = load(path).await?;
    if !accepted_by_picker(image.mime_type()) {
        return Err(EncodeError::NotAccepted(image.mime_type().to_string()));
    }
    Ok(image)
}

/// Payload portion of a data URI: everything after the first comma.
pub fn strip_data_uri(uri: &str) -> Option<&str> {
    uri.split_once(',').map(|(_, payload)| payload)
}

pub fn accepted_by_picker(mime_type: &str) -> bool {
    PICKER_MIME_TYPES.contains(&mime_type)
}

pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}
