use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use tracing::{debug, warn};

use crate::error::MediaError;

/// Largest avatar accepted at intake: 5 MiB.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_FORMATS: [&str; 4] = ["jpg", "png", "jpeg", "webp"];

/// A file part taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    /// Content type declared by the client.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Rejects oversized and non-image uploads before anything leaves the process.
#[derive(Debug, Clone, Copy)]
pub struct AvatarIntake {
    max_bytes: usize,
}

impl Default for AvatarIntake {
    fn default() -> Self {
        Self::new(MAX_AVATAR_BYTES)
    }
}

impl AvatarIntake {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validates the file and returns it as a `data:` URI ready for upload.
    pub fn accept(&self, file: &IncomingFile) -> Result<String, MediaError> {
        let checked = self.check(file);
        match &checked {
            Ok(_) => debug!(file = %file.file_name, size = file.bytes.len(), "avatar accepted"),
            Err(err) => warn!(file = %file.file_name, error = %err, "avatar rejected"),
        }
        checked
    }

    fn check(&self, file: &IncomingFile) -> Result<String, MediaError> {
        if file.bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                size: file.bytes.len(),
                limit: self.max_bytes,
            });
        }
        if !file.content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(MediaError::UnsupportedType {
                content_type: file.content_type.clone(),
            });
        }
        let mime = sniff_mime(&file.bytes).ok_or_else(|| MediaError::UnsupportedType {
            content_type: file.content_type.clone(),
        })?;
        Ok(data_uri(mime, &file.bytes))
    }
}

/// Accepts a `data:` URI, a remote URL, or bare base64 image bytes.
///
/// Bare base64 is decoded and its format sniffed so the host receives a
/// well-formed data URI.
pub fn normalize_payload(payload: &str) -> Result<String, MediaError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(MediaError::InvalidPayload("payload is empty".to_string()));
    }
    if payload.starts_with("data:")
        || payload.starts_with("https://")
        || payload.starts_with("http://")
    {
        return Ok(payload.to_string());
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| MediaError::InvalidPayload(format!("not valid base64: {err}")))?;
    let mime = sniff_mime(&bytes).ok_or_else(|| {
        MediaError::InvalidPayload(format!(
            "not a supported image (allowed: {})",
            ALLOWED_FORMATS.join(", ")
        ))
    })?;
    Ok(data_uri(mime, &bytes))
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
