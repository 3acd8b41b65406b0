//! Turning local image files into inline payloads and back.

use std::path::Path;

use crate::error::TryOnError;
use crate::ports::InlineImage;

/// MIME type assumed when none can be inferred.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// Read an image file into an inline base64 payload.
///
/// The MIME type comes from the file extension. Image content is not
/// validated; the model reports anything it cannot use.
///
/// # Errors
///
/// Returns [`TryOnError::Read`] if the file cannot be read.
pub async fn encode_file(path: &Path) -> Result<InlineImage, TryOnError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| TryOnError::Read { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "encoded image");
    Ok(InlineImage::from_bytes(mime_from_path(path), &bytes))
}

/// Load an image given either a `data:` URL or a file path.
///
/// # Errors
///
/// Returns [`TryOnError::Read`] if `source` is a path that cannot be read.
pub async fn load_image(source: &str) -> Result<InlineImage, TryOnError> {
    if data_url_mime(source).is_some() {
        return Ok(InlineImage::from_data_url(source));
    }
    encode_file(Path::new(source)).await
}

/// Remove a leading `data:<mime>;base64,` prefix, if present.
#[must_use]
pub fn strip(payload: &str) -> &str {
    payload
        .strip_prefix("data:")
        .and_then(|body| body.split_once(";base64,"))
        .map_or(payload, |(_, data)| data)
}

/// The MIME type embedded in a data URL, if `url` is one.
#[must_use]
pub fn data_url_mime(url: &str) -> Option<&str> {
    let body = url.strip_prefix("data:")?;
    let (mime, _) = body.split_once(";base64,")?;
    let mime = mime.trim();
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

/// Guess a MIME type from a file extension.
#[must_use]
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => DEFAULT_MIME,
    }
}
