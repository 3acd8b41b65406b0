//! File naming and writing looks to disk.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TryOnError;
use crate::params::OutputFormat;
use crate::ports::InlineImage;
use crate::session::Session;

/// Generate an output filename from a label and format.
///
/// Sanitizes the first 50 characters of the label to kebab-case, appends a
/// unix timestamp and the format's extension.
#[must_use]
pub fn auto_filename(label: &str, format: OutputFormat) -> String {
    let sanitized = sanitize_for_filename(label, 50);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{sanitized}-{timestamp}.{}", format.extension())
}

/// Sanitize a string for use in a filename.
///
/// Lowercases, replaces runs of non-alphanumeric chars with one hyphen and
/// trims to `max_len`. Falls back to `"look"` when nothing is left.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !result.is_empty() && result.len() + 1 < max_len {
                result.push('-');
            }
            pending_hyphen = false;
            result.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if result.is_empty() {
        "look".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use the explicit path or auto-generate one.
#[must_use]
pub fn resolve_output_path(explicit: Option<&Path>, label: &str, format: OutputFormat) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(auto_filename(label, format)),
    }
}

/// Write an inline image to `path`, converting when the model's MIME type
/// differs from `format`.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded, converted or written.
pub fn save_image(
    image: &InlineImage,
    format: OutputFormat,
    path: &Path,
) -> Result<(), TryOnError> {
    let bytes = image.decode()?;
    if format.matches_mime(&image.mime_type) {
        return std::fs::write(path, bytes).map_err(TryOnError::Io);
    }

    tracing::debug!(from = %image.mime_type, to = format.mime_type(), "converting image");
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| TryOnError::ImageConversion(format!("Failed to decode image: {e}")))?;
    decoded.save_with_format(path, format.image_format()).map_err(|e| {
        TryOnError::ImageConversion(format!("Failed to save as {}: {e}", format.extension()))
    })
}

/// Write the base look and every history layer into `dir`.
///
/// Files are named `00-base.<ext>`, `01-<description>.<ext>`, ... in the
/// order the edits were applied. Returns the written paths.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn save_history(
    dir: &Path,
    session: &Session,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, TryOnError> {
    std::fs::create_dir_all(dir)?;
    let ext = format.extension();
    let mut written = Vec::new();

    if let Some(base) = session.generated_model_image() {
        let path = dir.join(format!("00-base.{ext}"));
        save_image(base, format, &path)?;
        written.push(path);
    }

    for (i, layer) in session.history().iter().enumerate() {
        let name = sanitize_for_filename(layer.description(), 40);
        let path = dir.join(format!("{:02}-{name}.{ext}", i + 1));
        save_image(layer.image(), format, &path)?;
        written.push(path);
    }

    Ok(written)
}
