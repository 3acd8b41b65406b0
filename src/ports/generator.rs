//! Generator port for the remote generative image model.

use std::future::Future;
use std::pin::Pin;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::TryOnError;

/// An image carried inline as a base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// MIME type of the image (e.g., `"image/jpeg"`).
    pub mime_type: String,
    /// Base64 payload without any data-URL prefix.
    pub data: String,
}

impl InlineImage {
    /// Create an inline image, stripping any data-URL prefix from `data`.
    pub fn new(mime_type: impl Into<String>, data: &str) -> Self {
        Self { mime_type: mime_type.into(), data: codec::strip(data).to_string() }
    }

    /// Encode raw bytes as an inline image.
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<data>` URL. Bare base64 is accepted and
    /// assumed to be JPEG.
    #[must_use]
    pub fn from_data_url(url: &str) -> Self {
        let mime = codec::data_url_mime(url).unwrap_or(codec::DEFAULT_MIME);
        Self::new(mime, url)
    }

    /// Render as a `data:<mime>;base64,<data>` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload into raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, TryOnError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| TryOnError::ImageConversion(format!("Failed to decode base64: {e}")))
    }
}

/// One input part of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPart {
    /// An inline image.
    InlineData(InlineImage),
    /// A text instruction.
    Text(String),
}

/// A single `generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The resolved model identifier (e.g., `"gemini-2.5-flash-image"`).
    pub model: String,
    /// System instruction shared by every operation.
    pub system_instruction: String,
    /// Ordered content parts.
    pub parts: Vec<ContentPart>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<InlineImage, TryOnError>> + Send + 'a>>;

/// Produces an image from a content request via an external model.
pub trait ImageGenerator: Send + Sync {
    /// Run the request and return the first image the model produced.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_data_url_prefix() {
        let image = InlineImage::new("image/jpeg", "data:image/png;base64,AAEC");
        assert_eq!(image.data, "AAEC");
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn data_url_keeps_returned_mime_type() {
        let image = InlineImage { mime_type: "image/png".into(), data: "AAEC".into() };
        assert_eq!(image.to_data_url(), "data:image/png;base64,AAEC");
        assert_eq!(InlineImage::from_data_url(&image.to_data_url()), image);
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let image = InlineImage::from_data_url("AAEC");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "AAEC");
    }

    #[test]
    fn decode_recovers_bytes() {
        let image = InlineImage::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(image.decode().unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn decode_rejects_garbage() {
        let image = InlineImage { mime_type: "image/jpeg".into(), data: "%%%".into() };
        assert!(image.decode().is_err());
    }

    #[test]
    fn request_serialization() {
        let request = GenerationRequest {
            model: "gemini-2.5-flash-image".into(),
            system_instruction: "be strict".into(),
            parts: vec![
                ContentPart::InlineData(InlineImage::new("image/jpeg", "AAEC")),
                ContentPart::Text("a pose".into()),
            ],
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.parts, request.parts);
        assert_eq!(back.model, "gemini-2.5-flash-image");
    }
}
