//! Live adapter for the Gemini `generateContent` API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::TryOnError;
use crate::ports::generator::{
    ContentPart, GenerateFuture, GenerationRequest, ImageGenerator, InlineImage,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);
            let body = GeminiRequest::from(&request);

            tracing::debug!(model = %request.model, parts = request.parts.len(), "POST generateContent");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(TryOnError::Api { status: status.as_u16(), message: response_text });
            }

            extract_image(&response_text)?.ok_or_else(|| {
                let truncated: String = response_text.chars().take(500).collect();
                tracing::debug!(body = %truncated, "response carried no image part");
                TryOnError::NoImageReturned("No image in model response.".into())
            })
        })
    }
}

/// Pull the first inline image out of a `generateContent` response body.
///
/// Candidates are scanned in order and the first one holding an inline-data
/// part wins. Its MIME type is kept as returned.
fn extract_image(response_text: &str) -> Result<Option<InlineImage>, TryOnError> {
    let parsed: GeminiResponse = serde_json::from_str(response_text).map_err(|e| {
        TryOnError::Api { status: 200, message: format!("Failed to parse response: {e}") }
    })?;

    let image = parsed
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .map(|inline| InlineImage::new(inline.mime_type, &inline.data));
    Ok(image)
}

// --- Gemini API request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiRequestContent,
    contents: Vec<GeminiRequestContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiRequestContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
    Text(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_modalities: Vec<&'static str>,
}

impl From<&GenerationRequest> for GeminiRequest {
    fn from(request: &GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::InlineData(image) => GeminiRequestPart::InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
                ContentPart::Text(text) => GeminiRequestPart::Text(text.clone()),
            })
            .collect();

        Self {
            system_instruction: GeminiRequestContent {
                parts: vec![GeminiRequestPart::Text(request.system_instruction.clone())],
            },
            contents: vec![GeminiRequestContent { parts }],
            generation_config: GeminiGenerationConfig { response_modalities: vec!["IMAGE"] },
        }
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}
