//! Recording adapter that captures generator calls into a cassette.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{GENERATE_METHOD, GENERATOR_PORT};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::TryOnError;
use crate::ports::generator::{
    ContentPart, GenerateFuture, GenerationRequest, ImageGenerator, InlineImage,
};

/// Delegates to an inner generator and records every call.
pub struct RecordingGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGenerator {
    /// Wrap `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            let input = redacted_input(&request);
            let output = result_to_json(&result);
            match recorder.lock() {
                Ok(mut guard) => guard.record(GENERATOR_PORT, GENERATE_METHOD, input, output),
                Err(e) => tracing::warn!("recorder lock poisoned, interaction dropped: {e}"),
            }
            result
        })
    }
}

/// The request as stored in a cassette. Uploaded photos are replaced by their
/// MIME type and payload length so cassettes never carry personal images.
fn redacted_input(request: &GenerationRequest) -> serde_json::Value {
    let parts: Vec<serde_json::Value> = request
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::InlineData(image) => json!({
                "inline_data": {"mime_type": image.mime_type, "base64_len": image.data.len()}
            }),
            ContentPart::Text(text) => json!({"text": text}),
        })
        .collect();
    json!({"model": request.model, "parts": parts})
}

/// Encode a result with the `Ok`/`Err` convention used by cassettes.
fn result_to_json(result: &Result<InlineImage, TryOnError>) -> serde_json::Value {
    match result {
        Ok(image) => json!({"Ok": image}),
        Err(e) => json!({"Err": error_to_json(e)}),
    }
}

/// Tag an error with its kind so replay can rebuild the same variant.
fn error_to_json(error: &TryOnError) -> serde_json::Value {
    match error {
        TryOnError::NoImageReturned(message) => json!({"kind": "no_image", "message": message}),
        TryOnError::Api { status, message } => {
            json!({"kind": "api", "status": status, "message": message})
        }
        other => json!({"kind": "other", "message": other.to_string()}),
    }
}
