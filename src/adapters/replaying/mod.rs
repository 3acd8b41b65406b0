//! Replaying adapter that serves generator results from a cassette.

use std::sync::{Arc, Mutex};

use super::{GENERATE_METHOD, GENERATOR_PORT};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::TryOnError;
use crate::ports::generator::{GenerateFuture, GenerationRequest, ImageGenerator, InlineImage};

/// Answers every call with the next recorded result, without network I/O.
pub struct ReplayingGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn next_output(&self) -> Result<serde_json::Value, TryOnError> {
        let mut guard = self
            .replayer
            .lock()
            .map_err(|e| TryOnError::Config(format!("Replayer lock poisoned: {e}")))?;
        guard
            .next_interaction(GENERATOR_PORT, GENERATE_METHOD)
            .map(|interaction| interaction.output)
            .map_err(TryOnError::Config)
    }
}

impl ImageGenerator for ReplayingGenerator {
    fn generate(&self, _request: &GenerationRequest) -> GenerateFuture<'_> {
        let output = self.next_output();
        Box::pin(async move { replay_result(output?) })
    }
}

/// Decode a recorded `{"Ok": image}` / `{"Err": {kind, message}}` output.
fn replay_result(output: serde_json::Value) -> Result<InlineImage, TryOnError> {
    if let Some(err) = output.get("Err") {
        return Err(replay_error(err));
    }
    let ok = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(ok)
        .map_err(|e| TryOnError::Config(format!("Malformed cassette output: {e}")))
}

/// Rebuild the recorded error variant. A bare string is read as an API
/// error without a status.
fn replay_error(err: &serde_json::Value) -> TryOnError {
    let message = err
        .get("message")
        .or(Some(err))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("replayed error")
        .to_string();
    match err.get("kind").and_then(serde_json::Value::as_str) {
        Some("no_image") => TryOnError::NoImageReturned(message),
        Some("api") => {
            let status = err
                .get("status")
                .and_then(serde_json::Value::as_u64)
                .and_then(|s| u16::try_from(s).ok())
                .unwrap_or(0);
            TryOnError::Api { status, message }
        }
        _ => TryOnError::Api { status: 0, message },
    }
}
