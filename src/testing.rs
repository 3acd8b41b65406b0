//! In-memory generator for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::TryOnError;
use crate::ports::generator::{GenerateFuture, GenerationRequest, ImageGenerator, InlineImage};

/// Answers calls from a queue of canned results and keeps every request.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<InlineImage, TryOnError>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<InlineImage, TryOnError>>) -> Self {
        Self { responses: Mutex::new(responses.into()), requests: Arc::default() }
    }

    /// Handle on the captured requests that outlives the boxed generator.
    pub fn requests(&self) -> Arc<Mutex<Vec<GenerationRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl ImageGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted generator ran out of responses");
        Box::pin(async move { next })
    }
}

pub fn image(data: &str) -> InlineImage {
    InlineImage::new("image/jpeg", data)
}
