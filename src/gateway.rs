//! The four try-on operations against the generative model.
//!
//! Every operation shares [`prompts::SYSTEM_INSTRUCTION`] and goes through
//! [`Gateway::build_request`], so the identity-preservation rules live in one
//! place. Input images are always sent as `image/jpeg` with any data-URL
//! prefix stripped; the returned image keeps whatever MIME type the model
//! reported.

use crate::error::TryOnError;
use crate::ports::generator::{ContentPart, GenerationRequest, ImageGenerator, InlineImage};
use crate::prompts;

/// MIME type attached to every image sent to the model.
const UPLOAD_MIME: &str = "image/jpeg";

/// One gateway operation with its inputs.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Re-render the uploaded person as a standing model.
    InitialModel {
        /// The uploaded person photo.
        person: &'a InlineImage,
    },
    /// Dress the model in a garment.
    TryOn {
        /// The current look.
        model: &'a InlineImage,
        /// The garment photo.
        garment: &'a InlineImage,
    },
    /// Change the pose, keeping identity and outfit.
    PoseVariation {
        /// The current look.
        model: &'a InlineImage,
        /// Pose description.
        pose: &'a str,
    },
    /// Apply a stylistic edit.
    Remix {
        /// The current look.
        model: &'a InlineImage,
        /// Remix instruction.
        instruction: &'a str,
    },
}

impl Operation<'_> {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitialModel { .. } => "initial_model",
            Self::TryOn { .. } => "try_on",
            Self::PoseVariation { .. } => "pose_variation",
            Self::Remix { .. } => "remix",
        }
    }

    fn missing_image_message(&self) -> &'static str {
        match self {
            Self::InitialModel { .. } => "No image generated.",
            Self::TryOn { .. } => "No try-on image generated.",
            Self::PoseVariation { .. } => "No pose variation generated.",
            Self::Remix { .. } => "No remix image generated.",
        }
    }

    fn images(&self) -> Vec<&InlineImage> {
        match *self {
            Self::InitialModel { person } => vec![person],
            Self::TryOn { model, garment } => vec![model, garment],
            Self::PoseVariation { model, .. } | Self::Remix { model, .. } => vec![model],
        }
    }

    fn instruction(&self) -> String {
        match *self {
            Self::InitialModel { .. } => prompts::initial_model(),
            Self::TryOn { .. } => prompts::try_on(),
            Self::PoseVariation { pose, .. } => prompts::pose_variation(pose),
            Self::Remix { instruction, .. } => prompts::remix(instruction),
        }
    }
}

/// Issues generation requests for a single model.
pub struct Gateway {
    generator: Box<dyn ImageGenerator>,
    model: String,
}

impl Gateway {
    /// Create a gateway over `generator` targeting `model`.
    pub fn new(generator: Box<dyn ImageGenerator>, model: impl Into<String>) -> Self {
        Self { generator, model: model.into() }
    }

    /// The model identifier requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request for an operation: images first, then the template.
    #[must_use]
    pub fn build_request(&self, operation: &Operation<'_>) -> GenerationRequest {
        let mut parts: Vec<ContentPart> = operation
            .images()
            .into_iter()
            .map(|image| ContentPart::InlineData(InlineImage::new(UPLOAD_MIME, &image.data)))
            .collect();
        parts.push(ContentPart::Text(operation.instruction()));

        GenerationRequest {
            model: self.model.clone(),
            system_instruction: prompts::SYSTEM_INSTRUCTION.to_string(),
            parts,
        }
    }

    /// Run one operation and return the generated image.
    ///
    /// # Errors
    ///
    /// Returns [`TryOnError::NoImageReturned`] when the model answers without
    /// an image, or the transport/API error unchanged.
    pub async fn run(&self, operation: Operation<'_>) -> Result<InlineImage, TryOnError> {
        let request = self.build_request(&operation);
        tracing::info!(operation = operation.name(), model = %self.model, "requesting generation");

        match self.generator.generate(&request).await {
            Ok(image) => {
                tracing::debug!(
                    operation = operation.name(),
                    mime_type = %image.mime_type,
                    "generation returned an image"
                );
                Ok(image)
            }
            Err(TryOnError::NoImageReturned(detail)) => {
                tracing::error!(operation = operation.name(), %detail, "no image returned");
                Err(TryOnError::NoImageReturned(operation.missing_image_message().to_string()))
            }
            Err(e) => {
                tracing::error!(operation = operation.name(), error = %e, "generation failed");
                Err(e)
            }
        }
    }

    /// Re-render the uploaded person as a standing model with an excited
    /// expression.
    ///
    /// # Errors
    ///
    /// See [`Gateway::run`].
    pub async fn generate_initial_model(
        &self,
        person: &InlineImage,
    ) -> Result<InlineImage, TryOnError> {
        self.run(Operation::InitialModel { person }).await
    }

    /// Composite `garment` onto the person in `model`.
    ///
    /// # Errors
    ///
    /// See [`Gateway::run`].
    pub async fn generate_try_on(
        &self,
        model: &InlineImage,
        garment: &InlineImage,
    ) -> Result<InlineImage, TryOnError> {
        self.run(Operation::TryOn { model, garment }).await
    }

    /// Re-pose the person in `model`, keeping identity and outfit.
    ///
    /// # Errors
    ///
    /// See [`Gateway::run`].
    pub async fn generate_pose_variation(
        &self,
        model: &InlineImage,
        pose: &str,
    ) -> Result<InlineImage, TryOnError> {
        self.run(Operation::PoseVariation { model, pose }).await
    }

    /// Apply a stylistic remix to `model`.
    ///
    /// # Errors
    ///
    /// See [`Gateway::run`].
    pub async fn generate_remix(
        &self,
        model: &InlineImage,
        instruction: &str,
    ) -> Result<InlineImage, TryOnError> {
        self.run(Operation::Remix { model, instruction }).await
    }
}
