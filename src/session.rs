//! Session state: the current look, its edit history, and the drivers that
//! turn gateway results into state transitions.
//!
//! State only changes after a gateway call succeeds. A failed call records
//! its message in [`Session::error`], clears the loading flag and leaves the
//! images and history exactly as they were.

use crate::error::TryOnError;
use crate::gateway::Gateway;
use crate::history::{History, OutfitLayer};
use crate::ports::InlineImage;

const INITIAL_MESSAGE: &str = "Weaving fabric and fitting model...";
const RESTAGE_MESSAGE: &str = "Preparing your model...";
const TRY_ON_MESSAGE: &str = "Fitting the new garment...";
const POSE_MESSAGE: &str = "Striking a new pose...";
const REMIX_MESSAGE: &str = "Remixing the look...";

/// Where the user is in the flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for photos.
    #[default]
    Landing,
    /// The first look is being generated.
    Processing,
    /// A look exists and can be edited.
    DressingRoom,
}

/// One user's try-on session.
#[derive(Debug, Default)]
pub struct Session {
    phase: Phase,
    user_original_image: Option<InlineImage>,
    generated_model_image: Option<InlineImage>,
    current_image: Option<InlineImage>,
    history: History,
    loading: bool,
    loading_message: String,
    error: Option<String>,
}

impl Session {
    /// Start a fresh session on the landing phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The person photo the first look was generated from.
    #[must_use]
    pub fn user_original_image(&self) -> Option<&InlineImage> {
        self.user_original_image.as_ref()
    }

    /// The first generated look; undo never goes below it.
    #[must_use]
    pub fn generated_model_image(&self) -> Option<&InlineImage> {
        self.generated_model_image.as_ref()
    }

    /// The look currently on display.
    #[must_use]
    pub fn current_image(&self) -> Option<&InlineImage> {
        self.current_image.as_ref()
    }

    /// Applied edits, oldest first.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether a generation call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// What the in-flight call is doing; empty when idle.
    #[must_use]
    pub fn loading_message(&self) -> &str {
        &self.loading_message
    }

    /// Message of the last failure, cleared when the next call starts.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether [`undo`](Self::undo) would remove a layer.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Push a new layer and display its image.
    pub fn apply(&mut self, image: InlineImage, description: impl Into<String>) {
        let layer = OutfitLayer::new(image, description);
        tracing::debug!(
            id = %layer.id(),
            description = layer.description(),
            at = %layer.timestamp(),
            "applied layer"
        );
        self.current_image = Some(layer.image().clone());
        self.history.push(layer);
    }

    /// Remove the latest layer. Returns `false` and changes nothing when the
    /// history is empty.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        if let Some(layer) = self.history.pop() {
            tracing::debug!(id = %layer.id(), description = layer.description(), "undid layer");
        }

        self.current_image = if let Some(previous) = self.history.last() {
            Some(previous.image().clone())
        } else {
            self.generated_model_image.clone()
        };
        true
    }

    /// Drop everything and go back to the landing phase.
    pub fn reset(&mut self) {
        tracing::debug!(layers = self.history.len(), "session reset");
        *self = Self::default();
    }

    /// Generate the first look by dressing `person` in `garment`.
    ///
    /// On success the result becomes the base image, any previous history is
    /// discarded and the phase moves to [`Phase::DressingRoom`].
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the session is left as it was apart from
    /// [`error`](Self::error).
    pub async fn initial_generate(
        &mut self,
        gateway: &Gateway,
        person: InlineImage,
        garment: &InlineImage,
    ) -> Result<(), TryOnError> {
        self.begin(INITIAL_MESSAGE);
        let previous_phase = std::mem::replace(&mut self.phase, Phase::Processing);

        match gateway.generate_try_on(&person, garment).await {
            Ok(look) => {
                self.establish(person, look);
                Ok(())
            }
            Err(e) => {
                self.phase = previous_phase;
                Err(self.fail(e))
            }
        }
    }

    /// Like [`initial_generate`](Self::initial_generate), but first re-renders
    /// the person as a standing model and dresses that instead.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error; the session is left as it was apart
    /// from [`error`](Self::error).
    pub async fn initial_generate_restaged(
        &mut self,
        gateway: &Gateway,
        person: InlineImage,
        garment: &InlineImage,
    ) -> Result<(), TryOnError> {
        self.begin(RESTAGE_MESSAGE);
        let previous_phase = std::mem::replace(&mut self.phase, Phase::Processing);

        let staged = match gateway.generate_initial_model(&person).await {
            Ok(staged) => staged,
            Err(e) => {
                self.phase = previous_phase;
                return Err(self.fail(e));
            }
        };

        self.loading_message = INITIAL_MESSAGE.to_string();
        match gateway.generate_try_on(&staged, garment).await {
            Ok(look) => {
                self.establish(person, look);
                Ok(())
            }
            Err(e) => {
                self.phase = previous_phase;
                Err(self.fail(e))
            }
        }
    }

    /// Dress the current look in another garment.
    ///
    /// # Errors
    ///
    /// [`TryOnError::NoActiveLook`] before the first look, otherwise the
    /// gateway error. State is unchanged apart from [`error`](Self::error).
    pub async fn try_on(
        &mut self,
        gateway: &Gateway,
        garment: &InlineImage,
        label: &str,
    ) -> Result<(), TryOnError> {
        let model = self.active_look()?;
        self.begin(TRY_ON_MESSAGE);
        let result = gateway.generate_try_on(&model, garment).await;
        self.settle(result, format!("Try-on: {label}"))
    }

    /// Re-pose the current look.
    ///
    /// # Errors
    ///
    /// [`TryOnError::NoActiveLook`] before the first look, otherwise the
    /// gateway error. State is unchanged apart from [`error`](Self::error).
    pub async fn change_pose(
        &mut self,
        gateway: &Gateway,
        pose: &str,
        label: &str,
    ) -> Result<(), TryOnError> {
        let model = self.active_look()?;
        self.begin(POSE_MESSAGE);
        let result = gateway.generate_pose_variation(&model, pose).await;
        self.settle(result, format!("Pose: {label}"))
    }

    /// Apply a stylistic remix to the current look.
    ///
    /// # Errors
    ///
    /// [`TryOnError::NoActiveLook`] before the first look, otherwise the
    /// gateway error. State is unchanged apart from [`error`](Self::error).
    pub async fn remix(
        &mut self,
        gateway: &Gateway,
        instruction: &str,
        label: &str,
    ) -> Result<(), TryOnError> {
        let model = self.active_look()?;
        self.begin(REMIX_MESSAGE);
        let result = gateway.generate_remix(&model, instruction).await;
        self.settle(result, format!("Remix: {label}"))
    }

    fn active_look(&mut self) -> Result<InlineImage, TryOnError> {
        if let Some(image) = &self.current_image {
            return Ok(image.clone());
        }
        Err(self.fail(TryOnError::NoActiveLook))
    }

    fn establish(&mut self, person: InlineImage, look: InlineImage) {
        self.user_original_image = Some(person);
        self.generated_model_image = Some(look.clone());
        self.current_image = Some(look);
        self.history.clear();
        self.phase = Phase::DressingRoom;
        self.finish();
    }

    fn settle(
        &mut self,
        result: Result<InlineImage, TryOnError>,
        description: String,
    ) -> Result<(), TryOnError> {
        match result {
            Ok(image) => {
                self.apply(image, description);
                self.finish();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn begin(&mut self, message: &str) {
        tracing::info!("{message}");
        self.loading = true;
        self.loading_message = message.to_string();
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
        self.loading_message.clear();
    }

    fn fail(&mut self, error: TryOnError) -> TryOnError {
        tracing::error!(error = %error, "session operation failed");
        self.finish();
        self.error = Some(error.to_string());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{image, ScriptedGenerator};

    fn gateway(responses: Vec<Result<InlineImage, TryOnError>>) -> Gateway {
        Gateway::new(Box::new(ScriptedGenerator::new(responses)), "gemini-2.5-flash-image")
    }

    fn api_error() -> TryOnError {
        TryOnError::Api { status: 500, message: "boom".into() }
    }

    async fn dressed(responses: Vec<Result<InlineImage, TryOnError>>) -> (Session, Gateway) {
        let mut all = vec![Ok(image("BASE"))];
        all.extend(responses);
        let gateway = gateway(all);
        let mut session = Session::new();
        session.initial_generate(&gateway, image("PERSON"), &image("SHIRT")).await.unwrap();
        (session, gateway)
    }

    fn assert_canonical_empty(session: &Session) {
        assert_eq!(session.phase(), Phase::Landing);
        assert!(session.history().is_empty());
        assert!(session.user_original_image().is_none());
        assert!(session.generated_model_image().is_none());
        assert!(session.current_image().is_none());
        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.loading_message(), "");
        assert!(!session.can_undo());
    }

    #[test]
    fn new_session_is_canonical_empty() {
        assert_canonical_empty(&Session::new());
    }

    #[test]
    fn apply_tracks_count_and_latest_image() {
        let mut session = Session::new();
        for (i, data) in ["AAAA", "BBBB", "CCCC"].iter().enumerate() {
            session.apply(image(data), format!("step {i}"));
            assert_eq!(session.history().len(), i + 1);
            assert_eq!(session.current_image().unwrap().data, *data);
        }
    }

    #[test]
    fn undo_inverts_apply() {
        let mut session = Session::new();
        session.apply(image("AAAA"), "first");
        let before = session.current_image().cloned();

        session.apply(image("BBBB"), "second");
        assert!(session.undo());
        assert_eq!(session.current_image().cloned(), before);
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut session = Session::new();
        assert!(!session.can_undo());
        assert!(!session.undo());
        assert!(!session.can_undo());
        assert_canonical_empty(&session);
    }

    #[tokio::test]
    async fn worked_example_falls_back_to_generated_model() {
        let (mut session, _gateway) = dressed(vec![]).await;
        assert_eq!(session.phase(), Phase::DressingRoom);
        assert_eq!(session.current_image().unwrap().data, "BASE");

        session.apply(image("AAAA"), "tryon");
        session.apply(image("BBBB"), "pose1");
        let labels: Vec<&str> = session.history().iter().map(OutfitLayer::description).collect();
        assert_eq!(labels, ["tryon", "pose1"]);
        assert_eq!(session.current_image().unwrap().data, "BBBB");

        assert!(session.undo());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current_image().unwrap().data, "AAAA");

        assert!(session.undo());
        assert!(session.history().is_empty());
        assert_eq!(session.current_image(), session.generated_model_image());
        assert_ne!(session.current_image(), session.user_original_image());

        assert!(!session.undo());
        assert_eq!(session.current_image().unwrap().data, "BASE");
    }

    #[tokio::test]
    async fn reset_from_any_state_is_canonical() {
        let mut session = Session::new();
        session.reset();
        assert_canonical_empty(&session);

        let (mut session, gateway) = dressed(vec![Ok(image("POSE")), Err(api_error())]).await;
        session.change_pose(&gateway, "walking", "Walking").await.unwrap();
        let _ = session.remix(&gateway, "neon", "Neon").await;
        assert!(session.error().is_some());

        session.reset();
        assert_canonical_empty(&session);
    }

    #[tokio::test]
    async fn initial_generate_sets_base_and_phase() {
        let (session, _gateway) = dressed(vec![]).await;
        assert_eq!(session.user_original_image().unwrap().data, "PERSON");
        assert_eq!(session.generated_model_image().unwrap().data, "BASE");
        assert!(session.history().is_empty());
        assert!(!session.is_loading());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn failed_initial_generate_stays_on_landing() {
        let gateway = gateway(vec![Err(api_error())]);
        let mut session = Session::new();

        let err = session.initial_generate(&gateway, image("P"), &image("G")).await.unwrap_err();
        assert!(matches!(err, TryOnError::Api { status: 500, .. }));
        assert_eq!(session.phase(), Phase::Landing);
        assert!(session.current_image().is_none());
        assert!(session.user_original_image().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("API error (500): boom"));
    }

    #[tokio::test]
    async fn restaged_generation_dresses_the_staged_model() {
        let generator = ScriptedGenerator::new(vec![Ok(image("STAGED")), Ok(image("BASE"))]);
        let requests = generator.requests();
        let gateway = Gateway::new(Box::new(generator), "gemini-2.5-flash-image");
        let mut session = Session::new();

        session
            .initial_generate_restaged(&gateway, image("PERSON"), &image("SHIRT"))
            .await
            .unwrap();
        assert_eq!(session.current_image().unwrap().data, "BASE");
        assert_eq!(session.user_original_image().unwrap().data, "PERSON");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].parts[0],
            crate::ports::ContentPart::InlineData(image("STAGED"))
        );
    }

    #[tokio::test]
    async fn failed_edit_leaves_history_and_image_untouched() {
        let (mut session, gateway) = dressed(vec![
            Ok(image("POSE")),
            Err(TryOnError::NoImageReturned("No image in model response.".into())),
        ])
        .await;
        session.change_pose(&gateway, "sitting", "Sitting").await.unwrap();
        let history_before = session.history().clone();
        let image_before = session.current_image().cloned();

        let err = session.remix(&gateway, "neon", "Neon").await.unwrap_err();
        assert!(matches!(err, TryOnError::NoImageReturned(_)));
        assert_eq!(session.history(), &history_before);
        assert_eq!(session.current_image().cloned(), image_before);
        assert_eq!(session.error(), Some("No remix image generated."));
        assert!(!session.is_loading());
        assert_eq!(session.phase(), Phase::DressingRoom);
    }

    #[tokio::test]
    async fn successful_call_clears_previous_error() {
        let (mut session, gateway) =
            dressed(vec![Err(api_error()), Ok(InlineImage::new("image/png", "GARM"))]).await;
        assert!(session.try_on(&gateway, &image("HAT"), "hat.jpg").await.is_err());
        assert!(session.error().is_some());

        session.try_on(&gateway, &image("HAT"), "hat.jpg").await.unwrap();
        assert!(session.error().is_none());
        assert_eq!(session.history().last().unwrap().description(), "Try-on: hat.jpg");
        assert_eq!(session.current_image().unwrap().mime_type, "image/png");
    }

    #[tokio::test]
    async fn edits_need_a_look_first() {
        let gateway = gateway(vec![]);
        let mut session = Session::new();

        let err = session.change_pose(&gateway, "walking", "Walking").await.unwrap_err();
        assert!(matches!(err, TryOnError::NoActiveLook));
        assert!(session.error().is_some());
        assert!(session.history().is_empty());
        assert_eq!(session.phase(), Phase::Landing);
    }

    #[tokio::test]
    async fn edits_build_on_the_current_look() {
        let generator = ScriptedGenerator::new(vec![
            Ok(image("BASE")),
            Ok(image("POSED")),
            Ok(image("REMIXED")),
        ]);
        let requests = generator.requests();
        let gateway = Gateway::new(Box::new(generator), "gemini-2.5-flash-image");
        let mut session = Session::new();
        session.initial_generate(&gateway, image("PERSON"), &image("SHIRT")).await.unwrap();

        session.change_pose(&gateway, "walking", "Walking").await.unwrap();
        session.remix(&gateway, "sunset light", "Sunset").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[1].parts[0], crate::ports::ContentPart::InlineData(image("BASE")));
        assert_eq!(requests[2].parts[0], crate::ports::ContentPart::InlineData(image("POSED")));
        assert_eq!(session.current_image().unwrap().data, "REMIXED");
        assert_eq!(session.history().len(), 2);
    }
}
