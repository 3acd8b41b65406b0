//! Service context that picks the generator implementation for a run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::RecordingGenerator;
use crate::adapters::replaying::ReplayingGenerator;
use crate::cassette::loader::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{Config, GEMINI_KEY_ENV};
use crate::error::TryOnError;
use crate::ports::ImageGenerator;

/// Environment variable pointing at a cassette to replay.
pub const REPLAY_ENV: &str = "TRYON_REPLAY";
/// Environment variable that turns on recording (`1` or `true`).
pub const RECORD_ENV: &str = "TRYON_REC";

/// The generator a run talks to.
pub struct ServiceContext {
    /// Generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording that must be finished once the run is over.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator still holds the recorder or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        let count = recorder.interaction_count();
        let path = recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))?;
        tracing::debug!(interactions = count, path = %path.display(), "cassette written");
        Ok(path)
    }
}

impl ServiceContext {
    /// Pick live, recording or replaying mode from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing (live/recording) or the
    /// cassette cannot be loaded (replaying).
    pub fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), TryOnError> {
        if let Ok(cassette) = std::env::var(REPLAY_ENV) {
            tracing::info!(cassette = %cassette, "replaying generator calls");
            return Ok((Self::replaying(Path::new(&cassette))?, None));
        }
        let recording = std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1");
        if recording {
            tracing::info!("recording generator calls");
            let (ctx, session) = Self::recording(config)?;
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(config)?, None))
    }

    /// Create a live context against the Gemini API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured.
    pub fn live(config: &Config) -> Result<Self, TryOnError> {
        let key = config.gemini_key().ok_or_else(|| TryOnError::MissingApiKey {
            provider: "Gemini".into(),
            env_var: GEMINI_KEY_ENV.into(),
        })?;
        Ok(Self { generator: Box::new(GeminiGenerator::new(key)) })
    }

    /// Create a live context whose calls are recorded to
    /// `.tryon/cassettes/<timestamp>/generator.cassette.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), TryOnError> {
        let live = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".tryon/cassettes")
            .join(&timestamp)
            .join("generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-tryon"),
            commit_hash(),
        )));

        let generator = RecordingGenerator::new(live.generator, Arc::clone(&recorder));
        Ok((Self { generator: Box::new(generator) }, RecordingSession { recorder }))
    }

    /// Create a context that replays a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, TryOnError> {
        let replayer = load_cassette(path)
            .map_err(|e| TryOnError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = ReplayingGenerator::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { generator: Box::new(generator) })
    }
}

/// Current git commit hash, or `"unknown"`.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
