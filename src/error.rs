//! Unified error type for tryon.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running a try-on session.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// A local image file could not be read.
    #[error("Failed to read image {}: {source}", path.display())]
    Read {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The model API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The model answered without an image part.
    #[error("{0}")]
    NoImageReturned(String),

    /// An edit was requested before any look was generated.
    #[error("No look to edit yet. Generate a try-on first.")]
    NoActiveLook,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = TryOnError::Read {
            path: PathBuf::from("/tmp/person.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/person.jpg"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn no_image_message_is_passed_through() {
        let err = TryOnError::NoImageReturned("No remix image generated.".into());
        assert_eq!(err.to_string(), "No remix image generated.");
    }

    #[test]
    fn api_error_includes_status() {
        let err = TryOnError::Api { status: 429, message: "quota".into() };
        assert_eq!(err.to_string(), "API error (429): quota");
    }
}
