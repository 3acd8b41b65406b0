//! Adapter implementations for port traits.
//!
//! - `live/` - Real API implementations
//! - `recording/` - Record interactions to cassettes
//! - `replaying/` - Replay interactions from cassettes

pub mod live;
pub mod recording;
pub mod replaying;

/// Port name used for generator interactions in cassettes.
pub(crate) const GENERATOR_PORT: &str = "generator";
/// Method name used for generator interactions in cassettes.
pub(crate) const GENERATE_METHOD: &str = "generate_content";
