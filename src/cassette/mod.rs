//! Record/replay of generator calls for deterministic, offline runs.

pub mod format;
pub mod loader;
pub mod recorder;
pub mod replayer;
