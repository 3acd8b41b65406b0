//! Adapters that talk to real model APIs.

pub mod gemini;
