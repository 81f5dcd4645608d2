//! Core data layer for trx: transcript segmentation, tool block decoding,
//! session model, and configuration.
//!
//! Everything here is UI-free. The segmenter and decoders are pure functions
//! of the input text; sessions and config are plain serde types.

pub mod config;
pub mod session;
pub mod trace;
pub mod transcript;
