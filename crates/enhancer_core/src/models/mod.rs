//! Data models for Clip Enhancer.
//!
//! This module contains all core data structures used throughout the crate:
//! - Enums for models, denoise levels, tool variants, layer status
//! - Processing option snapshots
//! - Per-layer job structures (layer snapshots, output targets, results)

mod enums;
mod jobs;
mod options;

// Re-export all public types
pub use enums::{CuganDenoise, LayerStatus, ToolVariant, UpscaleModel};
pub use jobs::{LayerJob, LayerResult, OutputTarget};
pub use options::ProcessingOptions;
