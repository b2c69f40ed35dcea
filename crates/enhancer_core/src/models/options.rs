//! Processing option snapshot read once at batch start.

use serde::{Deserialize, Serialize};

use super::enums::{CuganDenoise, UpscaleModel};

/// The full set of processing toggles and parameters for one batch run.
///
/// The driver reads this once when a run starts; later panel edits do not
/// affect layers already in flight. Numeric fields come from text inputs
/// and are passed to the external tool verbatim - range checking beyond
/// "positive integer" is the tool's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Drop duplicate frames before other processing.
    #[serde(default)]
    pub deduplicate: bool,

    /// Upscale with the selected model.
    #[serde(default)]
    pub upscale: bool,

    /// Interpolate intermediate frames.
    #[serde(default)]
    pub interpolate: bool,

    /// Contrast-adaptive sharpening pass.
    #[serde(default)]
    pub sharpen: bool,

    /// Background/foreground segmentation pass.
    #[serde(default)]
    pub segment: bool,

    /// Model used when `upscale` is set.
    #[serde(default)]
    pub upscale_model: UpscaleModel,

    /// Denoise level for the Cugan models.
    #[serde(default)]
    pub cugan_denoise: CuganDenoise,

    /// Frame multiplication factor for interpolation.
    #[serde(default = "default_factor")]
    pub interpolate_factor: u32,

    /// Resolution multiplication factor for upscaling.
    #[serde(default = "default_factor")]
    pub upscale_factor: u32,

    /// Sharpening intensity in percent (0-100).
    #[serde(default = "default_sharpen_intensity")]
    pub sharpen_intensity: u32,

    /// Worker threads requested from the external tool.
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Run the tool's models in half precision.
    #[serde(default = "default_true")]
    pub half_precision: bool,
}

fn default_factor() -> u32 {
    2
}

fn default_sharpen_intensity() -> u32 {
    50
}

fn default_threads() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            deduplicate: false,
            upscale: false,
            interpolate: false,
            sharpen: false,
            segment: false,
            upscale_model: UpscaleModel::default(),
            cugan_denoise: CuganDenoise::default(),
            interpolate_factor: default_factor(),
            upscale_factor: default_factor(),
            sharpen_intensity: default_sharpen_intensity(),
            threads: default_threads(),
            half_precision: true,
        }
    }
}

impl ProcessingOptions {
    /// Whether any processing feature is enabled.
    ///
    /// A run with nothing enabled is rejected before any side effects.
    pub fn has_enabled_feature(&self) -> bool {
        self.deduplicate || self.upscale || self.interpolate || self.sharpen || self.segment
    }

    /// Options for a segmentation-only run (the panel's Segment action).
    pub fn segment_only() -> Self {
        Self {
            segment: true,
            ..Self::default()
        }
    }

    /// Enable segmentation on an existing snapshot.
    pub fn with_segment(mut self, segment: bool) -> Self {
        self.segment = segment;
        self
    }
}
