//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Upscaling model selectable in the panel, ordered by speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpscaleModel {
    #[default]
    ShuffleCugan,
    Compact,
    UltraCompact,
    SuperUltraCompact,
    Cugan,
    #[serde(rename = "Cugan-AMD")]
    CuganAmd,
    #[serde(rename = "SwinIR")]
    SwinIr,
}

impl UpscaleModel {
    /// Get the name the external tool expects for `--upscale_method`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShuffleCugan => "ShuffleCugan",
            Self::Compact => "Compact",
            Self::UltraCompact => "UltraCompact",
            Self::SuperUltraCompact => "SuperUltraCompact",
            Self::Cugan => "Cugan",
            Self::CuganAmd => "Cugan-AMD",
            Self::SwinIr => "SwinIR",
        }
    }

    /// Get all available models.
    pub fn all() -> &'static [UpscaleModel] {
        &[
            Self::ShuffleCugan,
            Self::Compact,
            Self::UltraCompact,
            Self::SuperUltraCompact,
            Self::Cugan,
            Self::CuganAmd,
            Self::SwinIr,
        ]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this model (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }

    /// Parse from the tool-facing name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl std::fmt::Display for UpscaleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Denoise level for the Cugan family of models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CuganDenoise {
    #[default]
    #[serde(rename = "No-Denoise")]
    NoDenoise,
    Conservative,
    Denoise1x,
    Denoise2x,
}

impl CuganDenoise {
    /// Get the display/tool-facing name for this level.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoDenoise => "No-Denoise",
            Self::Conservative => "Conservative",
            Self::Denoise1x => "Denoise1x",
            Self::Denoise2x => "Denoise2x",
        }
    }

    /// Get all available levels.
    pub fn all() -> &'static [CuganDenoise] {
        &[
            Self::NoDenoise,
            Self::Conservative,
            Self::Denoise1x,
            Self::Denoise2x,
        ]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this level (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }
}

impl std::fmt::Display for CuganDenoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which integration of the external tool to invoke.
///
/// The packaged executable takes `--flag value` pairs; the older
/// script-based entry point takes single-dash flags with a reduced
/// option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolVariant {
    /// Packaged executable (`main` binary in the tool folder).
    #[default]
    Executable,
    /// Script entry point driven through an interpreter.
    Script,
}

impl ToolVariant {
    /// Get the display name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Executable => "Executable",
            Self::Script => "Script",
        }
    }

    /// Get all available variants.
    pub fn all() -> &'static [ToolVariant] {
        &[Self::Executable, Self::Script]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this variant (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }
}

impl std::fmt::Display for ToolVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of a single layer within a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerStatus {
    /// Processed and imported back into the project.
    Imported,
    /// External tool ran but the result was not imported.
    ProcessedOnly,
    /// Layer failed with an error.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_index_round_trip() {
        for model in UpscaleModel::all() {
            assert_eq!(UpscaleModel::from_index(model.to_index()), *model);
        }
    }

    #[test]
    fn model_out_of_range_index_falls_back() {
        assert_eq!(UpscaleModel::from_index(999), UpscaleModel::ShuffleCugan);
    }

    #[test]
    fn model_names_match_tool_spelling() {
        assert_eq!(UpscaleModel::CuganAmd.name(), "Cugan-AMD");
        assert_eq!(UpscaleModel::SwinIr.name(), "SwinIR");
        assert_eq!(UpscaleModel::from_name("compact"), Some(UpscaleModel::Compact));
        assert_eq!(UpscaleModel::from_name("nope"), None);
    }

    #[test]
    fn denoise_serializes_display_name() {
        let json = serde_json::to_string(&CuganDenoise::NoDenoise).unwrap();
        assert_eq!(json, "\"No-Denoise\"");
    }

    #[test]
    fn tool_variant_serializes_lowercase() {
        let json = serde_json::to_string(&ToolVariant::Script).unwrap();
        assert_eq!(json, "\"script\"");
    }
}
