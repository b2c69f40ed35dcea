//! Host project interface.
//!
//! The crate never talks to the host application directly; everything it
//! needs from the project (selected layers, composition size, importing
//! footage, setting layer properties) goes through the `HostProject`
//! trait. A panel front-end implements it against the real scripting
//! API; tests implement it in memory.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::LayerJob;

/// Errors raised by host project operations.
#[derive(Error, Debug)]
pub enum HostError {
    /// The produced file could not be imported as a project asset.
    #[error("Failed to import '{path}': {message}")]
    ImportFailed { path: String, message: String },

    /// The imported asset could not be inserted as a layer.
    #[error("Failed to insert layer: {0}")]
    InsertFailed(String),

    /// A layer property could not be written.
    #[error("Failed to set {property}: {message}")]
    PropertyFailed { property: String, message: String },
}

impl HostError {
    /// Create an import failed error.
    pub fn import_failed(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ImportFailed {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create an insert failed error.
    pub fn insert_failed(message: impl Into<String>) -> Self {
        Self::InsertFailed(message.into())
    }

    /// Create a property failed error.
    pub fn property_failed(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PropertyFailed {
            property: property.into(),
            message: message.into(),
        }
    }
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Opaque handle to a layer created in the host project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerHandle(pub u64);

/// A layer freshly imported into the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedLayer {
    /// Handle for follow-up property writes.
    pub handle: LayerHandle,
    /// Pixel width of the imported footage.
    pub width: u32,
    /// Pixel height of the imported footage.
    pub height: u32,
}

/// The host project collaborator.
///
/// Read operations snapshot project state; write operations mutate it.
/// Implementations are expected to be driven from a single thread per
/// batch run.
pub trait HostProject: Send {
    /// Snapshot of the currently selected layers, in selection order.
    fn selected_layers(&self) -> Vec<LayerJob>;

    /// Pixel dimensions of the active composition.
    fn composition_size(&self) -> (u32, u32);

    /// Whether the host allows scripts to write files and spawn processes.
    fn scripting_access_granted(&self) -> bool {
        true
    }

    /// Import `file` as a new project asset and insert it as a layer
    /// immediately before `reference` in the same composition.
    fn import_before(&mut self, file: &Path, reference: &LayerJob) -> HostResult<ImportedLayer>;

    /// Write a layer's scale property as `[x, y, z]` percentages.
    fn set_layer_scale(&mut self, layer: LayerHandle, scale: [f64; 3]) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_displays_context() {
        let err = HostError::import_failed("/out/clip_42.mp4", "file missing");
        let msg = err.to_string();
        assert!(msg.contains("/out/clip_42.mp4"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn property_error_names_property() {
        let err = HostError::property_failed("Scale", "layer deleted");
        assert!(err.to_string().contains("Scale"));
    }
}
