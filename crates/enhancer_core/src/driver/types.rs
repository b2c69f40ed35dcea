//! Core types for the batch driver.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::host::HostProject;
use crate::logging::JobLogger;
use crate::models::{LayerJob, OutputTarget, ProcessingOptions};

/// Progress callback type for reporting per-layer progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Shared, lockable handle to the host project.
pub type SharedHost = Arc<Mutex<dyn HostProject>>;

/// Read-only context passed to layer steps.
///
/// Contains the layer snapshot and shared resources that steps can read
/// but not modify. Mutable results go in `LayerState`. The host project
/// handle is the one exception - import steps mutate the project through
/// its lock.
pub struct Context {
    /// The layer being processed.
    pub layer: LayerJob,
    /// Where the processed file lands.
    pub target: OutputTarget,
    /// Option snapshot for this batch run.
    pub options: ProcessingOptions,
    /// Settings snapshot for this batch run.
    pub settings: Settings,
    /// Per-layer logger.
    pub logger: Arc<JobLogger>,
    /// Host project handle.
    pub host: SharedHost,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a new context for a layer.
    pub fn new(
        layer: LayerJob,
        target: OutputTarget,
        options: ProcessingOptions,
        settings: Settings,
        logger: Arc<JobLogger>,
        host: SharedHost,
    ) -> Self {
        Self {
            layer,
            target,
            options,
            settings,
            logger,
            host,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }

    /// Full path of this layer's output file.
    pub fn output_path(&self) -> PathBuf {
        self.target.path()
    }
}

/// Mutable layer state that accumulates results from the steps.
///
/// This is the "write-once manifest" - steps can add new data but
/// should not overwrite existing values. Each step's output is stored
/// in its own section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerState {
    /// Layer display name.
    pub layer_name: String,
    /// When processing of this layer started.
    pub started_at: Option<String>,
    /// Build results (from Build step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildOutput>,
    /// Invocation results (from Invoke step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoke: Option<InvokeOutput>,
    /// Import results (from Import step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportOutput>,
}

impl LayerState {
    /// Create a new layer state.
    pub fn new(layer_name: impl Into<String>) -> Self {
        Self {
            layer_name: layer_name.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if the command has been built.
    pub fn has_build(&self) -> bool {
        self.build.is_some()
    }

    /// Check if the tool has been invoked.
    pub fn has_invocation(&self) -> bool {
        self.invoke.is_some()
    }

    /// Check if the result was imported.
    pub fn has_import(&self) -> bool {
        self.import.is_some()
    }
}

/// Output from the Build step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutput {
    /// Ordered tokens handed to the process runner.
    pub tokens: Vec<String>,
    /// Rendered command line (for logs and diagnostics).
    pub command_line: String,
}

/// Output from the Invoke step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeOutput {
    /// External tool exit code.
    pub exit_code: i32,
}

/// Output from the Import step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutput {
    /// Path of the imported file.
    pub output_path: PathBuf,
    /// Pixel width of the imported footage.
    pub width: u32,
    /// Pixel height of the imported footage.
    pub height: u32,
    /// Non-uniform scale applied to fill the composition (upscale jobs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
}

/// Result of executing a layer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (preconditions not met, but not an error).
    Skipped(String),
}
