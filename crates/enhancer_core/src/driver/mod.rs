//! Batch driver for coordinating per-layer processing.
//!
//! This module provides the infrastructure for running the selection
//! through the external tool. Each selected layer runs a sequence of
//! steps that validate, execute, and record their results.
//!
//! # Architecture
//!
//! ```text
//! BatchDriver
//!     └── per selected layer: LayerPipeline
//!             ├── Step: Build   (assemble command tokens)
//!             ├── Step: Invoke  (run the external tool, blocking)
//!             └── Step: Import  (place the result in the project)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use enhancer_core::driver::BatchDriver;
//!
//! let driver = BatchDriver::new(settings, host);
//! let results = driver.run(&options)?;
//! for result in results {
//!     println!("{}: {:?}", result.layer_name, result.status);
//! }
//! ```

mod batch;
mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use batch::BatchDriver;
pub use errors::{BatchError, BatchResult, StepError, StepResult};
pub use pipeline::{CancelHandle, LayerPipeline, PipelineRunResult};
pub use step::LayerStep;
pub use steps::{fill_scale, BuildStep, ImportStep, InvokeStep};
pub use types::{
    BuildOutput, Context, ImportOutput, InvokeOutput, LayerState, ProgressCallback, SharedHost,
    StepOutcome,
};

/// Create the standard per-layer pipeline with all steps in order.
///
/// The standard pipeline executes these steps:
/// 1. Build - assemble the external tool command line
/// 2. Invoke - run the tool over the layer's source (blocking)
/// 3. Import - import the produced file and place it before the source
pub fn create_standard_pipeline() -> LayerPipeline {
    LayerPipeline::new()
        .with_step(BuildStep::new())
        .with_step(InvokeStep::new())
        .with_step(ImportStep::new())
}
