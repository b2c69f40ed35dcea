//! Per-layer pipeline steps.
//!
//! Each selected layer runs through these steps in order:
//! 1. Build - assemble the tool command line
//! 2. Invoke - run the external tool (blocking)
//! 3. Import - bring the produced file back into the project

mod build;
mod import;
mod invoke;

pub use build::BuildStep;
pub use import::{fill_scale, ImportStep};
pub use invoke::InvokeStep;
