//! Invoke step - runs the external tool and blocks until it exits.

use std::path::Path;

use crate::driver::errors::{StepError, StepResult};
use crate::driver::step::LayerStep;
use crate::driver::types::{Context, InvokeOutput, LayerState, StepOutcome};
use crate::runner::ToolRunner;

/// Invoke step for executing the external tool.
///
/// Blocks the batch until the tool exits; there is no timeout and no
/// mid-invocation cancellation.
pub struct InvokeStep;

impl InvokeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvokeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStep for InvokeStep {
    fn name(&self) -> &str {
        "Invoke"
    }

    fn description(&self) -> &str {
        "Run the external tool over the layer's source"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let folder = &ctx.settings.tool.folder;
        if folder.is_empty() {
            return Err(StepError::invalid_input("Tool folder is not configured"));
        }
        if !Path::new(folder).is_dir() {
            return Err(StepError::file_not_found(folder));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut LayerState) -> StepResult<StepOutcome> {
        let tokens = state
            .build
            .as_ref()
            .map(|b| b.tokens.clone())
            .ok_or_else(|| StepError::invalid_input("Build step has not run"))?;

        ctx.logger.section("Executing tool");
        ctx.report_progress(self.name(), 0, "Tool running");

        let runner = ToolRunner::from_settings(&ctx.settings.tool);
        let exit_code = runner.run(&tokens, &ctx.logger)?;

        state.invoke = Some(InvokeOutput { exit_code });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &LayerState) -> StepResult<()> {
        if !state.has_invocation() {
            return Err(StepError::invalid_output("Invocation results not recorded"));
        }
        Ok(())
    }
}
