//! Build step - constructs the external tool's argument list.

use crate::command::build_tokens;
use crate::driver::errors::{StepError, StepResult};
use crate::driver::step::LayerStep;
use crate::driver::types::{BuildOutput, Context, LayerState, StepOutcome};
use crate::runner::ToolRunner;

/// Build step for assembling command tokens.
///
/// Pure translation from the layer snapshot and option snapshot to the
/// ordered token list; nothing is executed here.
pub struct BuildStep;

impl BuildStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildStep {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStep for BuildStep {
    fn name(&self) -> &str {
        "Build"
    }

    fn description(&self) -> &str {
        "Assemble the external tool command line"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.layer.source_path.as_os_str().is_empty() {
            return Err(StepError::invalid_input("Layer has no source file"));
        }
        if ctx.target.file_name.is_empty() {
            return Err(StepError::invalid_input("Output target has no file name"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut LayerState) -> StepResult<StepOutcome> {
        let tokens = build_tokens(
            ctx.settings.tool.variant,
            &ctx.layer,
            &ctx.target,
            &ctx.options,
        );

        let runner = ToolRunner::from_settings(&ctx.settings.tool);
        let command_line = runner.command_line(&tokens);

        ctx.logger
            .info(&format!("Output: {}", ctx.output_path().display()));

        if ctx.settings.logging.show_command_pretty {
            ctx.logger.log_command_pretty(&tokens);
        }
        if ctx.settings.logging.show_command_json {
            ctx.logger.log_command_json(&tokens);
        }

        state.build = Some(BuildOutput {
            tokens,
            command_line,
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &LayerState) -> StepResult<()> {
        let build = state
            .build
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Build results not recorded"))?;

        if build.tokens.is_empty() {
            return Err(StepError::invalid_output("Built command has no tokens"));
        }

        Ok(())
    }
}
