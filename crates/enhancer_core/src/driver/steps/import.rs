//! Import step - brings the produced file back into the host project.

use crate::driver::errors::{StepError, StepResult};
use crate::driver::step::LayerStep;
use crate::driver::types::{Context, ImportOutput, LayerState, StepOutcome};

/// Import step for placing the tool's output next to its source layer.
///
/// Imports the produced file as a new project asset, inserts it as a
/// layer immediately before the source layer, and for upscale jobs
/// rescales the new layer to fill the composition.
pub struct ImportStep;

impl ImportStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImportStep {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale factors that stretch imported footage over the composition.
///
/// Horizontal and vertical factors are independent; no aspect-ratio
/// correction or letterboxing is applied.
pub fn fill_scale(comp: (u32, u32), imported: (u32, u32)) -> [f64; 3] {
    let scale_x = comp.0 as f64 / imported.0 as f64 * 100.0;
    let scale_y = comp.1 as f64 / imported.1 as f64 * 100.0;
    [scale_x, scale_y, 100.0]
}

impl LayerStep for ImportStep {
    fn name(&self) -> &str {
        "Import"
    }

    fn description(&self) -> &str {
        "Import the produced file and place it before the source layer"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.target.folder.as_os_str().is_empty() {
            return Err(StepError::invalid_input("Output folder is not configured"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut LayerState) -> StepResult<StepOutcome> {
        let output_path = ctx.output_path();
        ctx.logger
            .info(&format!("Importing {}", output_path.display()));

        let mut host = ctx.host.lock();
        let imported = host.import_before(&output_path, &ctx.layer)?;

        let scale = if ctx.options.upscale {
            let comp = host.composition_size();
            let scale = fill_scale(comp, (imported.width, imported.height));
            host.set_layer_scale(imported.handle, scale)?;
            ctx.logger.info(&format!(
                "Scaled imported layer to [{:.2}, {:.2}, 100]",
                scale[0], scale[1]
            ));
            Some(scale)
        } else {
            None
        };

        state.import = Some(ImportOutput {
            output_path,
            width: imported.width,
            height: imported.height,
            scale,
        });

        ctx.logger.success(&format!(
            "Imported {} before '{}'",
            ctx.target.file_name, ctx.layer.display_name
        ));

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &LayerState) -> StepResult<()> {
        if !state.has_import() {
            return Err(StepError::invalid_output("Import results not recorded"));
        }
        Ok(())
    }
}
