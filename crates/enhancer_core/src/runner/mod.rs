//! Blocking invocation of the external tool.
//!
//! The runner executes the resolved tool entry point with the tool
//! folder as its working directory, waits for it to exit, streams its
//! output into the per-layer log, then sleeps a short settling delay.
//! The external tool keeps writing container metadata briefly after its
//! process handle closes; importing before that flush finishes produces
//! corrupt footage.
//!
//! No timeout is enforced - a hung tool blocks the batch. Cancellation
//! is handled at step boundaries by the pipeline, never mid-invocation.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use crate::command::format_command_line;
use crate::config::ToolSettings;
use crate::driver::{StepError, StepResult};
use crate::logging::JobLogger;
use crate::models::ToolVariant;

/// Runner for the external processing tool.
pub struct ToolRunner {
    /// Resolved entry point (executable or script).
    program: PathBuf,
    /// Working directory for the invocation (the tool folder).
    working_dir: PathBuf,
    /// Delay after exit, letting trailing file writes flush.
    settle_delay: Duration,
}

impl ToolRunner {
    /// Create a runner for an explicit program and working directory.
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            settle_delay: Duration::from_millis(500),
        }
    }

    /// Resolve the runner from tool settings.
    ///
    /// The executable variant runs `<folder>/<binary>`, the script
    /// variant runs `<folder>/<script_entry>`; both use the tool folder
    /// as working directory.
    pub fn from_settings(tool: &ToolSettings) -> Self {
        let folder = PathBuf::from(&tool.folder);
        let entry = match tool.variant {
            ToolVariant::Executable => &tool.binary,
            ToolVariant::Script => &tool.script_entry,
        };
        Self::new(folder.join(entry), folder)
            .with_settle_delay(Duration::from_millis(tool.settle_delay_ms))
    }

    /// Override the settling delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Get the resolved program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Render the command line this runner would execute.
    pub fn command_line(&self, tokens: &[String]) -> String {
        format_command_line(&self.program.to_string_lossy(), tokens)
    }

    /// Execute the tool with the given tokens, blocking until it exits.
    ///
    /// Returns the tool's exit code. A failure to spawn the process is
    /// an invocation error; a nonzero exit code is logged with the output
    /// tail but left for the import step to surface (the tool's exit
    /// behavior is not part of this contract).
    pub fn run(&self, tokens: &[String], logger: &JobLogger) -> StepResult<i32> {
        logger.command(&self.command_line(tokens));

        let result = Command::new(&self.program)
            .args(tokens)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| StepError::invocation(self.program.to_string_lossy(), e))?;

        let exit_code = result.status.code().unwrap_or(-1);

        if !result.stdout.is_empty() {
            let stdout = String::from_utf8_lossy(&result.stdout);
            for line in stdout.lines() {
                logger.output_line(line, false);
            }
        }
        if !result.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            for line in stderr.lines() {
                logger.output_line(line, true);
            }
        }

        if exit_code != 0 {
            logger.warn(&format!("Tool exited with code {}", exit_code));
            logger.show_tail("tool output");
        }

        tracing::debug!(
            "tool exited with code {}, settling for {:?}",
            exit_code,
            self.settle_delay
        );

        // Let trailing metadata writes flush before anyone touches the file
        thread::sleep(self.settle_delay);

        Ok(exit_code)
    }
}
