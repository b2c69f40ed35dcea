//! Error types for the batch driver.
//!
//! Errors carry context that chains through layers:
//! Batch → Layer → Step → Detail

use std::io;

use thiserror::Error;

use crate::host::HostError;

/// Top-level batch error with layer context.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Preconditions failed before any work started (nothing selected,
    /// unconfigured folders, missing host permission).
    #[error("Cannot start batch: {0}")]
    Preconditions(String),

    /// A step failed while processing one layer.
    #[error("Layer '{layer_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        layer_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Processing was cancelled.
    #[error("Layer '{layer_name}' was cancelled")]
    Cancelled { layer_name: String },

    /// Failed to set up a layer job (logger, directories).
    #[error("Layer '{layer_name}' setup failed: {message}")]
    SetupFailed { layer_name: String, message: String },
}

impl BatchError {
    /// Create a preconditions error.
    pub fn preconditions(message: impl Into<String>) -> Self {
        Self::Preconditions(message.into())
    }

    /// Create a step failed error.
    pub fn step_failed(
        layer_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            layer_name: layer_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a cancelled error.
    pub fn cancelled(layer_name: impl Into<String>) -> Self {
        Self::Cancelled {
            layer_name: layer_name.into(),
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(layer_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            layer_name: layer_name.into(),
            message: message.into(),
        }
    }
}

/// Error from a layer step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// The external process could not be invoked.
    #[error("Failed to invoke {tool}: {source}")]
    Invocation {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A required file was not found.
    #[error("Required file not found: {path}")]
    FileNotFound { path: String },

    /// Import/placement into the host project failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Generic step error with message.
    #[error("{0}")]
    Other(String),
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create an invocation error.
    pub fn invocation(tool: impl Into<String>, source: io::Error) -> Self {
        Self::Invocation {
            tool: tool.into(),
            source,
        }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Whether this error came from the host project (import/placement).
    pub fn is_host_error(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_displays_context() {
        let source = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = StepError::invocation("/opt/tool/main", source);
        let msg = err.to_string();
        assert!(msg.contains("/opt/tool/main"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn batch_error_chains_context() {
        let step_err = StepError::file_not_found("/out/clip_42.mp4");
        let batch_err = BatchError::step_failed("clip.mov", "Import", step_err);

        let msg = batch_err.to_string();
        assert!(msg.contains("clip.mov"));
        assert!(msg.contains("Import"));
    }

    #[test]
    fn host_error_converts() {
        let err: StepError = HostError::import_failed("/out/x.mp4", "missing").into();
        assert!(err.is_host_error());
        assert!(err.to_string().contains("/out/x.mp4"));
    }
}
