//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::models::{ProcessingOptions, ToolVariant};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool location and invocation settings.
    #[serde(default)]
    pub tool: ToolSettings,

    /// Default processing options restored into the panel.
    #[serde(default)]
    pub processing: ProcessingOptions,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for output and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder where processed files are written. Empty until the user
    /// picks one; a batch run refuses to start without it.
    #[serde(default)]
    pub output_folder: String,

    /// Folder for per-layer log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: String::new(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Folder containing the external tool. Empty until the user picks
    /// one; also used as the working directory for invocations.
    #[serde(default)]
    pub folder: String,

    /// Executable name inside the tool folder.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Script entry point inside the tool folder (script variant).
    #[serde(default = "default_script_entry")]
    pub script_entry: String,

    /// Which integration of the tool to invoke.
    #[serde(default)]
    pub variant: ToolVariant,

    /// Delay after the tool exits, letting trailing metadata writes flush.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_binary() -> String {
    "main".to_string()
}

fn default_script_entry() -> String {
    "main.py".to_string()
}

fn default_settle_delay_ms() -> u64 {
    500
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            folder: String::new(),
            binary: default_binary(),
            script_entry: default_script_entry(),
            variant: ToolVariant::default(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Auto-scroll log output in the panel.
    #[serde(default = "default_true")]
    pub autoscroll: bool,

    /// Number of tool output lines to show after an error.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Show the built command tokens in pretty format.
    #[serde(default)]
    pub show_command_pretty: bool,

    /// Show the built command tokens as raw JSON.
    #[serde(default)]
    pub show_command_json: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            autoscroll: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_command_pretty: false,
            show_command_json: false,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Tool,
    Processing,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tool => "tool",
            ConfigSection::Processing => "processing",
            ConfigSection::Logging => "logging",
        }
    }
}
