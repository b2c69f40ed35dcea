//! Configuration management for Clip Enhancer.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - A narrow `SettingsStore` trait modeling the host's durable
//!   key/value settings API, with `Settings::from_store` hydration
//!
//! # Example
//!
//! ```no_run
//! use enhancer_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Output folder: {}", config.settings().paths.output_folder);
//!
//! // Modify a setting
//! config.settings_mut().logging.compact = false;
//!
//! // Save just the logging section atomically
//! config.update_section(ConfigSection::Logging).unwrap();
//! ```

mod manager;
mod settings;
mod store;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LoggingSettings, PathSettings, Settings, ToolSettings};
pub use store::{
    MemoryStore, SettingsStore, APP_NAME, KEY_CUGAN_DENOISE, KEY_INTERPOLATE_FACTOR,
    KEY_OUTPUT_FOLDER, KEY_SHARPEN_INTENSITY, KEY_THREADS, KEY_TOOL_FOLDER, KEY_TOOL_VARIANT,
    KEY_UPSCALE_FACTOR, KEY_UPSCALE_MODEL,
};
