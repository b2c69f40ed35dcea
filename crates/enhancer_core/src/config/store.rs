//! Narrow persistence interface for host-backed settings.
//!
//! Hosts expose a durable key/value settings API scoped by application
//! name. This module models that collaborator as the `SettingsStore`
//! trait and maps its flat keys onto the typed `Settings` struct, so
//! business logic only ever sees a config snapshot loaded once at batch
//! start - never the store itself.
//!
//! Numeric values are stored as text (they come from text fields) and
//! parsed on hydration; absent or malformed values fall back to the
//! field's default.

use std::collections::HashMap;

use crate::models::{CuganDenoise, ToolVariant, UpscaleModel};

use super::settings::Settings;

/// Application name host implementations use to scope stored keys.
pub const APP_NAME: &str = "ClipEnhancer";

/// Key under which the output folder is persisted.
pub const KEY_OUTPUT_FOLDER: &str = "outputFolder";
/// Key under which the tool folder is persisted.
pub const KEY_TOOL_FOLDER: &str = "toolFolder";
/// Key under which the tool variant index is persisted.
pub const KEY_TOOL_VARIANT: &str = "toolVariant";
/// Key under which the upscale model index is persisted.
pub const KEY_UPSCALE_MODEL: &str = "upscaleModel";
/// Key under which the Cugan denoise index is persisted.
pub const KEY_CUGAN_DENOISE: &str = "cuganDenoise";
/// Key under which the interpolation factor text is persisted.
pub const KEY_INTERPOLATE_FACTOR: &str = "interpolateFactor";
/// Key under which the upscale factor text is persisted.
pub const KEY_UPSCALE_FACTOR: &str = "upscaleFactor";
/// Key under which the thread count text is persisted.
pub const KEY_THREADS: &str = "numberOfThreads";
/// Key under which the sharpen intensity is persisted.
pub const KEY_SHARPEN_INTENSITY: &str = "sharpenIntensity";

/// Durable key/value settings persistence, as exposed by the host.
///
/// Implementations are expected to survive across panel sessions.
pub trait SettingsStore {
    /// Read a value, returning `default` when the key is absent.
    fn get(&self, key: &str, default: &str) -> String;

    /// Whether the key has a stored value.
    fn has(&self, key: &str) -> bool;

    /// Store a value under the key.
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and headless embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl Settings {
    /// Hydrate a settings snapshot from a host store.
    ///
    /// Starts from defaults and overrides each field that has a usable
    /// stored value. The returned struct is what gets passed by value
    /// into the batch driver.
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let mut settings = Settings::default();

        if store.has(KEY_OUTPUT_FOLDER) {
            settings.paths.output_folder = store.get(KEY_OUTPUT_FOLDER, "");
        }
        if store.has(KEY_TOOL_FOLDER) {
            settings.tool.folder = store.get(KEY_TOOL_FOLDER, "");
        }

        settings.tool.variant = ToolVariant::from_index(parse_index(
            &store.get(KEY_TOOL_VARIANT, ""),
            settings.tool.variant.to_index(),
        ));
        settings.processing.upscale_model = UpscaleModel::from_index(parse_index(
            &store.get(KEY_UPSCALE_MODEL, ""),
            settings.processing.upscale_model.to_index(),
        ));
        settings.processing.cugan_denoise = CuganDenoise::from_index(parse_index(
            &store.get(KEY_CUGAN_DENOISE, ""),
            settings.processing.cugan_denoise.to_index(),
        ));

        settings.processing.interpolate_factor = parse_positive(
            &store.get(KEY_INTERPOLATE_FACTOR, ""),
            settings.processing.interpolate_factor,
        );
        settings.processing.upscale_factor = parse_positive(
            &store.get(KEY_UPSCALE_FACTOR, ""),
            settings.processing.upscale_factor,
        );
        settings.processing.threads =
            parse_positive(&store.get(KEY_THREADS, ""), settings.processing.threads);
        settings.processing.sharpen_intensity = store
            .get(KEY_SHARPEN_INTENSITY, "")
            .trim()
            .parse()
            .unwrap_or(settings.processing.sharpen_intensity);

        settings
    }

    /// Write this snapshot back into a host store.
    pub fn persist(&self, store: &mut dyn SettingsStore) {
        store.set(KEY_OUTPUT_FOLDER, &self.paths.output_folder);
        store.set(KEY_TOOL_FOLDER, &self.tool.folder);
        store.set(KEY_TOOL_VARIANT, &self.tool.variant.to_index().to_string());
        store.set(
            KEY_UPSCALE_MODEL,
            &self.processing.upscale_model.to_index().to_string(),
        );
        store.set(
            KEY_CUGAN_DENOISE,
            &self.processing.cugan_denoise.to_index().to_string(),
        );
        store.set(
            KEY_INTERPOLATE_FACTOR,
            &self.processing.interpolate_factor.to_string(),
        );
        store.set(
            KEY_UPSCALE_FACTOR,
            &self.processing.upscale_factor.to_string(),
        );
        store.set(KEY_THREADS, &self.processing.threads.to_string());
        store.set(
            KEY_SHARPEN_INTENSITY,
            &self.processing.sharpen_intensity.to_string(),
        );
    }
}

/// Parse a combo box index stored as text.
fn parse_index(text: &str, default: usize) -> usize {
    text.trim().parse().unwrap_or(default)
}

/// Parse a positive integer entered as text, falling back on anything else.
fn parse_positive(text: &str, default: u32) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => default,
    }
}
