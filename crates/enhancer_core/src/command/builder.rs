//! External tool command options builders.
//!
//! Builds the ordered command-line token list for one layer job from the
//! option snapshot. Two tool integrations exist: the packaged executable
//! (double-dash flags, full option set) and the older script entry point
//! (single-dash flags, reduced option set).
//!
//! Tokens are handed to the process runner as a structured argument list
//! and are never joined into a shell string for execution; quoting only
//! happens when rendering a command line for the log.

use crate::models::{LayerJob, OutputTarget, ProcessingOptions, ToolVariant};

/// Builder for the packaged executable's command-line options.
///
/// Generates a list of string tokens that form a complete invocation.
pub struct EnhancerOptionsBuilder<'a> {
    layer: &'a LayerJob,
    target: &'a OutputTarget,
    options: &'a ProcessingOptions,
}

impl<'a> EnhancerOptionsBuilder<'a> {
    /// Create a new options builder.
    pub fn new(
        layer: &'a LayerJob,
        target: &'a OutputTarget,
        options: &'a ProcessingOptions,
    ) -> Self {
        Self {
            layer,
            target,
            options,
        }
    }

    /// Build the complete command tokens.
    ///
    /// Token order is stable; for identical inputs the output only
    /// differs in the random disambiguator already embedded in the
    /// target filename. Numeric values are passed through verbatim -
    /// the tool rejects out-of-range parameters itself.
    pub fn build(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let (in_point, out_point) = self.layer.effective_trim();

        tokens.push("--input".to_string());
        tokens.push(self.layer.source_path.to_string_lossy().to_string());

        tokens.push("--output".to_string());
        tokens.push(self.target.path().to_string_lossy().to_string());

        tokens.push("--interpolate".to_string());
        tokens.push(flag(self.options.interpolate));
        tokens.push("--interpolate_factor".to_string());
        tokens.push(self.options.interpolate_factor.to_string());

        tokens.push("--upscale".to_string());
        tokens.push(flag(self.options.upscale));
        tokens.push("--upscale_factor".to_string());
        tokens.push(self.options.upscale_factor.to_string());

        tokens.push("--dedup".to_string());
        tokens.push(flag(self.options.deduplicate));

        tokens.push("--half".to_string());
        tokens.push(flag(self.options.half_precision));

        tokens.push("--upscale_method".to_string());
        tokens.push(self.options.upscale_model.name().to_string());

        tokens.push("--inpoint".to_string());
        tokens.push(in_point.to_string());
        tokens.push("--outpoint".to_string());
        tokens.push(out_point.to_string());

        tokens.push("--sharpen".to_string());
        tokens.push(flag(self.options.sharpen));
        tokens.push("--sharpen_sens".to_string());
        tokens.push(self.options.sharpen_intensity.to_string());

        tokens.push("--segment".to_string());
        tokens.push(flag(self.options.segment));

        tracing::debug!(
            "built {} tokens for layer '{}'",
            tokens.len(),
            self.layer.display_name
        );

        tokens
    }
}

/// Builder for the script entry point's reduced option set.
pub struct ScriptOptionsBuilder<'a> {
    layer: &'a LayerJob,
    target: &'a OutputTarget,
    options: &'a ProcessingOptions,
}

impl<'a> ScriptOptionsBuilder<'a> {
    /// Create a new options builder.
    pub fn new(
        layer: &'a LayerJob,
        target: &'a OutputTarget,
        options: &'a ProcessingOptions,
    ) -> Self {
        Self {
            layer,
            target,
            options,
        }
    }

    /// Build the complete command tokens for the script variant.
    pub fn build(&self) -> Vec<String> {
        vec![
            "-video".to_string(),
            self.layer.source_path.to_string_lossy().to_string(),
            "-model_type".to_string(),
            self.options.upscale_model.name().to_string(),
            "-multi".to_string(),
            self.options.upscale_factor.to_string(),
            "-nt".to_string(),
            self.options.threads.to_string(),
            "-kind_model".to_string(),
            self.options.cugan_denoise.name().to_string(),
            "-output".to_string(),
            self.target.path().to_string_lossy().to_string(),
        ]
    }
}

/// Build tokens for the configured tool variant.
pub fn build_tokens(
    variant: ToolVariant,
    layer: &LayerJob,
    target: &OutputTarget,
    options: &ProcessingOptions,
) -> Vec<String> {
    match variant {
        ToolVariant::Executable => EnhancerOptionsBuilder::new(layer, target, options).build(),
        ToolVariant::Script => ScriptOptionsBuilder::new(layer, target, options).build(),
    }
}

/// Quote a token for display if it contains whitespace or path separators.
///
/// Execution never goes through a shell; this exists so logged command
/// lines can be copy-pasted without mangling paths.
pub fn quote_token(token: &str) -> String {
    let needs_quotes = token
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\');
    if needs_quotes {
        format!("\"{}\"", token.replace('"', "\\\""))
    } else {
        token.to_string()
    }
}

/// Render a full command line for display/logging.
pub fn format_command_line(program: &str, tokens: &[String]) -> String {
    let mut parts = Vec::with_capacity(tokens.len() + 1);
    parts.push(quote_token(program));
    for token in tokens {
        parts.push(quote_token(token));
    }
    parts.join(" ")
}

/// Render a bool as the tool's "0"/"1" flag value.
fn flag(value: bool) -> String {
    let value = if value { "1" } else { "0" };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpscaleModel;
    use std::path::PathBuf;

    fn make_layer() -> LayerJob {
        LayerJob::new("/media/clip.mov", "clip.mov", 0.0, 10.0, 10.0)
    }

    fn make_target() -> OutputTarget {
        OutputTarget {
            folder: PathBuf::from("/out"),
            file_name: "clip_123456.mp4".to_string(),
        }
    }

    fn contains_pair(tokens: &[String], flag: &str, value: &str) -> bool {
        tokens
            .windows(2)
            .any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn upscale_scenario_tokens() {
        let layer = make_layer();
        let target = make_target();
        let mut options = ProcessingOptions::default();
        options.upscale = true;
        options.upscale_factor = 2;
        options.upscale_model = UpscaleModel::Compact;

        let tokens = EnhancerOptionsBuilder::new(&layer, &target, &options).build();

        assert!(contains_pair(&tokens, "--upscale", "1"));
        assert!(contains_pair(&tokens, "--upscale_factor", "2"));
        assert!(contains_pair(&tokens, "--upscale_method", "Compact"));
        assert!(contains_pair(&tokens, "--input", "/media/clip.mov"));
        assert!(contains_pair(&tokens, "--output", "/out/clip_123456.mp4"));
        // Disabled features are still passed, as zeros
        assert!(contains_pair(&tokens, "--interpolate", "0"));
        assert!(contains_pair(&tokens, "--dedup", "0"));
        assert!(contains_pair(&tokens, "--segment", "0"));
        assert!(contains_pair(&tokens, "--half", "1"));
    }

    #[test]
    fn whole_clip_passes_zero_trim() {
        let layer = make_layer();
        let target = make_target();
        let options = ProcessingOptions::default();

        let tokens = EnhancerOptionsBuilder::new(&layer, &target, &options).build();
        assert!(contains_pair(&tokens, "--inpoint", "0"));
        assert!(contains_pair(&tokens, "--outpoint", "0"));
    }

    #[test]
    fn trimmed_layer_passes_trim_points() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 1.5, 4.0, 10.0);
        let target = make_target();
        let options = ProcessingOptions::default();

        let tokens = EnhancerOptionsBuilder::new(&layer, &target, &options).build();
        assert!(contains_pair(&tokens, "--inpoint", "1.5"));
        assert!(contains_pair(&tokens, "--outpoint", "4"));
    }

    #[test]
    fn build_is_deterministic_and_order_stable() {
        let layer = make_layer();
        let target = make_target();
        let options = ProcessingOptions::default();

        let first = EnhancerOptionsBuilder::new(&layer, &target, &options).build();
        let second = EnhancerOptionsBuilder::new(&layer, &target, &options).build();
        assert_eq!(first, second);

        // Input always leads, segment always closes
        assert_eq!(first[0], "--input");
        assert_eq!(first[first.len() - 2], "--segment");
    }

    #[test]
    fn script_variant_tokens() {
        let layer = make_layer();
        let target = make_target();
        let mut options = ProcessingOptions::default();
        options.upscale_factor = 4;
        options.threads = 2;

        let tokens = build_tokens(ToolVariant::Script, &layer, &target, &options);
        assert_eq!(tokens[0], "-video");
        assert!(contains_pair(&tokens, "-multi", "4"));
        assert!(contains_pair(&tokens, "-nt", "2"));
        assert!(contains_pair(&tokens, "-kind_model", "No-Denoise"));
        assert!(contains_pair(&tokens, "-output", "/out/clip_123456.mp4"));
    }

    #[test]
    fn quoting_covers_whitespace_and_separators() {
        assert_eq!(quote_token("2"), "2");
        assert_eq!(quote_token("--input"), "--input");
        assert_eq!(quote_token("/media/clip.mov"), "\"/media/clip.mov\"");
        assert_eq!(quote_token("my clip.mov"), "\"my clip.mov\"");
        assert_eq!(quote_token("C:\\media\\clip.mov"), "\"C:\\media\\clip.mov\"");
    }

    #[test]
    fn command_line_renders_quoted() {
        let line = format_command_line(
            "/opt/tool/main",
            &["--input".to_string(), "/media/my clip.mov".to_string()],
        );
        assert_eq!(line, "\"/opt/tool/main\" --input \"/media/my clip.mov\"");
    }
}
