//! Per-layer job data structures (layer snapshots, output targets, results).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::LayerStatus;

/// Snapshot of one selected layer, read from the host project when a
/// batch starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerJob {
    /// Path to the layer's source media file.
    pub source_path: PathBuf,
    /// Layer display name (may still carry the media extension).
    pub display_name: String,
    /// In point in seconds, relative to the source media.
    pub in_point: f64,
    /// Out point in seconds, relative to the source media.
    pub out_point: f64,
    /// Full duration of the source media in seconds.
    pub full_duration: f64,
}

impl LayerJob {
    /// Create a new layer job.
    pub fn new(
        source_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
        in_point: f64,
        out_point: f64,
        full_duration: f64,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            display_name: display_name.into(),
            in_point,
            out_point,
            full_duration,
        }
    }

    /// Trim points to hand to the external tool.
    ///
    /// When the layer uses its source's full duration, trimming is
    /// disabled and both points collapse to zero ("process whole clip").
    /// Host time values are floats, so the comparison tolerates rounding.
    pub fn effective_trim(&self) -> (f64, f64) {
        let used = self.out_point - self.in_point;
        if (used - self.full_duration).abs() < 1e-6 {
            (0.0, 0.0)
        } else {
            (self.in_point, self.out_point)
        }
    }

    /// Display name with any trailing media extension stripped.
    pub fn stem(&self) -> &str {
        match self.display_name.rfind('.') {
            Some(idx) if idx > 0 => &self.display_name[..idx],
            _ => &self.display_name,
        }
    }
}

/// Where one layer's processed output lands.
///
/// The filename embeds a random disambiguator; collisions are avoided
/// probabilistically, not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    /// Destination folder.
    pub folder: PathBuf,
    /// File name within the folder.
    pub file_name: String,
}

impl OutputTarget {
    /// Build the target for a layer: sanitized stem + random suffix + `.mp4`.
    pub fn for_layer(folder: impl Into<PathBuf>, layer: &LayerJob) -> Self {
        let suffix: u32 = rand::random::<u32>() % 1_000_000;
        let file_name = format!("{}_{}.mp4", sanitize_file_stem(layer.stem()), suffix);
        Self {
            folder: folder.into(),
            file_name,
        }
    }

    /// Full path of the output file.
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }
}

/// Replace characters that are unsafe in filenames.
fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Simple random number generator for output suffixes (no external dependency).
mod rand {
    use std::cell::Cell;
    use std::time::{SystemTime, UNIX_EPOCH};

    thread_local! {
        static SEED: Cell<u64> = Cell::new(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(12345)
        );
    }

    pub fn random<T: From<u32>>() -> T {
        SEED.with(|seed| {
            // Simple xorshift
            let mut x = seed.get();
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            seed.set(x);
            T::from((x & 0xFFFFFFFF) as u32)
        })
    }
}

/// Result of one layer within a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerResult {
    /// Final status.
    pub status: LayerStatus,
    /// Layer display name.
    pub layer_name: String,
    /// Path of the produced file (if the tool was invoked).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Error message (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LayerResult {
    /// Create a successful import result.
    pub fn imported(layer_name: impl Into<String>, output: PathBuf) -> Self {
        Self {
            status: LayerStatus::Imported,
            layer_name: layer_name.into(),
            output: Some(output),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failed(layer_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: LayerStatus::Failed,
            layer_name: layer_name.into(),
            output: None,
            error: Some(error.into()),
        }
    }

    /// Attach the output path that was attempted.
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_duration_disables_trim() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 3.5, 13.5, 10.0);
        assert_eq!(layer.effective_trim(), (0.0, 0.0));
    }

    #[test]
    fn partial_use_keeps_trim() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 1.0, 4.0, 10.0);
        assert_eq!(layer.effective_trim(), (1.0, 4.0));
    }

    #[test]
    fn trim_tolerates_float_rounding() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 0.0, 10.0 + 1e-9, 10.0);
        assert_eq!(layer.effective_trim(), (0.0, 0.0));
    }

    #[test]
    fn stem_strips_extension() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 0.0, 1.0, 1.0);
        assert_eq!(layer.stem(), "clip");

        let dotted = LayerJob::new("/media/a.b.mov", "a.b.mov", 0.0, 1.0, 1.0);
        assert_eq!(dotted.stem(), "a.b");

        let bare = LayerJob::new("/media/clip", "clip", 0.0, 1.0, 1.0);
        assert_eq!(bare.stem(), "clip");
    }

    #[test]
    fn output_target_shape() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 0.0, 1.0, 1.0);
        let target = OutputTarget::for_layer("/out", &layer);

        assert!(target.file_name.starts_with("clip_"));
        assert!(target.file_name.ends_with(".mp4"));
        let suffix = &target.file_name["clip_".len()..target.file_name.len() - ".mp4".len()];
        assert!(suffix.parse::<u32>().unwrap() < 1_000_000);
        assert_eq!(target.path(), PathBuf::from("/out").join(&target.file_name));
    }

    #[test]
    fn output_target_sanitizes_name() {
        let layer = LayerJob::new("/media/x.mov", "sh*ot 01: take?.mov", 0.0, 1.0, 1.0);
        let target = OutputTarget::for_layer("/out", &layer);
        assert!(target.file_name.starts_with("sh_ot 01_ take_"));
    }

    #[test]
    fn suffixes_differ_between_calls() {
        let layer = LayerJob::new("/media/clip.mov", "clip.mov", 0.0, 1.0, 1.0);
        let a = OutputTarget::for_layer("/out", &layer);
        let b = OutputTarget::for_layer("/out", &layer);
        assert_ne!(a.file_name, b.file_name);
    }

    #[test]
    fn layer_result_serializes() {
        let result = LayerResult::failed("clip.mov", "tool not found");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"Failed\""));
        assert!(json.contains("\"error\":\"tool not found\""));
    }
}
