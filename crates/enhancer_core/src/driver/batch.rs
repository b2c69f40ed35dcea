//! Batch driver for running the per-layer pipeline over a selection.
//!
//! The driver validates preconditions (no side effects on failure),
//! snapshots settings and options once, then processes each selected
//! layer strictly sequentially through Build → Invoke → Import.
//!
//! Failure semantics are continue-on-error: a failed layer aborts only
//! its own remaining steps; the batch moves on to the next selected
//! layer and the per-layer outcome is recorded in the returned results.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::{AlertCallback, JobLogger, LogConfig, PanelLogCallback};
use crate::models::{LayerJob, LayerResult, OutputTarget, ProcessingOptions};

use super::errors::{BatchError, BatchResult};
use super::pipeline::CancelHandle;
use super::types::{Context, LayerState, ProgressCallback, SharedHost};
use super::{create_standard_pipeline, LayerPipeline};

/// Driver that runs a batch of selected layers through the pipeline.
///
/// The driver is handed a settings snapshot and a host project handle;
/// it never reads the settings store itself.
///
/// # Example
///
/// ```ignore
/// let driver = BatchDriver::new(settings, host)
///     .with_alert_callback(Box::new(|msg| show_modal(msg)));
/// let results = driver.run(&options)?;
/// ```
pub struct BatchDriver {
    /// Settings snapshot for this driver.
    settings: Settings,
    /// Host project handle.
    host: SharedHost,
    /// Per-layer pipeline (steps are stateless and reused across layers).
    pipeline: LayerPipeline,
    /// Cancellation handle shared with the pipeline.
    cancel: CancelHandle,
    /// Blocking user notification sink.
    alert_callback: Option<AlertCallback>,
}

impl BatchDriver {
    /// Create a new driver with the given settings snapshot and host.
    pub fn new(settings: Settings, host: SharedHost) -> Self {
        let pipeline = create_standard_pipeline();
        let cancel = pipeline.cancel_handle();
        Self {
            settings,
            host,
            pipeline,
            cancel,
            alert_callback: None,
        }
    }

    /// Set the blocking notification callback.
    ///
    /// The panel front-end presents these as modal alerts; every failure
    /// path ends here.
    pub fn with_alert_callback(mut self, callback: AlertCallback) -> Self {
        self.alert_callback = Some(callback);
        self
    }

    /// Get a handle for cancelling the batch.
    ///
    /// Cancellation takes effect at the next step or layer boundary; an
    /// in-flight external invocation still runs to completion.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run the batch over the current selection.
    ///
    /// Returns one result per processed layer. A precondition failure
    /// returns an error before any side effects.
    pub fn run(&self, options: &ProcessingOptions) -> BatchResult<Vec<LayerResult>> {
        self.run_with_callbacks(options, |_| None, |_| None)
    }

    /// Run the batch with segmentation forced on.
    ///
    /// This is the panel's Segment action: it enables the segment pass
    /// on top of whatever else is selected, which also satisfies the
    /// at-least-one-feature guard on its own.
    pub fn run_segment(&self, options: &ProcessingOptions) -> BatchResult<Vec<LayerResult>> {
        let options = options.clone().with_segment(true);
        self.run(&options)
    }

    /// Run the batch with per-layer callback factories.
    ///
    /// # Arguments
    /// * `options` - Option snapshot for the whole run (read once)
    /// * `panel_callback_factory` - Creates a panel log callback per layer
    /// * `progress_callback_factory` - Creates a progress callback per layer
    pub fn run_with_callbacks<F, G>(
        &self,
        options: &ProcessingOptions,
        panel_callback_factory: F,
        progress_callback_factory: G,
    ) -> BatchResult<Vec<LayerResult>>
    where
        F: Fn(&str) -> Option<PanelLogCallback>,
        G: Fn(&str) -> Option<ProgressCallback>,
    {
        // Guards first - a rejected run must have no side effects
        let layers = self.validate_preconditions(options)?;

        let output_folder = PathBuf::from(&self.settings.paths.output_folder);
        if let Err(e) = fs::create_dir_all(&output_folder) {
            let err = BatchError::preconditions(format!(
                "Cannot create output folder '{}': {}",
                output_folder.display(),
                e
            ));
            self.alert(&err.to_string());
            return Err(err);
        }

        let mut results = Vec::with_capacity(layers.len());

        for (i, layer) in layers.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!("Batch cancelled at layer {}/{}", i + 1, layers.len());
                break;
            }

            tracing::info!(
                "Processing layer {}/{}: {}",
                i + 1,
                layers.len(),
                layer.display_name
            );

            let panel_callback = panel_callback_factory(&layer.display_name);
            let progress_callback = progress_callback_factory(&layer.display_name);

            match self.process_layer(layer, options, panel_callback, progress_callback) {
                Ok(output_path) => {
                    results.push(LayerResult::imported(&layer.display_name, output_path));
                }
                Err(BatchError::Cancelled { layer_name }) => {
                    results.push(LayerResult::failed(&layer_name, "Cancelled"));
                    break;
                }
                Err(e) => {
                    self.alert_failure(&e);
                    results.push(LayerResult::failed(&layer.display_name, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Check all run preconditions, returning the selection snapshot.
    ///
    /// Performs reads only; any failure is alerted and aborts before
    /// work starts.
    fn validate_preconditions(
        &self,
        options: &ProcessingOptions,
    ) -> BatchResult<Vec<LayerJob>> {
        if !options.has_enabled_feature() {
            return Err(self.precondition("Select at least one processing option"));
        }

        if self.settings.paths.output_folder.is_empty() {
            return Err(self.precondition("The output folder has not been selected"));
        }

        if self.settings.tool.folder.is_empty() {
            return Err(self.precondition("The tool folder has not been selected"));
        }

        let host = self.host.lock();

        if !host.scripting_access_granted() {
            return Err(self.precondition(
                "The host does not allow scripts to write files and spawn processes",
            ));
        }

        let layers = host.selected_layers();
        if layers.is_empty() {
            return Err(self.precondition("Select at least one layer"));
        }

        Ok(layers)
    }

    /// Process one layer through the pipeline, returning its output path.
    fn process_layer(
        &self,
        layer: &LayerJob,
        options: &ProcessingOptions,
        panel_callback: Option<PanelLogCallback>,
        progress_callback: Option<ProgressCallback>,
    ) -> BatchResult<PathBuf> {
        let target = OutputTarget::for_layer(&self.settings.paths.output_folder, layer);
        let output_path = target.path();

        let logger = JobLogger::new(
            &layer.display_name,
            &self.settings.paths.logs_folder,
            LogConfig::from_settings(&self.settings.logging),
            panel_callback,
        )
        .map_err(|e| {
            BatchError::setup_failed(
                &layer.display_name,
                format!("Failed to create logger: {}", e),
            )
        })?;

        let mut ctx = Context::new(
            layer.clone(),
            target,
            options.clone(),
            self.settings.clone(),
            Arc::new(logger),
            Arc::clone(&self.host),
        );
        if let Some(callback) = progress_callback {
            ctx = ctx.with_progress_callback(callback);
        }

        let mut state = LayerState::new(&layer.display_name);

        ctx.logger
            .info(&format!("Starting layer: {}", layer.display_name));
        self.pipeline.run(&ctx, &mut state)?;

        Ok(output_path)
    }

    /// Build a precondition error and alert it.
    fn precondition(&self, message: &str) -> BatchError {
        let err = BatchError::preconditions(message);
        self.alert(&err.to_string());
        err
    }

    /// Alert a per-layer failure, with a hint for import problems.
    fn alert_failure(&self, error: &BatchError) {
        match error {
            BatchError::StepFailed { source, .. } if source.is_host_error() => {
                self.alert(&format!(
                    "{}. Check the output folder for the produced file.",
                    error
                ));
            }
            _ => self.alert(&error.to_string()),
        }
    }

    /// Send a blocking notification to the user.
    fn alert(&self, message: &str) {
        if let Some(ref callback) = self.alert_callback {
            callback(message);
        } else {
            tracing::warn!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostError, HostProject, HostResult, ImportedLayer, LayerHandle};
    use crate::models::UpscaleModel;
    use parking_lot::Mutex;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// In-memory host project recording every mutation.
    struct MockHost {
        layers: Vec<LayerJob>,
        comp: (u32, u32),
        imported_size: (u32, u32),
        access: bool,
        fail_import: bool,
        imports: Vec<(PathBuf, String)>,
        scales: Vec<(LayerHandle, [f64; 3])>,
        next_handle: u64,
    }

    impl MockHost {
        fn new(layers: Vec<LayerJob>) -> Self {
            Self {
                layers,
                comp: (1920, 1080),
                imported_size: (3840, 2160),
                access: true,
                fail_import: false,
                imports: Vec::new(),
                scales: Vec::new(),
                next_handle: 1,
            }
        }
    }

    impl HostProject for MockHost {
        fn selected_layers(&self) -> Vec<LayerJob> {
            self.layers.clone()
        }

        fn composition_size(&self) -> (u32, u32) {
            self.comp
        }

        fn scripting_access_granted(&self) -> bool {
            self.access
        }

        fn import_before(
            &mut self,
            file: &Path,
            reference: &LayerJob,
        ) -> HostResult<ImportedLayer> {
            if self.fail_import {
                return Err(HostError::import_failed(file, "file missing"));
            }
            self.imports
                .push((file.to_path_buf(), reference.display_name.clone()));
            let handle = LayerHandle(self.next_handle);
            self.next_handle += 1;
            Ok(ImportedLayer {
                handle,
                width: self.imported_size.0,
                height: self.imported_size.1,
            })
        }

        fn set_layer_scale(&mut self, layer: LayerHandle, scale: [f64; 3]) -> HostResult<()> {
            self.scales.push((layer, scale));
            Ok(())
        }
    }

    fn make_layer(name: &str) -> LayerJob {
        LayerJob::new(format!("/media/{}", name), name, 0.0, 10.0, 10.0)
    }

    /// Settings pointing at temp directories, tool folder existing but empty.
    fn make_settings(dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.paths.output_folder = dir.join("out").to_string_lossy().to_string();
        settings.paths.logs_folder = dir.join("logs").to_string_lossy().to_string();
        settings.tool.folder = dir.to_string_lossy().to_string();
        settings.tool.settle_delay_ms = 0;
        settings
    }

    fn driver_with(
        settings: Settings,
        host: Arc<Mutex<MockHost>>,
        alerts: Arc<AtomicUsize>,
    ) -> BatchDriver {
        BatchDriver::new(settings, host).with_alert_callback(Box::new(move |_msg| {
            alerts.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn rejects_run_with_no_features() {
        let dir = tempdir().unwrap();
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host.clone(), alerts.clone());

        let err = driver.run(&ProcessingOptions::default()).unwrap_err();

        assert!(matches!(err, BatchError::Preconditions(_)));
        assert_eq!(alerts.load(Ordering::SeqCst), 1);
        // No side effects: nothing imported, output folder never created
        assert!(host.lock().imports.is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn rejects_run_without_output_folder() {
        let dir = tempdir().unwrap();
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let mut settings = make_settings(dir.path());
        settings.paths.output_folder = String::new();
        let driver = driver_with(settings, host.clone(), alerts.clone());

        let mut options = ProcessingOptions::default();
        options.upscale = true;

        let err = driver.run(&options).unwrap_err();
        assert!(matches!(err, BatchError::Preconditions(_)));
        assert!(err.to_string().contains("output folder"));
        assert!(host.lock().imports.is_empty());
    }

    #[test]
    fn rejects_run_without_tool_folder() {
        let dir = tempdir().unwrap();
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let mut settings = make_settings(dir.path());
        settings.tool.folder = String::new();
        let driver = driver_with(settings, host, alerts);

        let mut options = ProcessingOptions::default();
        options.deduplicate = true;

        let err = driver.run(&options).unwrap_err();
        assert!(err.to_string().contains("tool folder"));
    }

    #[test]
    fn rejects_run_without_scripting_access() {
        let dir = tempdir().unwrap();
        let mut mock = MockHost::new(vec![make_layer("clip.mov")]);
        mock.access = false;
        let host = Arc::new(Mutex::new(mock));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host, alerts);

        let mut options = ProcessingOptions::default();
        options.sharpen = true;

        let err = driver.run(&options).unwrap_err();
        assert!(err.to_string().contains("scripts"));
    }

    #[test]
    fn rejects_run_with_no_selection() {
        let dir = tempdir().unwrap();
        let host = Arc::new(Mutex::new(MockHost::new(Vec::new())));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host, alerts.clone());

        let mut options = ProcessingOptions::default();
        options.interpolate = true;

        let err = driver.run(&options).unwrap_err();
        assert!(matches!(err, BatchError::Preconditions(_)));
        assert_eq!(alerts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn segment_action_passes_feature_guard() {
        let dir = tempdir().unwrap();
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host, alerts);

        // No checkboxes ticked - still runs, because segment counts
        let results = driver.run_segment(&ProcessingOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn invocation_failure_skips_import_and_continues() {
        let dir = tempdir().unwrap();
        let layers = vec![make_layer("one.mov"), make_layer("two.mov")];
        let host = Arc::new(Mutex::new(MockHost::new(layers)));
        let alerts = Arc::new(AtomicUsize::new(0));
        // Tool folder exists but has no binary - every invocation fails
        let driver = driver_with(make_settings(dir.path()), host.clone(), alerts.clone());

        let mut options = ProcessingOptions::default();
        options.upscale = true;

        let results = driver.run(&options).unwrap();

        // Both layers were attempted (failure isolation)
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.error.is_some()));
        assert_eq!(alerts.load(Ordering::SeqCst), 2);
        // Import was never entered for either layer
        assert!(host.lock().imports.is_empty());
    }

    #[test]
    fn cancelled_batch_processes_nothing() {
        let dir = tempdir().unwrap();
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host.clone(), alerts);

        driver.cancel_handle().cancel();

        let mut options = ProcessingOptions::default();
        options.upscale = true;

        let results = driver.run(&options).unwrap();
        assert!(results.is_empty());
        assert!(host.lock().imports.is_empty());
    }

    #[cfg(unix)]
    fn install_fake_tool(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;
        let tool = dir.join("main");
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        let mut perms = fs::metadata(&tool).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&tool, perms).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn upscale_batch_imports_and_rescales() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path());
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host.clone(), alerts.clone());

        let mut options = ProcessingOptions::default();
        options.upscale = true;
        options.upscale_factor = 2;
        options.upscale_model = UpscaleModel::Compact;

        let results = driver.run(&options).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].error.is_none(), "{:?}", results[0].error);
        assert_eq!(alerts.load(Ordering::SeqCst), 0);

        let output = results[0].output.as_ref().unwrap();
        let name = output.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("clip_"));
        assert!(name.ends_with(".mp4"));

        let mock = host.lock();
        assert_eq!(mock.imports.len(), 1);
        assert_eq!(mock.imports[0].1, "clip.mov");
        // Comp 1920x1080 over imported 3840x2160
        assert_eq!(mock.scales.len(), 1);
        assert_eq!(mock.scales[0].1, [50.0, 50.0, 100.0]);
    }

    #[cfg(unix)]
    #[test]
    fn non_upscale_batch_leaves_scale_untouched() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path());
        let host = Arc::new(Mutex::new(MockHost::new(vec![make_layer("clip.mov")])));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host.clone(), alerts);

        let mut options = ProcessingOptions::default();
        options.deduplicate = true;

        let results = driver.run(&options).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].error.is_none());

        let mock = host.lock();
        assert_eq!(mock.imports.len(), 1);
        assert!(mock.scales.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn import_failure_is_isolated_per_layer() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path());
        let mut mock = MockHost::new(vec![make_layer("one.mov"), make_layer("two.mov")]);
        mock.fail_import = true;
        let host = Arc::new(Mutex::new(mock));
        let alerts = Arc::new(AtomicUsize::new(0));
        let driver = driver_with(make_settings(dir.path()), host.clone(), alerts.clone());

        let mut options = ProcessingOptions::default();
        options.sharpen = true;

        let results = driver.run(&options).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.error.is_some()));
        assert!(results[0].error.as_ref().unwrap().contains("import"));
        assert_eq!(alerts.load(Ordering::SeqCst), 2);
    }
}
