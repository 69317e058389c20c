use tracing::{debug, error, info, instrument, warn};

use crate::profiler::camera::{Camera, CameraConfig, FrameBuffer, Resolution};
use crate::profiler::common::error::{ProfilerError, Result};
use crate::profiler::export::{
    ExportKind, ExportTarget, ImageWriter, MatrixWriter, SnapshotExporter, StandardImageWriter,
    TextMatrixWriter,
};
use crate::profiler::intensity::{sum_channels, IntensityImage};
use crate::profiler::notify::{Notice, StatusSink};
use crate::profiler::session::handle::ControlHandle;
use crate::profiler::session::types::{ExportNames, ProfilerConfig, SnapshotReport, SnapshotStage};

pub const DATA_EXPORTING: &str = "Data Exporting";

/// One-shot capture: switch to capture resolution, grab a frame, sum channels, crop,
/// export, switch back.
pub struct SnapshotPipeline<I: ImageWriter, M: MatrixWriter> {
    exporter: SnapshotExporter<I, M>,
    preview: CameraConfig,
    capture_resolution: Resolution,
    crop: Resolution,
    stage: SnapshotStage,
}

impl SnapshotPipeline<StandardImageWriter, TextMatrixWriter> {
    pub fn new(config: &ProfilerConfig) -> Self {
        let exporter = SnapshotExporter::new(config.tiff_compression, config.quantization)
            .with_output_dir(config.output_dir.clone());
        Self::with_exporter(exporter, config)
    }
}

impl<I: ImageWriter, M: MatrixWriter> SnapshotPipeline<I, M> {
    pub fn with_exporter(exporter: SnapshotExporter<I, M>, config: &ProfilerConfig) -> Self {
        Self {
            exporter,
            preview: config.preview.clone(),
            capture_resolution: config.capture_resolution,
            crop: config.crop,
            stage: SnapshotStage::Idle,
        }
    }

    pub fn stage(&self) -> SnapshotStage {
        self.stage
    }

    pub fn exporter(&self) -> &SnapshotExporter<I, M> {
        &self.exporter
    }

    fn enter(&mut self, stage: SnapshotStage) {
        debug!(?stage, "Snapshot stage");
        self.stage = stage;
    }

    /// Runs a full snapshot with the names currently held by `control`.
    ///
    /// Empty names and failed writes are reported through `status` and skip the affected
    /// export; the matrix is only written after the image was. Configuration,
    /// acquisition and crop errors are returned. Either way the request is cleared and
    /// the camera and `preview_buffer` are back at preview resolution afterwards.
    #[instrument(skip_all, fields(capture = %self.capture_resolution, crop = %self.crop))]
    pub fn take_snapshot<C: Camera + ?Sized>(
        &mut self,
        camera: &mut C,
        preview_buffer: &mut FrameBuffer,
        control: &ControlHandle,
        status: &mut dyn StatusSink,
    ) -> Result<SnapshotReport> {
        info!("Taking snapshot");
        let names = control.export_names();

        let outcome = self.capture_and_export(camera, &names, status);
        let restored = self.restore(camera, preview_buffer, control);

        match (outcome, restored) {
            (Ok(report), Ok(())) => {
                info!(files = report.files_written(), "Snapshot complete");
                Ok(report)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(_), Err(restore_err)) => Err(restore_err),
            (Err(e), Err(restore_err)) => {
                error!(error = %restore_err, "Preview restore failed after snapshot error");
                Err(e)
            }
        }
    }

    fn capture_and_export<C: Camera + ?Sized>(
        &mut self,
        camera: &mut C,
        names: &ExportNames,
        status: &mut dyn StatusSink,
    ) -> Result<SnapshotReport> {
        let cropped = self.capture(camera)?;
        Ok(self.export(&cropped, names, status))
    }

    fn capture<C: Camera + ?Sized>(&mut self, camera: &mut C) -> Result<IntensityImage> {
        self.enter(SnapshotStage::ConfiguringCapture);
        {
            let _span = tracing::info_span!("configure_capture").entered();
            camera.set_resolution(self.capture_resolution)?;
        }

        self.enter(SnapshotStage::Capturing);
        let intensity = {
            let _span = tracing::info_span!("capture_frame").entered();
            let mut buffer = FrameBuffer::new(self.capture_resolution);
            camera.capture_into(&mut buffer)?;
            sum_channels(&buffer)?
        };

        self.enter(SnapshotStage::Cropping);
        let _span = tracing::info_span!("center_crop").entered();
        intensity.center_crop(self.crop)
    }

    fn export(
        &mut self,
        image: &IntensityImage,
        names: &ExportNames,
        status: &mut dyn StatusSink,
    ) -> SnapshotReport {
        let mut report = SnapshotReport::default();

        self.enter(SnapshotStage::ExportingImage);
        let image_path = {
            let _span = tracing::info_span!("export_image").entered();
            ExportTarget::new(names.picture.as_str(), ExportKind::Image)
                .and_then(|target| self.exporter.export_image(image, &target))
        };
        match image_path {
            Ok(path) => report.image = Some(path),
            Err(e) => {
                Self::report_export_failure(&e, status);
                return report;
            }
        }

        self.enter(SnapshotStage::ExportingMatrix);
        let _span = tracing::info_span!("export_matrix").entered();
        let target = match ExportTarget::new(names.matrix.as_str(), ExportKind::Matrix) {
            Ok(target) => target,
            Err(e) => {
                Self::report_export_failure(&e, status);
                return report;
            }
        };

        status.open(Notice::info(DATA_EXPORTING));
        let matrix_path = self.exporter.export_matrix(image, &target);
        status.dismiss();

        match matrix_path {
            Ok(path) => report.matrix = Some(path),
            Err(e) => Self::report_export_failure(&e, status),
        }
        report
    }

    fn report_export_failure(e: &ProfilerError, status: &mut dyn StatusSink) {
        if e.is_validation() {
            warn!(error = %e, "Export skipped");
            status.open(Notice::warning(e.to_string()));
        } else {
            error!(error = %e, "Export failed");
            status.open(Notice::error(e.to_string()));
        }
    }

    fn restore<C: Camera + ?Sized>(
        &mut self,
        camera: &mut C,
        preview_buffer: &mut FrameBuffer,
        control: &ControlHandle,
    ) -> Result<()> {
        self.enter(SnapshotStage::Restoring);
        let _span = tracing::info_span!("restore_preview").entered();

        control.clear_snapshot();
        *preview_buffer = FrameBuffer::for_config(&self.preview);
        camera.set_resolution(self.preview.resolution)?;

        self.enter(SnapshotStage::Previewing);
        Ok(())
    }
}
