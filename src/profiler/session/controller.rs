use std::thread;

use tracing::{error, info, instrument};

use crate::profiler::camera::{apply_config, Camera, FrameBuffer};
use crate::profiler::common::error::{ProfilerError, Result};
use crate::profiler::export::{ImageWriter, MatrixWriter, StandardImageWriter, TextMatrixWriter};
use crate::profiler::notify::{Notice, PreviewSink, StatusSink};
use crate::profiler::session::handle::ControlHandle;
use crate::profiler::session::preview::run_preview;
use crate::profiler::session::snapshot::SnapshotPipeline;
use crate::profiler::session::types::{ProfilerConfig, RunSummary, SessionState};

/// Owns the camera and alternates between preview and snapshot until shut down.
pub struct ProfilerController<
    C: Camera,
    D: PreviewSink,
    S: StatusSink,
    I: ImageWriter = StandardImageWriter,
    M: MatrixWriter = TextMatrixWriter,
> {
    camera: C,
    display: D,
    status: S,
    pipeline: SnapshotPipeline<I, M>,
    config: ProfilerConfig,
    control: ControlHandle,
    state: SessionState,
    buffer: FrameBuffer,
    summary: RunSummary,
    auto_snapshot_sent: bool,
}

impl<C: Camera, D: PreviewSink, S: StatusSink> ProfilerController<C, D, S> {
    pub fn new(camera: C, display: D, status: S, config: ProfilerConfig) -> Self {
        let pipeline = SnapshotPipeline::new(&config);
        Self::with_pipeline(camera, display, status, pipeline, config)
    }
}

impl<C, D, S, I, M> ProfilerController<C, D, S, I, M>
where
    C: Camera,
    D: PreviewSink,
    S: StatusSink,
    I: ImageWriter,
    M: MatrixWriter,
{
    pub fn with_pipeline(
        camera: C,
        display: D,
        status: S,
        pipeline: SnapshotPipeline<I, M>,
        config: ProfilerConfig,
    ) -> Self {
        Self {
            camera,
            display,
            status,
            pipeline,
            buffer: FrameBuffer::for_config(&config.preview),
            config,
            control: ControlHandle::new(),
            state: SessionState::Previewing,
            summary: RunSummary::default(),
            auto_snapshot_sent: false,
        }
    }

    /// Replaces the control handle, e.g. with one already given to a console thread.
    pub fn with_control(mut self, control: ControlHandle) -> Self {
        self.control = control;
        self
    }

    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    pub fn request_snapshot(&self) {
        self.control.request_snapshot();
    }

    pub fn request_shutdown(&self) {
        self.control.request_shutdown();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn pipeline(&self) -> &SnapshotPipeline<I, M> {
        &self.pipeline
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Configures the camera for preview and loops until shutdown, the first snapshot
    /// when `exit_after_snapshot` is set, or a fatal error.
    ///
    /// Crop and export problems are reported through the status sink and preview
    /// resumes. Configuration and acquisition failures end the run.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> Result<RunSummary> {
        if let Err(e) = self.start() {
            return Err(self.fail(e));
        }

        loop {
            self.state = SessionState::Previewing;
            if let Err(e) = self.preview_until_paused() {
                return Err(self.fail(e));
            }

            if self.control.shutdown_requested() {
                info!("Shutdown requested, leaving preview");
                break;
            }

            self.state = SessionState::Capturing;
            self.summary.snapshots += 1;
            let result = self.pipeline.take_snapshot(
                &mut self.camera,
                &mut self.buffer,
                &self.control,
                &mut self.status,
            );
            self.state = SessionState::Previewing;

            match result {
                Ok(report) => self.summary.files_written += report.files_written(),
                Err(e) if !e.is_fatal() => {
                    error!(error = %e, "Snapshot failed");
                    self.status.open(Notice::error(e.to_string()));
                }
                Err(e) => return Err(self.fail(e)),
            }

            if self.config.exit_after_snapshot {
                info!("Snapshot taken, exiting");
                break;
            }
        }

        info!(
            preview_frames = self.summary.preview_frames,
            snapshots = self.summary.snapshots,
            files = self.summary.files_written,
            "Session finished"
        );
        Ok(self.summary)
    }

    fn start(&mut self) -> Result<()> {
        let _span = tracing::info_span!("configure_preview").entered();
        apply_config(&mut self.camera, &self.config.preview)?;
        self.buffer = FrameBuffer::for_config(&self.config.preview);
        if !self.config.warmup.is_zero() {
            thread::sleep(self.config.warmup);
        }
        info!(resolution = %self.config.preview.resolution, "Preview started");
        Ok(())
    }

    fn preview_until_paused(&mut self) -> Result<()> {
        let frames = run_preview(&mut self.camera, &mut self.buffer, &self.control);
        for frame in frames {
            let frame = frame?;
            self.display.show(&frame);
            self.summary.preview_frames += 1;

            let due = self
                .config
                .snapshot_after
                .is_some_and(|after| self.summary.preview_frames >= after);
            if due && !self.auto_snapshot_sent {
                self.auto_snapshot_sent = true;
                self.control.request_snapshot();
            }
        }
        Ok(())
    }

    fn fail(&mut self, e: ProfilerError) -> ProfilerError {
        error!(error = %e, "Profiler stopped");
        self.status.open(Notice::error(e.to_string()));
        e
    }
}
