#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;

    use tempfile::TempDir;

    use crate::profiler::camera::{ensure_buffer_matches, Camera, ExposureMode, FrameBuffer, Resolution};
    use crate::profiler::common::error::{ProfilerError, Result};
    use crate::profiler::export::{
        ImageFormatKind, ImageWriter, SnapshotExporter, TextMatrixWriter,
    };
    use crate::profiler::intensity::{IntensityImage, Quantization};
    use crate::profiler::notify::{Notice, PreviewSink, Severity, StatusSink};
    use crate::profiler::session::{
        ControlHandle, ExportNames, ProfilerConfig, ProfilerController, RunSummary,
        SessionState, SnapshotPipeline, SnapshotStage, DATA_EXPORTING,
    };

    #[derive(Debug, Clone, Copy)]
    enum Trigger {
        Snapshot,
        Shutdown,
    }

    /// Camera that fills every frame with one RGB value and fires control actions after
    /// given capture counts.
    struct MockCamera {
        active: Resolution,
        max: Resolution,
        reject: Option<Resolution>,
        fail_at: Option<u64>,
        rgb: [u8; 3],
        control: ControlHandle,
        triggers: Vec<(u64, Trigger)>,
        captures: u64,
        resolution_calls: Vec<Resolution>,
        captured_at: Vec<Resolution>,
    }

    impl MockCamera {
        fn new(control: &ControlHandle) -> Self {
            Self {
                active: Resolution::PREVIEW,
                max: Resolution::CAPTURE,
                reject: None,
                fail_at: None,
                rgb: [100, 100, 100],
                control: control.clone(),
                triggers: Vec::new(),
                captures: 0,
                resolution_calls: Vec::new(),
                captured_at: Vec::new(),
            }
        }

        fn trigger(mut self, after_capture: u64, trigger: Trigger) -> Self {
            self.triggers.push((after_capture, trigger));
            self
        }
    }

    impl Camera for MockCamera {
        fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
            if self.reject == Some(resolution) || !self.max.contains(resolution) {
                return Err(ProfilerError::ConfigurationError(format!("{} unsupported", resolution)));
            }
            self.resolution_calls.push(resolution);
            self.active = resolution;
            Ok(())
        }

        fn set_frame_rate(&mut self, _hz: u32) -> Result<()> {
            Ok(())
        }

        fn set_shutter(&mut self, _microseconds: u32) -> Result<()> {
            Ok(())
        }

        fn set_exposure_mode(&mut self, _mode: ExposureMode) -> Result<()> {
            Ok(())
        }

        fn set_iso(&mut self, _iso: u32) -> Result<()> {
            Ok(())
        }

        fn resolution(&self) -> Resolution {
            self.active
        }

        fn capture_into(&mut self, buffer: &mut FrameBuffer) -> Result<()> {
            ensure_buffer_matches(buffer, self.active)?;
            self.captures += 1;
            if self.fail_at == Some(self.captures) {
                return Err(ProfilerError::AcquisitionError("sensor timeout".to_string()));
            }

            let rgb = self.rgb;
            buffer.fill_with(|pixels| {
                for pixel in pixels.chunks_exact_mut(3) {
                    pixel.copy_from_slice(&rgb);
                }
                Ok(())
            })?;
            self.captured_at.push(self.active);

            for &(at, trigger) in &self.triggers {
                if at == self.captures {
                    match trigger {
                        Trigger::Snapshot => self.control.request_snapshot(),
                        Trigger::Shutdown => self.control.request_shutdown(),
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Debug, PartialEq)]
    enum StatusEvent {
        Open(Notice),
        Dismiss,
    }

    #[derive(Default)]
    struct RecordingStatus {
        events: Vec<StatusEvent>,
    }

    impl RecordingStatus {
        fn notices(&self, severity: Severity) -> Vec<&Notice> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    StatusEvent::Open(notice) if notice.severity == severity => Some(notice),
                    _ => None,
                })
                .collect()
        }

        fn opened(&self, message: &str) -> bool {
            self.events
                .iter()
                .any(|event| matches!(event, StatusEvent::Open(notice) if notice.message == message))
        }
    }

    impl StatusSink for RecordingStatus {
        fn open(&mut self, notice: Notice) {
            self.events.push(StatusEvent::Open(notice));
        }

        fn dismiss(&mut self) {
            self.events.push(StatusEvent::Dismiss);
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        frames: u64,
        last: Option<(Resolution, f32)>,
    }

    impl PreviewSink for RecordingDisplay {
        fn show(&mut self, frame: &IntensityImage) {
            self.frames += 1;
            self.last = Some((frame.resolution(), frame.data()[0]));
        }
    }

    struct FailingImageWriter;

    impl ImageWriter for FailingImageWriter {
        fn write_image(
            &self,
            _pixels: &[u8],
            _resolution: Resolution,
            _format: ImageFormatKind,
            _output: &mut dyn Write,
        ) -> Result<()> {
            Err(ProfilerError::EncodeError("Mock encode error".to_string()))
        }
    }

    type Session = ProfilerController<MockCamera, RecordingDisplay, RecordingStatus>;

    fn small_config(dir: &Path) -> ProfilerConfig {
        ProfilerConfig::builder()
            .capture_resolution(Resolution::new(40, 30))
            .crop(Resolution::new(20, 20))
            .output_dir(dir)
            .warmup(Duration::ZERO)
            .display_every(0)
            .build()
    }

    fn session(camera: MockCamera, config: ProfilerConfig, control: ControlHandle) -> Session {
        ProfilerController::new(
            camera,
            RecordingDisplay::default(),
            RecordingStatus::default(),
            config,
        )
        .with_control(control)
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn assert_back_in_preview(session: &Session, control: &ControlHandle) {
        assert_eq!(session.camera().resolution(), Resolution::PREVIEW);
        assert_eq!(session.frame_buffer().resolution(), Resolution::PREVIEW);
        assert_eq!(session.state(), SessionState::Previewing);
        assert!(!control.snapshot_requested());
    }

    #[test]
    fn test_full_resolution_snapshot_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let camera = MockCamera::new(&control).trigger(2, Trigger::Snapshot);
        let config = ProfilerConfig::builder()
            .output_dir(dir.path())
            .warmup(Duration::ZERO)
            .exit_after_snapshot(true)
            .build();

        let mut session = session(camera, config, control.clone());
        let summary = session.run().unwrap();

        assert_eq!(
            summary,
            RunSummary {
                preview_frames: 2,
                snapshots: 1,
                files_written: 2,
            }
        );
        assert_eq!(files_in(dir.path()), vec!["data.txt", "sample.png"]);

        let image = image::open(dir.path().join("sample.png")).unwrap();
        assert_eq!(image.color(), image::ColorType::L8);
        let image = image.into_luma8();
        assert_eq!(image.dimensions(), (1000, 1000));
        // channel sum 300 saturates
        assert_eq!(image.get_pixel(500, 500).0, [255]);

        let matrix = std::fs::read_to_string(dir.path().join("data.txt")).unwrap();
        assert_eq!(matrix.lines().count(), 1000);
        assert!(matrix.starts_with("[[300., 300.,"));

        assert_eq!(
            session.camera().resolution_calls,
            vec![Resolution::PREVIEW, Resolution::CAPTURE, Resolution::PREVIEW]
        );
        assert_eq!(
            session.camera().captured_at,
            vec![Resolution::PREVIEW, Resolution::PREVIEW, Resolution::CAPTURE]
        );
        assert_back_in_preview(&session, &control);
        assert_eq!(session.pipeline().stage(), SnapshotStage::Previewing);
    }

    #[test]
    fn test_matrix_export_is_announced() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let camera = MockCamera::new(&control).trigger(1, Trigger::Snapshot);
        let config = ProfilerConfig {
            exit_after_snapshot: true,
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control);
        session.run().unwrap();

        let events = &session.status().events;
        let open = events
            .iter()
            .position(|e| *e == StatusEvent::Open(Notice::info(DATA_EXPORTING)))
            .unwrap();
        assert_eq!(events[open + 1], StatusEvent::Dismiss);
        assert!(session.status().notices(Severity::Warning).is_empty());
        assert!(session.status().notices(Severity::Error).is_empty());
    }

    #[test]
    fn test_empty_picture_name_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("", "data"));
        let camera = MockCamera::new(&control)
            .trigger(2, Trigger::Snapshot)
            .trigger(4, Trigger::Shutdown);

        let mut session = session(camera, small_config(dir.path()), control.clone());
        let summary = session.run().unwrap();

        assert!(files_in(dir.path()).is_empty());
        let warnings = session.status().notices(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Please type a filename for image export");
        assert!(!session.status().opened(DATA_EXPORTING));

        // captures 1, 2 and 4 are preview frames, 3 is the snapshot
        assert_eq!(summary.preview_frames, 3);
        assert_eq!(summary.snapshots, 1);
        assert_eq!(summary.files_written, 0);
        assert_eq!(session.display().frames, 3);
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_whitespace_picture_name_counts_as_empty() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("   ", "data"));
        let camera = MockCamera::new(&control).trigger(1, Trigger::Snapshot);
        let config = ProfilerConfig {
            exit_after_snapshot: true,
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control);
        session.run().unwrap();

        assert!(files_in(dir.path()).is_empty());
        assert_eq!(session.status().notices(Severity::Warning).len(), 1);
    }

    #[test]
    fn test_empty_matrix_name_keeps_image() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("img.png", ""));
        let camera = MockCamera::new(&control).trigger(1, Trigger::Snapshot);
        let config = ProfilerConfig {
            exit_after_snapshot: true,
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control.clone());
        let summary = session.run().unwrap();

        assert_eq!(files_in(dir.path()), vec!["img.png"]);
        assert_eq!(summary.files_written, 1);

        let warnings = session.status().notices(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Please type a filename for data export");

        let image = image::open(dir.path().join("img.png")).unwrap();
        assert_eq!((image.width(), image.height()), (20, 20));
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_crop_larger_than_capture_is_reported() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let camera = MockCamera::new(&control)
            .trigger(1, Trigger::Snapshot)
            .trigger(3, Trigger::Shutdown);
        let config = ProfilerConfig {
            capture_resolution: Resolution::new(500, 500),
            crop: Resolution::CROP,
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control.clone());
        let summary = session.run().unwrap();

        assert!(files_in(dir.path()).is_empty());
        let errors = session.status().notices(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Crop region 1000x1000 exceeds captured frame 500x500"
        );
        assert_eq!(summary.preview_frames, 2);
        assert_eq!(summary.files_written, 0);
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_zero_crop_is_reported_and_preview_resumes() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let camera = MockCamera::new(&control)
            .trigger(1, Trigger::Snapshot)
            .trigger(3, Trigger::Shutdown);
        let config = ProfilerConfig {
            crop: Resolution::new(0, 20),
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control.clone());
        let summary = session.run().unwrap();

        assert!(files_in(dir.path()).is_empty());
        let errors = session.status().notices(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Invalid image dimensions: width=0, height=20");
        assert_eq!(summary.preview_frames, 2);
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_write_failure_skips_matrix_and_resumes() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let camera = MockCamera::new(&control)
            .trigger(1, Trigger::Snapshot)
            .trigger(3, Trigger::Shutdown);
        let config = small_config(&dir.path().join("missing"));

        let mut session = session(camera, config, control.clone());
        let summary = session.run().unwrap();

        let errors = session.status().notices(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Failed to write output file"));
        assert!(!session.status().opened(DATA_EXPORTING));
        assert_eq!(summary.files_written, 0);
        assert_eq!(summary.preview_frames, 2);
        assert!(files_in(dir.path()).is_empty());
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_rejected_capture_configuration_is_fatal() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let mut camera = MockCamera::new(&control).trigger(1, Trigger::Snapshot);
        camera.reject = Some(Resolution::new(40, 30));

        let mut session = session(camera, small_config(dir.path()), control.clone());
        let result = session.run();

        assert!(matches!(result, Err(ProfilerError::ConfigurationError(_))));
        let last = session.status().events.last().unwrap();
        assert!(matches!(last, StatusEvent::Open(notice) if notice.severity == Severity::Error));
        assert!(files_in(dir.path()).is_empty());
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_rejected_preview_configuration_stops_before_streaming() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::new();
        let mut camera = MockCamera::new(&control);
        camera.max = Resolution::new(320, 240);

        let mut session = session(camera, small_config(dir.path()), control);
        let result = session.run();

        assert!(matches!(result, Err(ProfilerError::ConfigurationError(_))));
        assert_eq!(session.summary().preview_frames, 0);
        assert_eq!(session.camera().captures, 0);
    }

    #[test]
    fn test_acquisition_failure_ends_run() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::new();
        let mut camera = MockCamera::new(&control);
        camera.fail_at = Some(3);

        let mut session = session(camera, small_config(dir.path()), control);
        let result = session.run();

        assert!(matches!(result, Err(ProfilerError::AcquisitionError(_))));
        assert_eq!(session.summary().preview_frames, 2);
        assert_eq!(session.status().notices(Severity::Error).len(), 1);
    }

    #[test]
    fn test_preview_reduces_by_mean() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::new();
        let mut camera = MockCamera::new(&control).trigger(2, Trigger::Shutdown);
        camera.rgb = [30, 60, 90];

        let mut session = session(camera, small_config(dir.path()), control);
        session.run().unwrap();

        assert_eq!(session.display().frames, 2);
        assert_eq!(session.display().last, Some((Resolution::PREVIEW, 60.0)));
    }

    #[test]
    fn test_automatic_snapshot_after_frames() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("auto", "auto"));
        let camera = MockCamera::new(&control);
        let config = ProfilerConfig {
            snapshot_after: Some(3),
            exit_after_snapshot: true,
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control);
        let summary = session.run().unwrap();

        assert_eq!(summary.preview_frames, 3);
        assert_eq!(summary.snapshots, 1);
        assert_eq!(files_in(dir.path()), vec!["auto.png", "auto.txt"]);
    }

    #[test]
    fn test_pending_request_waits_for_one_preview_frame() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("first", "first"));
        control.request_snapshot();
        control.request_snapshot();
        let camera = MockCamera::new(&control);
        let config = ProfilerConfig {
            exit_after_snapshot: true,
            ..small_config(dir.path())
        };

        let mut session = session(camera, config, control.clone());
        let summary = session.run().unwrap();

        assert_eq!(summary.preview_frames, 1);
        assert_eq!(session.display().frames, 1);
        assert_eq!(
            session.camera().captured_at,
            vec![Resolution::PREVIEW, Resolution::new(40, 30)]
        );
        assert_eq!(summary.snapshots, 1);
        assert_eq!(summary.files_written, 2);
        assert_back_in_preview(&session, &control);
    }

    #[test]
    fn test_names_are_read_when_snapshot_starts() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::new();
        let camera = MockCamera::new(&control)
            .trigger(1, Trigger::Snapshot)
            .trigger(3, Trigger::Snapshot)
            .trigger(5, Trigger::Shutdown);

        let mut session = session(camera, small_config(dir.path()), control.clone());
        control.set_picture_name("beam");
        control.set_matrix_name("beam");
        let summary = session.run().unwrap();

        assert_eq!(summary.snapshots, 2);
        // second snapshot overwrites the first
        assert_eq!(files_in(dir.path()), vec!["beam.png", "beam.txt"]);
        assert_eq!(summary.files_written, 4);
    }

    #[test]
    fn test_encoder_failure_skips_matrix() {
        let dir = TempDir::new().unwrap();
        let control = ControlHandle::with_names(ExportNames::new("sample", "data"));
        let config = small_config(dir.path());
        let exporter =
            SnapshotExporter::with_custom(FailingImageWriter, TextMatrixWriter, Quantization::Saturate)
                .with_output_dir(config.output_dir.clone());
        let mut pipeline = SnapshotPipeline::with_exporter(exporter, &config);

        let mut camera = MockCamera::new(&control);
        let mut preview_buffer = FrameBuffer::new(Resolution::PREVIEW);
        let mut status = RecordingStatus::default();
        control.request_snapshot();

        let report = pipeline
            .take_snapshot(&mut camera, &mut preview_buffer, &control, &mut status)
            .unwrap();

        assert_eq!(report.files_written(), 0);
        assert!(!dir.path().join("sample.png").exists());
        assert!(!dir.path().join("data.txt").exists());
        let errors = status.notices(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Failed to encode image: Mock encode error");
        assert_eq!(pipeline.stage(), SnapshotStage::Previewing);
        assert_eq!(camera.resolution(), Resolution::PREVIEW);
        assert_eq!(preview_buffer.resolution(), Resolution::PREVIEW);
        assert!(!control.snapshot_requested());
    }
}
