//! Session configuration and bookkeeping types

use std::path::PathBuf;
use std::time::Duration;

use crate::profiler::camera::{CameraConfig, ExposureMode, Resolution};
use crate::profiler::export::TiffCompression;
use crate::profiler::intensity::Quantization;

/// File names typed by the user for the next snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportNames {
    pub picture: String,
    pub matrix: String,
}

impl ExportNames {
    pub fn new(picture: impl Into<String>, matrix: impl Into<String>) -> Self {
        Self {
            picture: picture.into(),
            matrix: matrix.into(),
        }
    }
}

/// Configuration for a profiling session
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    /// Live preview camera settings
    pub preview: CameraConfig,
    /// Still capture resolution; all other settings come from `preview`
    pub capture_resolution: Resolution,
    /// Size of the centered region that gets exported
    pub crop: Resolution,
    pub quantization: Quantization,
    /// Compression for `.tif`/`.tiff` image exports
    pub tiff_compression: TiffCompression,
    /// Directory relative export names resolve against (working directory if unset)
    pub output_dir: Option<PathBuf>,
    /// Sensor settling time after the first configuration
    pub warmup: Duration,
    /// Request a snapshot automatically after this many preview frames
    pub snapshot_after: Option<u64>,
    /// Stop the session once the first snapshot completes
    pub exit_after_snapshot: bool,
    /// Log preview statistics every N frames (0 = never)
    pub display_every: u64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            preview: CameraConfig::preview(),
            capture_resolution: Resolution::CAPTURE,
            crop: Resolution::CROP,
            quantization: Quantization::default(),
            tiff_compression: TiffCompression::default(),
            output_dir: None,
            warmup: Duration::from_millis(100),
            snapshot_after: None,
            exit_after_snapshot: false,
            display_every: 30,
        }
    }
}

impl ProfilerConfig {
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    pub fn capture_config(&self) -> CameraConfig {
        self.preview.with_resolution(self.capture_resolution)
    }
}

/// Builder for ProfilerConfig
#[derive(Debug, Default, Clone)]
pub struct ProfilerConfigBuilder {
    preview_resolution: Option<Resolution>,
    frame_rate: Option<u32>,
    shutter_speed_us: Option<u32>,
    exposure_mode: Option<ExposureMode>,
    iso: Option<u32>,
    capture_resolution: Option<Resolution>,
    crop: Option<Resolution>,
    quantization: Option<Quantization>,
    tiff_compression: Option<TiffCompression>,
    output_dir: Option<PathBuf>,
    warmup: Option<Duration>,
    snapshot_after: Option<u64>,
    exit_after_snapshot: Option<bool>,
    display_every: Option<u64>,
}

impl ProfilerConfigBuilder {
    pub fn preview_resolution(mut self, resolution: Resolution) -> Self {
        self.preview_resolution = Some(resolution);
        self
    }

    pub fn frame_rate(mut self, hz: u32) -> Self {
        self.frame_rate = Some(hz);
        self
    }

    pub fn shutter_speed_us(mut self, microseconds: u32) -> Self {
        self.shutter_speed_us = Some(microseconds);
        self
    }

    pub fn exposure_mode(mut self, mode: ExposureMode) -> Self {
        self.exposure_mode = Some(mode);
        self
    }

    pub fn iso(mut self, iso: u32) -> Self {
        self.iso = Some(iso);
        self
    }

    pub fn capture_resolution(mut self, resolution: Resolution) -> Self {
        self.capture_resolution = Some(resolution);
        self
    }

    pub fn crop(mut self, crop: Resolution) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = Some(quantization);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn warmup(mut self, warmup: Duration) -> Self {
        self.warmup = Some(warmup);
        self
    }

    pub fn snapshot_after(mut self, frames: u64) -> Self {
        self.snapshot_after = Some(frames);
        self
    }

    pub fn exit_after_snapshot(mut self, exit: bool) -> Self {
        self.exit_after_snapshot = Some(exit);
        self
    }

    pub fn display_every(mut self, frames: u64) -> Self {
        self.display_every = Some(frames);
        self
    }

    pub fn build(self) -> ProfilerConfig {
        let default = ProfilerConfig::default();
        let preview = CameraConfig {
            resolution: self.preview_resolution.unwrap_or(default.preview.resolution),
            frame_rate: self.frame_rate.unwrap_or(default.preview.frame_rate),
            shutter_speed_us: self.shutter_speed_us.unwrap_or(default.preview.shutter_speed_us),
            exposure_mode: self.exposure_mode.unwrap_or(default.preview.exposure_mode),
            iso: self.iso.unwrap_or(default.preview.iso),
        };
        ProfilerConfig {
            preview,
            capture_resolution: self.capture_resolution.unwrap_or(default.capture_resolution),
            crop: self.crop.unwrap_or(default.crop),
            quantization: self.quantization.unwrap_or(default.quantization),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            output_dir: self.output_dir.or(default.output_dir),
            warmup: self.warmup.unwrap_or(default.warmup),
            snapshot_after: self.snapshot_after.or(default.snapshot_after),
            exit_after_snapshot: self.exit_after_snapshot.unwrap_or(default.exit_after_snapshot),
            display_every: self.display_every.unwrap_or(default.display_every),
        }
    }
}

/// Which half of the two-state loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Previewing,
    Capturing,
}

/// Progress of one snapshot. `Restoring` is reached whatever happened before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStage {
    Idle,
    ConfiguringCapture,
    Capturing,
    Cropping,
    ExportingImage,
    ExportingMatrix,
    Restoring,
    Previewing,
}

/// Files written by one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub image: Option<PathBuf>,
    pub matrix: Option<PathBuf>,
}

impl SnapshotReport {
    pub fn files_written(&self) -> u64 {
        self.image.is_some() as u64 + self.matrix.is_some() as u64
    }
}

/// Totals for one `run()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub preview_frames: u64,
    /// Snapshot attempts, including ones that ended in a reported error
    pub snapshots: u64,
    pub files_written: u64,
}
