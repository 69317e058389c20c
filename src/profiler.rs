//! Beam profiler acquisition pipeline
//!
//! This module provides the live preview loop, the camera mode switch, single-frame
//! capture, intensity reduction, cropping and dual-format (image + text matrix) export.

pub mod camera;
pub mod common;
pub mod export;
pub mod intensity;
pub mod notify;
pub mod session;

pub use common::{
    ProfilerError,
    Result,
};

pub use camera::{
    apply_config,
    ensure_buffer_matches,
    BeamModel,
    Camera,
    CameraConfig,
    ExposureMode,
    FrameBuffer,
    FrameStream,
    Resolution,
    SimulatedCamera,
    RGB_CHANNELS,
};

pub use intensity::{
    center_crop_region,
    mean_channels,
    sum_channels,
    CropRegion,
    FrameStats,
    IntensityImage,
    Quantization,
};

pub use export::{
    normalize_file_name,
    ExportKind,
    ExportTarget,
    ImageFormatKind,
    ImageWriter,
    MatrixWriter,
    SnapshotExporter,
    StandardImageWriter,
    TextMatrixWriter,
    TiffCompression,
};

pub use notify::{
    Notice,
    PreviewSink,
    Severity,
    StatsDisplay,
    StatusSink,
    TracingStatus,
};

pub use session::{
    run_preview,
    ControlHandle,
    ExportNames,
    PreviewStream,
    ProfilerConfig,
    ProfilerConfigBuilder,
    ProfilerController,
    RunSummary,
    SessionState,
    SnapshotPipeline,
    SnapshotReport,
    SnapshotStage,
};
