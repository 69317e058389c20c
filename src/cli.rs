//! Command line arguments

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};

use crate::profiler::{ExportNames, ProfilerConfigBuilder, Quantization, TiffCompression};

/// Laser beam profiler: live intensity preview with on-demand full-resolution snapshots
#[derive(Parser, Debug)]
#[command(name = "beam-profiler")]
#[command(version, about = "Laser beam profiler with live preview and full-resolution snapshots", long_about = None)]
pub struct Args {
    /// Camera backend
    #[arg(long, default_value = "simulated")]
    pub camera: CameraBackend,

    /// V4L2 device node (v4l backend only)
    #[arg(long, default_value = "/dev/video0")]
    pub device: PathBuf,

    /// TOML config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Initial picture file name
    #[arg(long, short = 'p')]
    pub pic_name: Option<String>,

    /// Initial matrix file name
    #[arg(long, short = 'm')]
    pub matrix_name: Option<String>,

    /// Directory for exported files
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Take a snapshot automatically after this many preview frames
    #[arg(long)]
    pub snapshot_after: Option<u64>,

    /// Exit once the first snapshot is done
    #[arg(long)]
    pub exit_after_snapshot: bool,

    /// 8-bit conversion for saved images: saturate, wrap
    #[arg(long, value_parser = Quantization::from_str)]
    pub quantization: Option<Quantization>,

    /// Compression for .tif/.tiff images: none, lzw, deflate-fast, deflate-balanced, deflate-best
    #[arg(long, value_parser = TiffCompression::from_str)]
    pub tiff_compression: Option<TiffCompression>,

    /// Log preview statistics every N frames (0 disables)
    #[arg(long)]
    pub display_every: Option<u64>,

    /// Do not read commands from stdin
    #[arg(long)]
    pub no_console: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CameraBackend {
    /// Synthetic Gaussian beam, no hardware needed
    #[default]
    Simulated,
    /// Video4Linux2 device (requires the `v4l` feature)
    V4l,
}

impl Args {
    /// Layers command line settings over `builder`; flags win over the config file.
    pub fn apply(&self, mut builder: ProfilerConfigBuilder) -> ProfilerConfigBuilder {
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir.clone());
        }
        if let Some(frames) = self.snapshot_after {
            builder = builder.snapshot_after(frames);
        }
        if self.exit_after_snapshot {
            builder = builder.exit_after_snapshot(true);
        }
        if let Some(q) = self.quantization {
            builder = builder.quantization(q);
        }
        if let Some(c) = self.tiff_compression {
            builder = builder.tiff_compression(c);
        }
        if let Some(every) = self.display_every {
            builder = builder.display_every(every);
        }
        builder
    }

    pub fn apply_names(&self, names: &mut ExportNames) {
        if let Some(picture) = &self.pic_name {
            names.picture = picture.clone();
        }
        if let Some(matrix) = &self.matrix_name {
            names.matrix = matrix.clone();
        }
    }
}
