//! TOML configuration file
//!
//! Every key is optional; anything left out keeps the built-in default or whatever the
//! command line sets.
//!
//! ```toml
//! [preview]
//! resolution = "640x480"
//! frame_rate = 30
//! shutter_speed_us = 500
//! exposure_mode = "off"
//! iso = 150
//!
//! [capture]
//! resolution = "3280x2464"
//! crop = "1000x1000"
//!
//! [export]
//! output_dir = "captures"
//! picture_name = "beam"
//! matrix_name = "beam"
//! quantization = "saturate"
//! tiff_compression = "lzw"
//!
//! [session]
//! warmup_ms = 100
//! display_every = 30
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::profiler::{ExportNames, ProfilerConfigBuilder};

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub preview: PreviewSection,
    #[serde(default)]
    pub capture: CaptureSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PreviewSection {
    pub resolution: Option<String>,
    pub frame_rate: Option<u32>,
    pub shutter_speed_us: Option<u32>,
    pub exposure_mode: Option<String>,
    pub iso: Option<u32>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CaptureSection {
    pub resolution: Option<String>,
    pub crop: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub output_dir: Option<PathBuf>,
    pub picture_name: Option<String>,
    pub matrix_name: Option<String>,
    pub quantization: Option<String>,
    pub tiff_compression: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    pub warmup_ms: Option<u64>,
    pub snapshot_after: Option<u64>,
    pub exit_after_snapshot: Option<bool>,
    pub display_every: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

fn parse<T: FromStr<Err = String>>(key: &'static str, value: &Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .as_deref()
        .map(|s| s.parse::<T>())
        .transpose()
        .map_err(|reason| ConfigError::InvalidValue { key, reason })
}

impl FileConfig {
    /// Reads `path`. A missing file is an error since the path was asked for explicitly.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Layers the file's settings over `builder`.
    pub fn apply(&self, mut builder: ProfilerConfigBuilder) -> Result<ProfilerConfigBuilder, ConfigError> {
        let preview = &self.preview;
        if let Some(resolution) = parse("preview.resolution", &preview.resolution)? {
            builder = builder.preview_resolution(resolution);
        }
        if let Some(hz) = preview.frame_rate {
            builder = builder.frame_rate(hz);
        }
        if let Some(us) = preview.shutter_speed_us {
            builder = builder.shutter_speed_us(us);
        }
        if let Some(mode) = parse("preview.exposure_mode", &preview.exposure_mode)? {
            builder = builder.exposure_mode(mode);
        }
        if let Some(iso) = preview.iso {
            builder = builder.iso(iso);
        }

        if let Some(resolution) = parse("capture.resolution", &self.capture.resolution)? {
            builder = builder.capture_resolution(resolution);
        }
        if let Some(crop) = parse("capture.crop", &self.capture.crop)? {
            builder = builder.crop(crop);
        }

        let export = &self.export;
        if let Some(dir) = &export.output_dir {
            builder = builder.output_dir(dir.clone());
        }
        if let Some(quantization) = parse("export.quantization", &export.quantization)? {
            builder = builder.quantization(quantization);
        }
        if let Some(compression) = parse("export.tiff_compression", &export.tiff_compression)? {
            builder = builder.tiff_compression(compression);
        }

        let session = &self.session;
        if let Some(ms) = session.warmup_ms {
            builder = builder.warmup(Duration::from_millis(ms));
        }
        if let Some(frames) = session.snapshot_after {
            builder = builder.snapshot_after(frames);
        }
        if let Some(exit) = session.exit_after_snapshot {
            builder = builder.exit_after_snapshot(exit);
        }
        if let Some(every) = session.display_every {
            builder = builder.display_every(every);
        }

        Ok(builder)
    }

    /// Overrides `names` with the file's initial export names.
    pub fn apply_names(&self, names: &mut ExportNames) {
        if let Some(picture) = &self.export.picture_name {
            names.picture = picture.clone();
        }
        if let Some(matrix) = &self.export.matrix_name {
            names.matrix = matrix.clone();
        }
    }
}
