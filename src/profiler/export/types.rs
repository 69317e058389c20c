//! Export target and format types

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::profiler::common::error::{ProfilerError, Result};

/// The two files a snapshot produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// 8-bit grayscale picture
    Image,
    /// Plain-text intensity matrix
    Matrix,
}

impl ExportKind {
    pub fn default_extension(&self) -> &'static str {
        match self {
            ExportKind::Image => "png",
            ExportKind::Matrix => "txt",
        }
    }

    /// Extensions kept as typed, compared case-insensitively.
    pub fn recognized_extensions(&self) -> &'static [&'static str] {
        match self {
            ExportKind::Image => &["png", "tif", "tiff"],
            ExportKind::Matrix => &["txt"],
        }
    }

    fn recognizes(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.recognized_extensions()
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Image => write!(f, "image"),
            ExportKind::Matrix => write!(f, "data"),
        }
    }
}

/// Trims `name` and appends the default extension for `kind` unless the name already
/// ends in a recognized one. Applying it twice gives the same result.
pub fn normalize_file_name(name: &str, kind: ExportKind) -> String {
    let name = name.trim();
    if kind.recognizes(name) {
        name.to_string()
    } else {
        format!("{}.{}", name, kind.default_extension())
    }
}

/// A validated, non-empty export file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    base_name: String,
    kind: ExportKind,
}

impl ExportTarget {
    /// Fails with [`ProfilerError::EmptyFileName`] if `base_name` is empty or whitespace.
    pub fn new(base_name: impl Into<String>, kind: ExportKind) -> Result<Self> {
        let base_name = base_name.into();
        if base_name.trim().is_empty() {
            return Err(ProfilerError::EmptyFileName(kind));
        }
        Ok(Self { base_name, kind })
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    pub fn file_name(&self) -> String {
        normalize_file_name(&self.base_name, self.kind)
    }
}

/// Container format of an image export, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormatKind {
    Png,
    Tiff,
}

impl ImageFormatKind {
    /// TIFF for `.tif` / `.tiff`, PNG otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tif") | Some("tiff") => ImageFormatKind::Tiff,
            _ => ImageFormatKind::Png,
        }
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl FromStr for TiffCompression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "none" => Ok(TiffCompression::None),
            "lzw" => Ok(TiffCompression::Lzw),
            "deflatefast" => Ok(TiffCompression::DeflateFast),
            "deflate" | "deflatebalanced" => Ok(TiffCompression::DeflateBalanced),
            "deflatebest" => Ok(TiffCompression::DeflateBest),
            other => Err(format!("unknown TIFF compression '{}'", other)),
        }
    }
}
