use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::profiler::common::error::{ProfilerError, Result};
use crate::profiler::export::image_writer::StandardImageWriter;
use crate::profiler::export::matrix_writer::TextMatrixWriter;
use crate::profiler::export::types::{ExportTarget, ImageFormatKind, TiffCompression};
use crate::profiler::export::writer::{ImageWriter, MatrixWriter};
use crate::profiler::intensity::{IntensityImage, Quantization};

/// Writes a snapshot's image and matrix files.
pub struct SnapshotExporter<I: ImageWriter, M: MatrixWriter> {
    image_writer: I,
    matrix_writer: M,
    output_dir: Option<PathBuf>,
    quantization: Quantization,
}

impl SnapshotExporter<StandardImageWriter, TextMatrixWriter> {
    pub fn new(compression: TiffCompression, quantization: Quantization) -> Self {
        Self::with_custom(StandardImageWriter::new(compression), TextMatrixWriter, quantization)
    }
}

impl Default for SnapshotExporter<StandardImageWriter, TextMatrixWriter> {
    fn default() -> Self {
        Self::new(TiffCompression::default(), Quantization::default())
    }
}

impl<I: ImageWriter, M: MatrixWriter> SnapshotExporter<I, M> {
    pub fn with_custom(image_writer: I, matrix_writer: M, quantization: Quantization) -> Self {
        Self {
            image_writer,
            matrix_writer,
            output_dir: None,
            quantization,
        }
    }

    /// Relative file names resolve against `dir` instead of the working directory.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: Option<P>) -> Self {
        self.output_dir = dir.map(Into::into);
        self
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn quantization(&self) -> Quantization {
        self.quantization
    }

    pub fn resolve(&self, target: &ExportTarget) -> PathBuf {
        let file_name = target.file_name();
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Writes fully encoded `bytes` to `path`. A partially written file is removed.
    fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
        let written = File::create(path).and_then(|mut file| {
            file.write_all(bytes)?;
            file.flush()
        });
        written.map_err(|e| {
            let _ = fs::remove_file(path);
            ProfilerError::OutputWriteError(format!("{}: {}", path.display(), e))
        })
    }

    /// Saves `image` as 8-bit grayscale; `.tif`/`.tiff` names become TIFF, all else PNG.
    #[instrument(skip(self, image), fields(target = target.base_name()))]
    pub fn export_image(&self, image: &IntensityImage, target: &ExportTarget) -> Result<PathBuf> {
        let path = self.resolve(target);
        let pixels = image.to_gray8(self.quantization);

        let mut encoded = Vec::new();
        self.image_writer.write_image(
            &pixels,
            image.resolution(),
            ImageFormatKind::from_path(&path),
            &mut encoded,
        )?;
        Self::persist(&path, &encoded)?;

        info!(path = %path.display(), "Image saved");
        Ok(path)
    }

    /// Saves the unquantized intensities as text.
    #[instrument(skip(self, image), fields(target = target.base_name()))]
    pub fn export_matrix(&self, image: &IntensityImage, target: &ExportTarget) -> Result<PathBuf> {
        let path = self.resolve(target);

        let mut text = Vec::new();
        self.matrix_writer.write_matrix(image, &mut text)?;
        Self::persist(&path, &text)?;

        info!(path = %path.display(), "Matrix saved");
        Ok(path)
    }
}
