//! Snapshot export module
//!
//! Writes a cropped intensity image twice: as an 8-bit grayscale picture (PNG or TIFF)
//! and as a plain-text numeric matrix.

mod exporter;
mod image_writer;
mod matrix_writer;
pub mod types;
mod writer;

pub use exporter::SnapshotExporter;
pub use image_writer::StandardImageWriter;
pub use matrix_writer::TextMatrixWriter;
pub use types::{normalize_file_name, ExportKind, ExportTarget, ImageFormatKind, TiffCompression};
pub use writer::{ImageWriter, MatrixWriter};
