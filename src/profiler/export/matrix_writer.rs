use std::fmt::Write as _;
use std::io::Write;

use tracing::debug;

use crate::profiler::common::error::Result;
use crate::profiler::export::writer::MatrixWriter;
use crate::profiler::intensity::IntensityImage;

/// Writes the whole matrix as nested, comma-separated rows:
///
/// ```text
/// [[  0.,  12., 765.],
///  [  3.,   4.,   5.]]
/// ```
///
/// Whole numbers keep a trailing `.`; every value is right-aligned to the widest one.
/// Lines are never wrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMatrixWriter;

impl TextMatrixWriter {
    fn format_value(value: f32, out: &mut String) {
        out.clear();
        if value.is_finite() && value.fract() == 0.0 {
            let _ = write!(out, "{}.", value);
        } else {
            let _ = write!(out, "{}", value);
        }
    }
}

impl MatrixWriter for TextMatrixWriter {
    fn write_matrix(&self, image: &IntensityImage, output: &mut dyn Write) -> Result<()> {
        let mut cell = String::new();

        let width = image
            .data()
            .iter()
            .map(|&v| {
                Self::format_value(v, &mut cell);
                cell.len()
            })
            .max()
            .unwrap_or(0);

        debug!(rows = image.height(), cols = image.width(), width, "Formatting matrix");

        output.write_all(b"[")?;
        for (y, row) in image.rows().enumerate() {
            if y > 0 {
                output.write_all(b",\n ")?;
            }
            output.write_all(b"[")?;
            for (x, &value) in row.iter().enumerate() {
                if x > 0 {
                    output.write_all(b", ")?;
                }
                Self::format_value(value, &mut cell);
                write!(output, "{:>width$}", cell, width = width)?;
            }
            output.write_all(b"]")?;
        }
        output.write_all(b"]")?;
        Ok(())
    }
}
