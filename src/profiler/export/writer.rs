use std::io::Write;

use crate::profiler::camera::Resolution;
use crate::profiler::common::error::Result;
use crate::profiler::export::types::ImageFormatKind;
use crate::profiler::intensity::IntensityImage;

pub trait ImageWriter {
    /// Encodes row-major 8-bit grayscale `pixels`.
    fn write_image(
        &self,
        pixels: &[u8],
        resolution: Resolution,
        format: ImageFormatKind,
        output: &mut dyn Write,
    ) -> Result<()>;
}

pub trait MatrixWriter {
    fn write_matrix(&self, image: &IntensityImage, output: &mut dyn Write) -> Result<()>;
}
