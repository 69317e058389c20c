use std::io::Write;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{colortype, Compression, TiffEncoder};
use tracing::debug;

use crate::profiler::camera::Resolution;
use crate::profiler::common::error::{ProfilerError, Result};
use crate::profiler::export::types::{ImageFormatKind, TiffCompression};
use crate::profiler::export::writer::ImageWriter;

/// Single-channel 8-bit encoder: PNG through `image`, TIFF through `tiff`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardImageWriter {
    pub compression: TiffCompression,
}

impl StandardImageWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }

    fn write_png(&self, pixels: &[u8], resolution: Resolution, output: &mut dyn Write) -> Result<()> {
        PngEncoder::new(output)
            .write_image(
                pixels,
                resolution.width as u32,
                resolution.height as u32,
                ExtendedColorType::L8,
            )
            .map_err(|e| ProfilerError::EncodeError(e.to_string()))
    }

    fn write_tiff(&self, pixels: &[u8], resolution: Resolution, output: &mut dyn Write) -> Result<()> {
        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        // TIFF needs Seek, so encode in memory first
        let mut buffer = Vec::new();
        TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ProfilerError::EncodeError(e.to_string()))?
            .with_compression(compression)
            .write_image::<colortype::Gray8>(
                resolution.width as u32,
                resolution.height as u32,
                pixels,
            )
            .map_err(|e| ProfilerError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}

impl ImageWriter for StandardImageWriter {
    fn write_image(
        &self,
        pixels: &[u8],
        resolution: Resolution,
        format: ImageFormatKind,
        output: &mut dyn Write,
    ) -> Result<()> {
        if resolution.is_empty() || pixels.len() != resolution.pixel_count() {
            return Err(ProfilerError::InvalidDimensions(resolution.width, resolution.height));
        }
        debug!(%resolution, ?format, "Encoding grayscale image");

        match format {
            ImageFormatKind::Png => self.write_png(pixels, resolution, output),
            ImageFormatKind::Tiff => self.write_tiff(pixels, resolution, output),
        }
    }
}
