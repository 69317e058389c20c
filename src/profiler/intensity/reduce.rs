use tracing::instrument;

use crate::profiler::camera::{FrameBuffer, RGB_CHANNELS};
use crate::profiler::common::error::{ProfilerError, Result};
use crate::profiler::intensity::types::IntensityImage;

fn reduce<F>(buffer: &FrameBuffer, combine: F) -> Result<IntensityImage>
where
    F: Fn(f32, f32, f32) -> f32,
{
    let pixels = buffer.pixels().ok_or_else(|| {
        ProfilerError::AcquisitionError(format!("no frame captured into {} buffer", buffer.resolution()))
    })?;
    let resolution = buffer.resolution();

    let data = pixels
        .chunks_exact(RGB_CHANNELS)
        .map(|px| combine(px[0] as f32, px[1] as f32, px[2] as f32))
        .collect();

    IntensityImage::new(resolution.width, resolution.height, data)
}

/// Per-pixel arithmetic mean of R, G and B. Used for the live preview.
pub fn mean_channels(buffer: &FrameBuffer) -> Result<IntensityImage> {
    reduce(buffer, |r, g, b| (r + g + b) / 3.0)
}

/// Per-pixel sum of R, G and B (0..=765). Used for snapshots; not normalized.
#[instrument(skip(buffer), fields(resolution = %buffer.resolution()))]
pub fn sum_channels(buffer: &FrameBuffer) -> Result<IntensityImage> {
    reduce(buffer, |r, g, b| r + g + b)
}
