//! Intensity image types

use crate::profiler::camera::Resolution;
use crate::profiler::common::error::{ProfilerError, Result};

/// Single-channel image of `f32` intensities, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityImage {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl IntensityImage {
    /// Wraps `data`, which must hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(ProfilerError::InvalidDimensions(width, height));
        }
        Ok(Self { width, height, data })
    }

    pub fn zeros(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, vec![0.0; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.width)
    }

    pub fn stats(&self) -> FrameStats {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut peak_index = 0;

        for (i, &value) in self.data.iter().enumerate() {
            min = min.min(value);
            if value > max {
                max = value;
                peak_index = i;
            }
            sum += value as f64;
        }

        FrameStats {
            min,
            max,
            mean: (sum / self.data.len() as f64) as f32,
            peak: (peak_index % self.width, peak_index / self.width),
        }
    }
}

/// Summary of one intensity image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// (x, y) of the first maximum in row-major order
    pub peak: (usize, usize),
}
