use tracing::{debug, trace};

use crate::profiler::camera::buffer::{FrameBuffer, RGB_CHANNELS};
use crate::profiler::camera::device::{ensure_buffer_matches, Camera};
use crate::profiler::camera::types::{CameraConfig, ExposureMode, Resolution};
use crate::profiler::common::error::{ProfilerError, Result};

const MAX_FRAME_RATE: u32 = 90;
const ISO_RANGE: std::ops::RangeInclusive<u32> = 100..=800;
const REFERENCE_SHUTTER_US: f32 = 500.0;
const REFERENCE_ISO: f32 = 150.0;

/// Gaussian spot rendered by [`SimulatedCamera`].
///
/// Positions and width are fractions of the frame so the same beam shows up in the
/// same place at preview and capture resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamModel {
    /// Horizontal center, 0.0 = left edge, 1.0 = right edge
    pub center_x: f32,
    /// Vertical center, 0.0 = top edge, 1.0 = bottom edge
    pub center_y: f32,
    /// Standard deviation as a fraction of the shorter frame side
    pub sigma: f32,
    /// Peak channel value at the reference exposure (500 us, ISO 150)
    pub peak: f32,
    /// Amplitude of the frame-to-frame wander of the center
    pub drift: f32,
    pub background: f32,
    /// Per-channel weight applied to the spot
    pub color: [f32; 3],
}

impl Default for BeamModel {
    fn default() -> Self {
        Self {
            center_x: 0.5,
            center_y: 0.5,
            sigma: 0.08,
            peak: 200.0,
            drift: 0.01,
            background: 2.0,
            color: [1.0, 0.35, 0.15],
        }
    }
}

/// Camera backend without hardware.
///
/// Accepts any resolution up to its sensor size and renders [`BeamModel`] into every
/// frame. Brightness follows shutter time and ISO in manual exposure mode.
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    sensor: Resolution,
    config: CameraConfig,
    beam: BeamModel,
    frame_index: u64,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::with_sensor(Resolution::CAPTURE)
    }

    pub fn with_sensor(sensor: Resolution) -> Self {
        Self {
            sensor,
            config: CameraConfig::preview(),
            beam: BeamModel::default(),
            frame_index: 0,
        }
    }

    pub fn with_beam(mut self, beam: BeamModel) -> Self {
        self.beam = beam;
        self
    }

    pub fn sensor(&self) -> Resolution {
        self.sensor
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn frames_captured(&self) -> u64 {
        self.frame_index
    }

    fn exposure_gain(&self) -> f32 {
        match self.config.exposure_mode {
            ExposureMode::Auto => 1.0,
            ExposureMode::Off => {
                let iso = if self.config.iso == 0 {
                    REFERENCE_ISO
                } else {
                    self.config.iso as f32
                };
                (self.config.shutter_speed_us as f32 / REFERENCE_SHUTTER_US) * (iso / REFERENCE_ISO)
            }
        }
    }

    fn render(&self, pixels: &mut [u8]) -> Result<()> {
        let Resolution { width, height } = self.config.resolution;
        let beam = &self.beam;

        let phase = self.frame_index as f32 * 0.1;
        let cx = (beam.center_x + beam.drift * phase.sin()) * width as f32;
        let cy = (beam.center_y + beam.drift * phase.cos()) * height as f32;
        let sigma = (beam.sigma * width.min(height) as f32).max(f32::EPSILON);
        let denom = 2.0 * sigma * sigma;
        let peak = beam.peak * self.exposure_gain();

        // exp(-(dx² + dy²) / 2σ²) = exp(-dx² / 2σ²) · exp(-dy² / 2σ²)
        let columns: Vec<f32> = (0..width)
            .map(|x| {
                let dx = x as f32 + 0.5 - cx;
                (-(dx * dx) / denom).exp()
            })
            .collect();

        for (y, row) in pixels.chunks_exact_mut(width * RGB_CHANNELS).enumerate() {
            let dy = y as f32 + 0.5 - cy;
            let row_weight = peak * (-(dy * dy) / denom).exp();
            for (pixel, column_weight) in row.chunks_exact_mut(RGB_CHANNELS).zip(&columns) {
                let spot = row_weight * column_weight;
                for (channel, weight) in pixel.iter_mut().zip(beam.color) {
                    *channel = (beam.background + spot * weight).clamp(0.0, 255.0) as u8;
                }
            }
        }

        Ok(())
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for SimulatedCamera {
    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        if resolution.is_empty() || !self.sensor.contains(resolution) {
            return Err(ProfilerError::ConfigurationError(format!(
                "resolution {} is not supported by a {} sensor",
                resolution, self.sensor
            )));
        }
        debug!(%resolution, "Simulated sensor mode switch");
        self.config.resolution = resolution;
        Ok(())
    }

    fn set_frame_rate(&mut self, hz: u32) -> Result<()> {
        if !(1..=MAX_FRAME_RATE).contains(&hz) {
            return Err(ProfilerError::ConfigurationError(format!(
                "frame rate {} Hz outside 1..={}",
                hz, MAX_FRAME_RATE
            )));
        }
        self.config.frame_rate = hz;
        Ok(())
    }

    fn set_shutter(&mut self, microseconds: u32) -> Result<()> {
        self.config.shutter_speed_us = microseconds;
        Ok(())
    }

    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<()> {
        self.config.exposure_mode = mode;
        Ok(())
    }

    fn set_iso(&mut self, iso: u32) -> Result<()> {
        // 0 selects automatic gain
        if iso != 0 && !ISO_RANGE.contains(&iso) {
            return Err(ProfilerError::ConfigurationError(format!(
                "ISO {} outside {}..={}",
                iso,
                ISO_RANGE.start(),
                ISO_RANGE.end()
            )));
        }
        self.config.iso = iso;
        Ok(())
    }

    fn resolution(&self) -> Resolution {
        self.config.resolution
    }

    fn capture_into(&mut self, buffer: &mut FrameBuffer) -> Result<()> {
        ensure_buffer_matches(buffer, self.config.resolution)?;
        buffer.fill_with(|pixels| self.render(pixels))?;
        self.frame_index += 1;
        trace!(frame = self.frame_index, "Simulated frame rendered");
        Ok(())
    }
}
