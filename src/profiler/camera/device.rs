use tracing::debug;

use crate::profiler::camera::buffer::FrameBuffer;
use crate::profiler::camera::types::{CameraConfig, ExposureMode, Resolution};
use crate::profiler::common::error::{ProfilerError, Result};

/// Control surface of a camera device.
///
/// Setters fail with [`ProfilerError::ConfigurationError`] when the device refuses a
/// value. `capture_into` blocks until one RGB frame is in the buffer.
pub trait Camera {
    fn set_resolution(&mut self, resolution: Resolution) -> Result<()>;
    fn set_frame_rate(&mut self, hz: u32) -> Result<()>;
    fn set_shutter(&mut self, microseconds: u32) -> Result<()>;
    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<()>;
    fn set_iso(&mut self, iso: u32) -> Result<()>;

    /// Resolution of the active configuration.
    fn resolution(&self) -> Resolution;

    fn capture_into(&mut self, buffer: &mut FrameBuffer) -> Result<()>;

    /// Continuous capture through one reused buffer.
    fn capture_continuous<'a>(&'a mut self, buffer: &'a mut FrameBuffer) -> FrameStream<'a, Self>
    where
        Self: Sized,
    {
        FrameStream::new(self, buffer)
    }
}

/// Applies every field of `config`, in the order resolution, frame rate, shutter,
/// exposure mode, ISO.
pub fn apply_config<C: Camera + ?Sized>(camera: &mut C, config: &CameraConfig) -> Result<()> {
    debug!(
        resolution = %config.resolution,
        frame_rate = config.frame_rate,
        shutter_us = config.shutter_speed_us,
        exposure = config.exposure_mode.name(),
        iso = config.iso,
        "Applying camera configuration"
    );
    camera.set_resolution(config.resolution)?;
    camera.set_frame_rate(config.frame_rate)?;
    camera.set_shutter(config.shutter_speed_us)?;
    camera.set_exposure_mode(config.exposure_mode)?;
    camera.set_iso(config.iso)?;
    Ok(())
}

/// Fails unless `buffer` was allocated for `active`.
pub fn ensure_buffer_matches(buffer: &FrameBuffer, active: Resolution) -> Result<()> {
    if buffer.resolution() != active {
        return Err(ProfilerError::BufferMismatch {
            expected: active,
            actual: buffer.resolution(),
        });
    }
    Ok(())
}

/// Frame-after-frame capture into a single buffer.
pub struct FrameStream<'a, C: Camera> {
    camera: &'a mut C,
    buffer: &'a mut FrameBuffer,
}

impl<'a, C: Camera> FrameStream<'a, C> {
    pub fn new(camera: &'a mut C, buffer: &'a mut FrameBuffer) -> Self {
        Self { camera, buffer }
    }

    /// Clears the buffer and blocks until the next frame is in it.
    pub fn next_frame(&mut self) -> Result<&FrameBuffer> {
        self.buffer.reset();
        self.camera.capture_into(&mut *self.buffer)?;
        Ok(&*self.buffer)
    }
}
