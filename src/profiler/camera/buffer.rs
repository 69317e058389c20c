use crate::profiler::camera::types::{CameraConfig, Resolution};
use crate::profiler::common::error::{ProfilerError, Result};

/// Interleaved RGB: three bytes per pixel.
pub const RGB_CHANNELS: usize = 3;

/// Reusable RGB frame storage sized for one resolution.
///
/// A buffer never changes size. When the camera switches resolution the owner allocates a
/// new one with [`FrameBuffer::for_config`]; cameras reject buffers whose resolution does
/// not match their active configuration.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    resolution: Resolution,
    data: Vec<u8>,
    filled: bool,
}

impl FrameBuffer {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            data: vec![0; resolution.pixel_count() * RGB_CHANNELS],
            filled: false,
        }
    }

    pub fn for_config(config: &CameraConfig) -> Self {
        Self::new(config.resolution)
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Size in bytes of one full frame.
    pub fn frame_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// The captured RGB pixels, or `None` if nothing was captured since the last reset.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.filled.then_some(self.data.as_slice())
    }

    /// Marks the buffer empty so it can take the next frame. The allocation is kept.
    pub fn reset(&mut self) {
        self.filled = false;
    }

    /// Copies one full frame in.
    pub fn write_frame(&mut self, rgb: &[u8]) -> Result<()> {
        if rgb.len() != self.data.len() {
            return Err(ProfilerError::AcquisitionError(format!(
                "frame holds {} bytes, expected {} for {}",
                rgb.len(),
                self.data.len(),
                self.resolution
            )));
        }
        self.data.copy_from_slice(rgb);
        self.filled = true;
        Ok(())
    }

    /// Lets a backend render straight into the storage. The frame counts as captured only
    /// if `render` succeeds.
    pub fn fill_with<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut [u8]) -> Result<()>,
    {
        self.filled = false;
        render(&mut self.data)?;
        self.filled = true;
        Ok(())
    }
}
