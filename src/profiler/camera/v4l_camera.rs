use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::control::{Control, Value};
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::capture::Parameters;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use crate::profiler::camera::buffer::{FrameBuffer, RGB_CHANNELS};
use crate::profiler::camera::device::{ensure_buffer_matches, Camera};
use crate::profiler::camera::types::{ExposureMode, Resolution};
use crate::profiler::common::error::{ProfilerError, Result};

const CID_EXPOSURE_AUTO: u32 = 0x009a_0901;
const CID_EXPOSURE_ABSOLUTE: u32 = 0x009a_0902;
const CID_ISO_SENSITIVITY: u32 = 0x009a_0917;
const CID_ISO_SENSITIVITY_AUTO: u32 = 0x009a_0918;

const EXPOSURE_MANUAL: i64 = 1;
const EXPOSURE_APERTURE_PRIORITY: i64 = 3;

const STREAM_BUFFERS: u32 = 4;
const STREAM_TIMEOUT: Duration = Duration::from_secs(2);

/// Video4Linux2 capture device delivering packed RGB24.
///
/// The memory-mapped stream is created on first capture and dropped on every
/// resolution change, since buffers cannot be resized while streaming.
pub struct V4lCamera {
    device: Device,
    stream: Option<MmapStream<'static>>,
    resolution: Resolution,
}

impl V4lCamera {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::with_path(path).map_err(|e| {
            ProfilerError::ConfigurationError(format!("cannot open {}: {}", path.display(), e))
        })?;
        let format = device
            .format()
            .map_err(|e| ProfilerError::ConfigurationError(e.to_string()))?;

        info!(device = %path.display(), width = format.width, height = format.height, "Opened V4L2 device");

        Ok(Self {
            device,
            stream: None,
            resolution: Resolution::new(format.width as usize, format.height as usize),
        })
    }

    fn set_control(&self, id: u32, value: i64) -> Result<()> {
        self.device
            .set_control(Control {
                id,
                value: Value::Integer(value),
            })
            .map_err(|e| {
                ProfilerError::ConfigurationError(format!("control {:#x} = {}: {}", id, value, e))
            })
    }

    fn stream(&mut self) -> Result<&mut MmapStream<'static>> {
        if self.stream.is_none() {
            let mut stream = MmapStream::with_buffers(&self.device, Type::VideoCapture, STREAM_BUFFERS)
                .map_err(|e| ProfilerError::AcquisitionError(format!("stream setup: {}", e)))?;
            stream.set_timeout(STREAM_TIMEOUT);
            debug!(buffers = STREAM_BUFFERS, "Started V4L2 stream");
            self.stream = Some(stream);
        }
        self.stream
            .as_mut()
            .ok_or_else(|| ProfilerError::AcquisitionError("stream unavailable".into()))
    }
}

impl Camera for V4lCamera {
    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.stream = None;

        let mut format = self
            .device
            .format()
            .map_err(|e| ProfilerError::ConfigurationError(e.to_string()))?;
        format.width = resolution.width as u32;
        format.height = resolution.height as u32;
        format.fourcc = FourCC::new(b"RGB3");

        let applied = self
            .device
            .set_format(&format)
            .map_err(|e| ProfilerError::ConfigurationError(format!("{}: {}", resolution, e)))?;

        if applied.width as usize != resolution.width
            || applied.height as usize != resolution.height
            || applied.fourcc != format.fourcc
        {
            return Err(ProfilerError::ConfigurationError(format!(
                "requested {} RGB3, driver chose {}x{} {}",
                resolution, applied.width, applied.height, applied.fourcc
            )));
        }

        self.resolution = resolution;
        Ok(())
    }

    fn set_frame_rate(&mut self, hz: u32) -> Result<()> {
        self.device
            .set_params(&Parameters::with_fps(hz))
            .map(|_| ())
            .map_err(|e| ProfilerError::ConfigurationError(format!("{} Hz: {}", hz, e)))
    }

    fn set_shutter(&mut self, microseconds: u32) -> Result<()> {
        // V4L2 exposure is in 100 us units
        let units = (microseconds as i64 / 100).max(1);
        self.set_control(CID_EXPOSURE_ABSOLUTE, units)
    }

    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<()> {
        let value = match mode {
            ExposureMode::Off => EXPOSURE_MANUAL,
            ExposureMode::Auto => EXPOSURE_APERTURE_PRIORITY,
        };
        self.set_control(CID_EXPOSURE_AUTO, value)
    }

    fn set_iso(&mut self, iso: u32) -> Result<()> {
        if iso == 0 {
            return self.set_control(CID_ISO_SENSITIVITY_AUTO, 1);
        }
        if let Err(e) = self.set_control(CID_ISO_SENSITIVITY_AUTO, 0) {
            warn!(error = %e, "Driver has no ISO auto control");
        }
        self.set_control(CID_ISO_SENSITIVITY, iso as i64)
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn capture_into(&mut self, buffer: &mut FrameBuffer) -> Result<()> {
        ensure_buffer_matches(buffer, self.resolution)?;
        let expected = self.resolution.pixel_count() * RGB_CHANNELS;

        let stream = self.stream()?;
        let (data, meta) = stream
            .next()
            .map_err(|e| ProfilerError::AcquisitionError(e.to_string()))?;

        let used = (meta.bytesused as usize).min(data.len());
        if used < expected {
            return Err(ProfilerError::AcquisitionError(format!(
                "short frame: {} of {} bytes",
                used, expected
            )));
        }
        buffer.write_frame(&data[..expected])
    }
}
