use crate::profiler::camera::{Camera, FrameBuffer, FrameStream};
use crate::profiler::common::error::Result;
use crate::profiler::intensity::{mean_channels, IntensityImage};
use crate::profiler::session::handle::ControlHandle;

/// Preview frames reduced to channel-mean intensity.
///
/// Ends (returns `None`) once a snapshot or shutdown has been requested. A snapshot
/// request is checked after each completed frame, so every (re)started stream yields at
/// least one frame first. Shutdown is honored before the first acquisition too. Calling
/// [`run_preview`] again restarts the sequence.
pub struct PreviewStream<'a, C: Camera> {
    frames: FrameStream<'a, C>,
    control: &'a ControlHandle,
    started: bool,
}

pub fn run_preview<'a, C: Camera>(
    camera: &'a mut C,
    buffer: &'a mut FrameBuffer,
    control: &'a ControlHandle,
) -> PreviewStream<'a, C> {
    PreviewStream {
        frames: camera.capture_continuous(buffer),
        control,
        started: false,
    }
}

impl<C: Camera> Iterator for PreviewStream<'_, C> {
    type Item = Result<IntensityImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.control.shutdown_requested() {
            return None;
        }
        if self.started && self.control.should_pause_preview() {
            return None;
        }
        self.started = true;
        Some(self.frames.next_frame().and_then(mean_channels))
    }
}
