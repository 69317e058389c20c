//! Camera control module
//!
//! The [`Camera`] trait is the control surface the pipeline drives; backends implement it.
//! [`SimulatedCamera`] is always available, the V4L2 backend sits behind the `v4l` feature.

mod buffer;
mod device;
mod simulated;
pub mod types;
#[cfg(feature = "v4l")]
mod v4l_camera;

pub use buffer::{FrameBuffer, RGB_CHANNELS};
pub use device::{apply_config, ensure_buffer_matches, Camera, FrameStream};
pub use simulated::{BeamModel, SimulatedCamera};
pub use types::{CameraConfig, ExposureMode, Resolution};
#[cfg(feature = "v4l")]
pub use v4l_camera::V4lCamera;
