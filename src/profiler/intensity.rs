//! Intensity reduction module
//!
//! Turns RGB frames into single-channel `f32` intensity images, crops them and converts
//! them to 8-bit for saving.

mod crop;
mod quantize;
mod reduce;
pub mod types;

pub use crop::{center_crop_region, CropRegion};
pub use quantize::Quantization;
pub use reduce::{mean_channels, sum_channels};
pub use types::{FrameStats, IntensityImage};
