use std::str::FromStr;

use crate::profiler::intensity::types::IntensityImage;

/// How intensities outside 0..=255 become 8-bit pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantization {
    /// Clamp to 0..=255
    #[default]
    Saturate,
    /// Keep the low 8 bits of the integer part, so 256 becomes 0
    Wrap,
}

impl Quantization {
    pub fn apply(&self, value: f32) -> u8 {
        match self {
            Quantization::Saturate => value.clamp(0.0, 255.0) as u8,
            Quantization::Wrap => (value.max(0.0) as u32 % 256) as u8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quantization::Saturate => "saturate",
            Quantization::Wrap => "wrap",
        }
    }
}

impl FromStr for Quantization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saturate" | "clamp" => Ok(Quantization::Saturate),
            "wrap" => Ok(Quantization::Wrap),
            other => Err(format!("unknown quantization '{}'", other)),
        }
    }
}

impl IntensityImage {
    /// Row-major 8-bit grayscale pixels.
    pub fn to_gray8(&self, quantization: Quantization) -> Vec<u8> {
        self.data().iter().map(|&v| quantization.apply(v)).collect()
    }
}
