//! Camera configuration types

use std::fmt;
use std::str::FromStr;

/// Sensor or image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    /// Live preview resolution
    pub const PREVIEW: Resolution = Resolution::new(640, 480);
    /// Full still-capture resolution of the Pi camera v2 sensor
    pub const CAPTURE: Resolution = Resolution::new(3280, 2464);
    /// Fixed snapshot crop
    pub const CROP: Resolution = Resolution::new(1000, 1000);

    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `other` fits inside `self` on both axes.
    pub fn contains(&self, other: Resolution) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `3280x2464`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = width
            .trim()
            .parse()
            .map_err(|e| format!("invalid width '{}': {}", width, e))?;
        let height = height
            .trim()
            .parse()
            .map_err(|e| format!("invalid height '{}': {}", height, e))?;
        Ok(Resolution::new(width, height))
    }
}

/// Sensor exposure control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExposureMode {
    /// Manual exposure: shutter speed and ISO are used as given
    #[default]
    Off,
    /// Sensor-controlled automatic exposure
    Auto,
}

impl ExposureMode {
    pub fn name(&self) -> &'static str {
        match self {
            ExposureMode::Off => "off",
            ExposureMode::Auto => "auto",
        }
    }
}

impl FromStr for ExposureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "manual" => Ok(ExposureMode::Off),
            "auto" => Ok(ExposureMode::Auto),
            other => Err(format!("unknown exposure mode '{}'", other)),
        }
    }
}

/// Full camera configuration. The device holds exactly one of these at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub resolution: Resolution,
    /// Frame rate in Hz
    pub frame_rate: u32,
    /// Shutter speed in microseconds
    pub shutter_speed_us: u32,
    pub exposure_mode: ExposureMode,
    pub iso: u32,
}

impl CameraConfig {
    /// Preview settings: 640x480 at 30 Hz, 500 us manual exposure, ISO 150.
    pub fn preview() -> Self {
        Self {
            resolution: Resolution::PREVIEW,
            frame_rate: 30,
            shutter_speed_us: 500,
            exposure_mode: ExposureMode::Off,
            iso: 150,
        }
    }

    /// Same settings at another resolution. Capture configs are derived this way.
    pub fn with_resolution(&self, resolution: Resolution) -> Self {
        Self {
            resolution,
            ..self.clone()
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::preview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_defaults() {
        let config = CameraConfig::preview();
        assert_eq!(config.resolution, Resolution::new(640, 480));
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.shutter_speed_us, 500);
        assert_eq!(config.exposure_mode, ExposureMode::Off);
        assert_eq!(config.iso, 150);
    }

    #[test]
    fn test_capture_inherits_exposure() {
        let capture = CameraConfig::preview().with_resolution(Resolution::CAPTURE);
        assert_eq!(capture.resolution, Resolution::new(3280, 2464));
        assert_eq!(capture.frame_rate, 30);
        assert_eq!(capture.shutter_speed_us, 500);
        assert_eq!(capture.iso, 150);
    }

    #[test]
    fn test_resolution_parse_and_display() {
        let res: Resolution = "3280x2464".parse().unwrap();
        assert_eq!(res, Resolution::CAPTURE);
        assert_eq!(res.to_string(), "3280x2464");
        assert_eq!(" 640 X 480 ".parse::<Resolution>().unwrap(), Resolution::PREVIEW);
        assert!("640".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_contains() {
        assert!(Resolution::CAPTURE.contains(Resolution::CROP));
        assert!(!Resolution::new(500, 500).contains(Resolution::CROP));
        assert!(Resolution::new(0, 10).is_empty());
    }

    #[test]
    fn test_exposure_mode_parse() {
        assert_eq!("off".parse::<ExposureMode>().unwrap(), ExposureMode::Off);
        assert_eq!("Manual".parse::<ExposureMode>().unwrap(), ExposureMode::Off);
        assert_eq!("auto".parse::<ExposureMode>().unwrap(), ExposureMode::Auto);
        assert!("night".parse::<ExposureMode>().is_err());
    }
}
