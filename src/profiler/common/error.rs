use thiserror::Error;

use crate::profiler::camera::Resolution;
use crate::profiler::export::ExportKind;

#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("Camera rejected configuration: {0}")]
    ConfigurationError(String),

    #[error("Frame acquisition failed: {0}")]
    AcquisitionError(String),

    #[error("Please type a filename for {0} export")]
    EmptyFileName(ExportKind),

    #[error("Crop region {crop} exceeds captured frame {frame}")]
    CropBoundsError { frame: Resolution, crop: Resolution },

    #[error("Frame buffer is {actual} but the camera is configured for {expected}")]
    BufferMismatch { expected: Resolution, actual: Resolution },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProfilerError {
    /// Fatal errors end the session; everything else is reported and preview resumes.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProfilerError::ConfigurationError(_)
                | ProfilerError::AcquisitionError(_)
                | ProfilerError::BufferMismatch { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ProfilerError::EmptyFileName(_))
    }
}

pub type Result<T> = std::result::Result<T, ProfilerError>;
