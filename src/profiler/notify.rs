//! Status and display collaborators
//!
//! The pipeline reports through [`StatusSink`] and hands preview frames to a
//! [`PreviewSink`]. Front ends implement these; the defaults log through `tracing`.

mod display;
mod status;

pub use display::{PreviewSink, StatsDisplay};
pub use status::{Notice, Severity, StatusSink, TracingStatus};
