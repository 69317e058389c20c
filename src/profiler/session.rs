//! Profiling session
//!
//! Two-state loop: preview frames stream to the display until a snapshot is requested,
//! then the snapshot pipeline captures, crops, exports and hands the camera back.

mod controller;
mod handle;
mod preview;
mod snapshot;
pub mod types;

#[cfg(test)]
mod tests;

pub use controller::ProfilerController;
pub use handle::ControlHandle;
pub use preview::{run_preview, PreviewStream};
pub use snapshot::{SnapshotPipeline, DATA_EXPORTING};
pub use types::{
    ExportNames, ProfilerConfig, ProfilerConfigBuilder, RunSummary, SessionState, SnapshotReport,
    SnapshotStage,
};
