use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::profiler::session::types::ExportNames;

#[derive(Debug, Default)]
struct Shared {
    snapshot: AtomicBool,
    shutdown: AtomicBool,
    names: Mutex<ExportNames>,
}

/// Cloneable trigger side of a session.
///
/// Every clone talks to the same controller, so it can be handed to a console reader, a
/// signal handler or a UI thread.
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    shared: Arc<Shared>,
}

impl ControlHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: ExportNames) -> Self {
        let handle = Self::default();
        *handle.names() = names;
        handle
    }

    fn names(&self) -> MutexGuard<'_, ExportNames> {
        // Names are plain strings, a panic elsewhere cannot leave them half-written
        self.shared
            .names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Asks for a snapshot at the end of the current preview frame. Repeated calls before
    /// the snapshot runs collapse into one.
    pub fn request_snapshot(&self) {
        if !self.shared.snapshot.swap(true, Ordering::SeqCst) {
            debug!("Snapshot requested");
        }
    }

    pub fn snapshot_requested(&self) -> bool {
        self.shared.snapshot.load(Ordering::SeqCst)
    }

    pub(crate) fn clear_snapshot(&self) {
        self.shared.snapshot.store(false, Ordering::SeqCst);
    }

    /// Ends the session after the current frame or snapshot.
    pub fn request_shutdown(&self) {
        if !self.shared.shutdown.swap(true, Ordering::SeqCst) {
            debug!("Shutdown requested");
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shared.shutdown.load(Ordering::SeqCst)
    }

    pub fn set_picture_name(&self, name: impl Into<String>) {
        self.names().picture = name.into();
    }

    pub fn set_matrix_name(&self, name: impl Into<String>) {
        self.names().matrix = name.into();
    }

    /// The names as they are right now; a snapshot reads them once when it starts.
    pub fn export_names(&self) -> ExportNames {
        self.names().clone()
    }

    pub fn should_pause_preview(&self) -> bool {
        self.snapshot_requested() || self.shutdown_requested()
    }
}
