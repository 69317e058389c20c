use std::fmt;

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Short status message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Receives status messages. A message stays up until the next `open` or a `dismiss`.
pub trait StatusSink {
    fn open(&mut self, notice: Notice);
    fn dismiss(&mut self);
}

/// Logs every notice at the matching level.
#[derive(Debug, Default)]
pub struct TracingStatus {
    current: Option<Notice>,
}

impl TracingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notice currently on screen, if any.
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

impl StatusSink for TracingStatus {
    fn open(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Info => info!(status = %notice.message),
            Severity::Warning => warn!(status = %notice.message),
            Severity::Error => error!(status = %notice.message),
        }
        self.current = Some(notice);
    }

    fn dismiss(&mut self) {
        self.current = None;
    }
}
