//! Beam profiler: continuous camera preview with on-demand grayscale snapshot export.
//!
//! The [`profiler`] module holds the acquisition pipeline; the remaining modules are the
//! binary's ambient plumbing (logging, file configuration, CLI, stdin trigger).

pub mod cli;
pub mod config;
pub mod console;
pub mod logger;
pub mod profiler;
