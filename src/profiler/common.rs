//! Common utilities module
//!
//! Shared error type for the whole acquisition pipeline.

pub mod error;

pub use error::{ProfilerError, Result};
