//! Common types shared across the simulator.
//!
//! This module provides the building blocks used by the cache model and the
//! trace-driven driver. It includes:
//! 1. **Access records:** The `(operation, address)` pairs a trace is made of.
//! 2. **Error handling:** Typed errors for configuration, traces, and reports.

/// Memory access record definitions.
pub mod data;

/// Error types.
pub mod error;

pub use data::{Access, AccessKind};
pub use error::{ConfigError, ParseLabelError, ReportError, TraceError};
