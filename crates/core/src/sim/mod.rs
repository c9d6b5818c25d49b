//! Trace-driven simulation driver.
//!
//! Everything around the cache model proper: loading traces, sweeping
//! configurations, and writing reports. These modules only use the public
//! surface of [`CacheSim`](crate::cache::CacheSim).

/// Text trace parsing and file loading.
pub mod loader;
/// Report rows and output formats.
pub mod report;
/// Per-configuration runs and sweeps.
pub mod sweep;

pub use loader::{load_trace, parse_line, parse_trace};
pub use report::{ReportFormat, ReportRow, write_report};
pub use sweep::{run_config, run_sweep};
