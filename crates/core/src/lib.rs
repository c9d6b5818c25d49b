//! Trace-driven cache simulator library.
//!
//! This crate models a single-level set-associative cache under a replayed
//! stream of memory accesses:
//! 1. **Cache:** Address mapping, LRU replacement with invalid-line preference, and write-back or write-through accounting.
//! 2. **Statistics:** Hits, misses, and bytes moved between cache and memory.
//! 3. **Configuration:** Cache shapes and sweep grids, deserializable from JSON.
//! 4. **Simulation:** Trace loading, configuration sweeps, and report writing.

/// Common types (access records, errors).
pub mod common;
/// Simulator configuration (defaults, enums, cache shapes, sweeps).
pub mod config;
/// Set-associative cache model.
pub mod cache;
/// Trace loading, sweeps, and reports.
pub mod sim;
/// Cache statistics.
pub mod stats;

/// Cache model; construct with `CacheSim::new`.
pub use crate::cache::CacheSim;
/// Shape of one cache; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// Counters accumulated by a cache run.
pub use crate::stats::CacheStats;
