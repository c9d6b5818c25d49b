//! Configuration Sweep.
//!
//! Runs one trace against many cache shapes. Every shape gets its own freshly
//! constructed [`CacheSim`]; nothing is shared between runs, so each result
//! depends only on its configuration and the trace.

use tracing::{debug, warn};

use crate::cache::CacheSim;
use crate::common::Access;
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, SweepConfig};
use crate::sim::report::ReportRow;
use crate::stats::CacheStats;

/// Simulates `trace` on a new cache of shape `config` and returns its statistics.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` is not a valid geometry.
pub fn run_config(config: &CacheConfig, trace: &[Access]) -> Result<CacheStats, ConfigError> {
    let mut cache = CacheSim::new(config)?;
    cache.replay(trace);
    Ok(*cache.stats())
}

/// Simulates `trace` on every shape of `sweep`.
///
/// Rows come back in [`SweepConfig::shapes`] order. Shapes with an invalid
/// geometry are skipped and logged rather than aborting the sweep.
pub fn run_sweep(sweep: &SweepConfig, trace: &[Access]) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    for config in sweep.shapes() {
        let mut cache = match CacheSim::new(&config) {
            Ok(cache) => cache,
            Err(e) => {
                warn!(
                    size_bytes = config.size_bytes,
                    block_bytes = config.block_bytes,
                    associativity = %config.associativity,
                    "skipping configuration: {e}"
                );
                continue;
            }
        };
        cache.replay(trace);

        let row = ReportRow::from_cache(&cache);
        debug!(
            size_bytes = row.cache_size,
            block_bytes = row.block_size,
            associativity = %row.associativity,
            policy = %row.write_policy,
            hits = row.hits,
            requests = row.total_requests,
            "configuration simulated"
        );
        rows.push(row);
    }
    rows
}
