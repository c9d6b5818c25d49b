//! Result Reports.
//!
//! Turns finished cache runs into rows and writes them out. It provides:
//! 1. **Rows:** One [`ReportRow`] per simulated shape, carrying labels and counters.
//! 2. **Text output:** Space-separated columns, hit rate to two decimals, `N/A` with no requests.
//! 3. **JSON output:** A pretty-printed array of rows; an unavailable hit rate is `null`.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::cache::CacheSim;
use crate::common::error::ReportError;
use crate::common::error::ParseLabelError;

/// One line of a sweep report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Total cache size in bytes.
    pub cache_size: usize,
    /// Block size in bytes.
    pub block_size: usize,
    /// Associativity label (`DM`, `2W`, `4W`, `FA`, ...).
    pub associativity: String,
    /// Resolved lines per set.
    pub blocks_per_set: usize,
    /// Write policy label (`WB` or `WT`).
    pub write_policy: String,
    /// Number of accesses replayed.
    pub total_requests: u64,
    /// Number of hits.
    pub hits: u64,
    /// `hits / total_requests`, `None` when nothing was replayed.
    pub hit_rate: Option<f64>,
    /// Bytes fetched from memory.
    pub bytes_mem_to_cache: u64,
    /// Bytes written to memory.
    pub bytes_cache_to_mem: u64,
}

impl ReportRow {
    /// Builds a row from a cache after its replay.
    pub fn from_cache(cache: &CacheSim) -> Self {
        let stats = cache.stats();
        Self {
            cache_size: cache.size_bytes(),
            block_size: cache.block_bytes(),
            associativity: cache.associativity().label(),
            blocks_per_set: cache.ways(),
            write_policy: cache.write_policy().label().to_string(),
            total_requests: stats.total_requests,
            hits: stats.hits,
            hit_rate: stats.hit_rate(),
            bytes_mem_to_cache: stats.bytes_mem_to_cache,
            bytes_cache_to_mem: stats.bytes_cache_to_mem,
        }
    }
}

impl fmt::Display for ReportRow {
    /// Formats the row as one text-report line (without a trailing newline).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} ",
            self.cache_size,
            self.block_size,
            self.associativity,
            self.blocks_per_set,
            self.write_policy,
            self.total_requests,
            self.hits
        )?;
        match self.hit_rate {
            Some(rate) => write!(f, "{rate:.2}")?,
            None => f.write_str("N/A")?,
        }
        write!(f, " {} {}", self.bytes_mem_to_cache, self.bytes_cache_to_mem)
    }
}

/// Output encoding for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Space-separated columns, one row per line.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
}

impl FromStr for ReportFormat {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ParseLabelError::new("report format", s)),
        }
    }
}

/// Writes `rows` to `out` in the requested format.
///
/// # Errors
///
/// Returns a [`ReportError`] if the writer fails or JSON serialization fails.
pub fn write_report<W: Write>(
    mut out: W,
    rows: &[ReportRow],
    format: ReportFormat,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Text => {
            for row in rows {
                writeln!(out, "{row}")?;
            }
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    info!(rows = rows.len(), ?format, "report written");
    Ok(())
}
