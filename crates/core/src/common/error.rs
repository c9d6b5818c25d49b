//! Error definitions.
//!
//! This module defines every error the simulator can report. It provides:
//! 1. **Configuration errors:** Invalid cache geometry or unreadable sweep files.
//! 2. **Trace errors:** Unreadable traces and malformed records, tagged with line numbers.
//! 3. **Report errors:** Failures while serializing or writing a result report.
//! 4. **Label errors:** Unrecognized policy, associativity, or format names.
//!
//! Degenerate statistics (a hit rate with zero requests) are not errors; they
//! are expressed as `Option` on [`CacheStats`](crate::stats::CacheStats).

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid cache shape or sweep configuration.
///
/// Raised at construction time. A configuration that fails validation is
/// never simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Total cache size was zero.
    #[error("cache size must be positive")]
    ZeroCacheSize,

    /// Block size was zero.
    #[error("block size must be positive")]
    ZeroBlockSize,

    /// Cache size is not an exact multiple of the block size.
    #[error("cache size {size_bytes} is not a multiple of block size {block_bytes}")]
    SizeNotMultipleOfBlock {
        /// Requested cache size in bytes.
        size_bytes: usize,
        /// Requested block size in bytes.
        block_bytes: usize,
    },

    /// A set-associative shape asked for zero ways.
    #[error("associativity must be at least one way")]
    ZeroWays,

    /// More ways than the cache has blocks.
    #[error("{ways} ways requested but the cache only holds {num_blocks} blocks")]
    TooManyWays {
        /// Requested ways per set.
        ways: usize,
        /// Total block count of the cache.
        num_blocks: usize,
    },

    /// The block count does not divide evenly into sets.
    #[error("{num_blocks} blocks cannot be split evenly into {ways}-way sets")]
    BlocksNotMultipleOfWays {
        /// Requested ways per set.
        ways: usize,
        /// Total block count of the cache.
        num_blocks: usize,
    },

    /// Sweep configuration file could not be read.
    #[error("could not read config '{}'", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Sweep configuration file is not valid JSON for the expected schema.
    #[error("could not parse config '{}'", path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to load or parse a memory access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("could not read trace '{}'", path.display())]
    Io {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A record had an operation but no address.
    #[error("line {line}: missing address")]
    MissingAddress {
        /// 1-based line number.
        line: usize,
    },

    /// The operation token was neither a read nor a write.
    #[error("line {line}: unknown operation '{op}'")]
    UnknownOperation {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        op: String,
    },

    /// The address token was not valid hexadecimal.
    #[error("line {line}: invalid address '{value}'")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Failure while writing a result report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The destination rejected a write.
    #[error("could not write report")]
    Io(#[from] io::Error),

    /// Rows could not be serialized to JSON.
    #[error("could not serialize report")]
    Json(#[from] serde_json::Error),
}

/// Error returned when a CLI label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} '{value}'")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    /// Creates an error for `value`, which was expected to name a `kind`.
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
