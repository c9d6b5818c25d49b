//! Trace Loader.
//!
//! This module reads memory access traces from text. It performs:
//! 1. **Tokenizing:** Each non-blank line is `<op> <address>`; `#` starts a comment line.
//! 2. **Operation parsing:** `read`/`write` in any case, or the one-letter forms `r`/`w`.
//! 3. **Address parsing:** Hexadecimal with an optional `0x` prefix.
//!
//! Tokens after the address are ignored so traces carrying extra columns
//! (sizes, thread ids) still load.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::error::TraceError;
use crate::common::{Access, AccessKind};

fn parse_kind(line: usize, op: &str) -> Result<AccessKind, TraceError> {
    if op.eq_ignore_ascii_case("read") || op.eq_ignore_ascii_case("r") {
        Ok(AccessKind::Read)
    } else if op.eq_ignore_ascii_case("write") || op.eq_ignore_ascii_case("w") {
        Ok(AccessKind::Write)
    } else {
        Err(TraceError::UnknownOperation {
            line,
            op: op.to_string(),
        })
    }
}

fn parse_address(line: usize, value: &str) -> Result<u64, TraceError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|source| TraceError::InvalidAddress {
        line,
        value: value.to_string(),
        source,
    })
}

/// Parses one trace line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Arguments
///
/// * `line` - 1-based line number, used in error reports.
/// * `text` - The raw line.
///
/// # Errors
///
/// Returns a [`TraceError`] naming the line if the operation is unknown or
/// the address is missing or not hexadecimal.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Access>, TraceError> {
    let mut tokens = text.split_whitespace();
    let Some(op) = tokens.next() else {
        return Ok(None);
    };
    if op.starts_with('#') {
        return Ok(None);
    }

    let kind = parse_kind(line, op)?;
    let value = tokens.next().ok_or(TraceError::MissingAddress { line })?;
    let address = parse_address(line, value)?;

    Ok(Some(Access { kind, address }))
}

/// Parses a whole trace held in memory.
///
/// # Errors
///
/// Stops at the first malformed line and returns its [`TraceError`].
pub fn parse_trace(text: &str) -> Result<Vec<Access>, TraceError> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line(idx + 1, line).transpose())
        .collect()
}

/// Loads and parses a trace file from disk.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, or the first parse
/// error otherwise.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<Access>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let trace = parse_trace(&text)?;
    info!(path = %path.display(), records = trace.len(), "trace loaded");
    Ok(trace)
}
