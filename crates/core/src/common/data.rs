//! Memory Access Records.
//!
//! This module defines the unit of work fed to the cache model. A trace is an
//! ordered sequence of [`Access`] values; the model only ever sees the write
//! flag and the address.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Data read access.
    ///
    /// Fetches the block on a miss and never dirties a line.
    Read,

    /// Data write access.
    ///
    /// Dirties the line under write-back, or forwards the block to memory
    /// immediately under write-through.
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// A single trace record: an operation and the byte address it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Access {
    /// Whether this record reads or writes.
    pub kind: AccessKind,
    /// Byte address referenced by the record.
    pub address: u64,
}

impl Access {
    /// Creates a read of `address`.
    #[inline]
    pub const fn read(address: u64) -> Self {
        Self {
            kind: AccessKind::Read,
            address,
        }
    }

    /// Creates a write of `address`.
    #[inline]
    pub const fn write(address: u64) -> Self {
        Self {
            kind: AccessKind::Write,
            address,
        }
    }

    /// Returns `true` for write records.
    #[inline]
    pub const fn is_write(&self) -> bool {
        matches!(self.kind, AccessKind::Write)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#x}", self.kind, self.address)
    }
}
