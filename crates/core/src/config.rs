//! Configuration system for the cache simulator.
//!
//! This module defines the structures and enums used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline cache shape and the default sweep grid.
//! 2. **Shapes:** `CacheConfig` describes one cache; `geometry()` validates it.
//! 3. **Sweeps:** `SweepConfig` enumerates the cross product of sizes, blocks, ways, and policies.
//!
//! Configuration is supplied as JSON (`SweepConfig::from_json_file`) or built
//! directly; `SweepConfig::default()` reproduces the reference sweep.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::{ConfigError, ParseLabelError};

/// Default configuration constants for the simulator.
mod defaults {
    use super::{Associativity, WritePolicy};

    /// Default cache size in bytes (1 KiB).
    pub const CACHE_SIZE: usize = 1024;

    /// Default block size in bytes.
    pub const BLOCK_SIZE: usize = 32;

    /// Default associativity (direct-mapped).
    pub const ASSOCIATIVITY: Associativity = Associativity::Ways(1);

    /// Default write policy.
    pub const WRITE_POLICY: WritePolicy = WritePolicy::WriteBack;

    /// Cache sizes visited by the default sweep.
    pub const SWEEP_CACHE_SIZES: [usize; 4] = [1024, 2048, 8192, 65536];

    /// Block sizes visited by the default sweep.
    pub const SWEEP_BLOCK_SIZES: [usize; 4] = [4, 8, 32, 256];

    /// Associativities visited by the default sweep.
    pub const SWEEP_ASSOCIATIVITIES: [Associativity; 4] = [
        Associativity::Ways(1),
        Associativity::Ways(2),
        Associativity::Ways(4),
        Associativity::Full,
    ];

    /// Write policies visited by the default sweep.
    pub const SWEEP_WRITE_POLICIES: [WritePolicy; 2] =
        [WritePolicy::WriteBack, WritePolicy::WriteThrough];
}

/// How writes propagate to backing memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Writes dirty the line; memory is updated when a dirty line is evicted.
    #[default]
    #[serde(alias = "WB")]
    WriteBack,
    /// Every write is forwarded to memory immediately; lines never go dirty.
    #[serde(alias = "WT")]
    WriteThrough,
}

impl WritePolicy {
    /// Short report label (`WB` or `WT`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::WriteBack => "WB",
            Self::WriteThrough => "WT",
        }
    }

    /// Returns `true` for write-back.
    #[inline]
    pub const fn is_write_back(self) -> bool {
        matches!(self, Self::WriteBack)
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WritePolicy {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wb" | "write_back" | "write-back" | "writeback" => Ok(Self::WriteBack),
            "wt" | "write_through" | "write-through" | "writethrough" => Ok(Self::WriteThrough),
            _ => Err(ParseLabelError::new("write policy", s)),
        }
    }
}

/// Number of lines per set.
///
/// `Full` resolves to the total block count of the cache, producing a single set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Associativity {
    /// A fixed number of ways per set. `Ways(1)` is direct-mapped.
    Ways(usize),
    /// Every block shares one set.
    #[serde(alias = "FA")]
    Full,
}

impl Associativity {
    /// Short report label: `DM`, `{n}W`, or `FA`.
    pub fn label(self) -> String {
        match self {
            Self::Ways(1) => "DM".to_string(),
            Self::Ways(n) => format!("{n}W"),
            Self::Full => "FA".to_string(),
        }
    }

    /// Resolves the ways per set for a cache holding `num_blocks` blocks.
    #[inline]
    pub const fn ways_for(self, num_blocks: usize) -> usize {
        match self {
            Self::Ways(n) => n,
            Self::Full => num_blocks,
        }
    }
}

impl Default for Associativity {
    fn default() -> Self {
        defaults::ASSOCIATIVITY
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Associativity {
    type Err = ParseLabelError;

    /// Accepts `fa`/`full`, `dm`, a bare way count, or `{n}w`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "fa" | "full" => return Ok(Self::Full),
            "dm" | "direct" => return Ok(Self::Ways(1)),
            _ => {}
        }
        lower
            .strip_suffix('w')
            .unwrap_or(lower.as_str())
            .parse::<usize>()
            .map(Self::Ways)
            .map_err(|_| ParseLabelError::new("associativity", s))
    }
}

/// Validated layout of a cache derived from a [`CacheConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// Total number of blocks (`size_bytes / block_bytes`).
    pub num_blocks: usize,
    /// Lines per set.
    pub ways: usize,
    /// Number of sets (`num_blocks / ways`), always at least one.
    pub num_sets: usize,
}

/// Shape of a single simulated cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Block (line) size in bytes
    #[serde(default = "CacheConfig::default_block")]
    pub block_bytes: usize,

    /// Lines per set
    #[serde(default)]
    pub associativity: Associativity,

    /// Write propagation policy
    #[serde(default)]
    pub write_policy: WritePolicy,
}

impl CacheConfig {
    /// Creates a configuration from explicit parameters.
    pub const fn new(
        size_bytes: usize,
        block_bytes: usize,
        associativity: Associativity,
        write_policy: WritePolicy,
    ) -> Self {
        Self {
            size_bytes,
            block_bytes,
            associativity,
            write_policy,
        }
    }

    /// Returns the default cache size in bytes.
    const fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default block size in bytes.
    const fn default_block() -> usize {
        defaults::BLOCK_SIZE
    }

    /// Validates the shape and computes its set layout.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a size is zero, the cache size is not a
    /// multiple of the block size, or the blocks cannot be split into whole
    /// sets of the requested associativity.
    pub fn geometry(&self) -> Result<CacheGeometry, ConfigError> {
        if self.size_bytes == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }
        if self.block_bytes == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.size_bytes % self.block_bytes != 0 {
            return Err(ConfigError::SizeNotMultipleOfBlock {
                size_bytes: self.size_bytes,
                block_bytes: self.block_bytes,
            });
        }

        let num_blocks = self.size_bytes / self.block_bytes;
        let ways = self.associativity.ways_for(num_blocks);
        if ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if ways > num_blocks {
            return Err(ConfigError::TooManyWays { ways, num_blocks });
        }
        if num_blocks % ways != 0 {
            return Err(ConfigError::BlocksNotMultipleOfWays { ways, num_blocks });
        }

        Ok(CacheGeometry {
            num_blocks,
            ways,
            num_sets: num_blocks / ways,
        })
    }
}

impl Default for CacheConfig {
    /// A 1 KiB direct-mapped write-back cache with 32-byte blocks.
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            block_bytes: defaults::BLOCK_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            write_policy: defaults::WRITE_POLICY,
        }
    }
}

/// Grid of cache shapes to simulate against one trace.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Associativity, SweepConfig, WritePolicy};
///
/// let json = r#"{
///     "cache_sizes": [1024],
///     "block_sizes": [32, 64],
///     "associativities": [{ "ways": 2 }, "full"],
///     "write_policies": ["write_back"]
/// }"#;
///
/// let sweep: SweepConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(sweep.associativities, vec![Associativity::Ways(2), Associativity::Full]);
/// assert_eq!(sweep.write_policies, vec![WritePolicy::WriteBack]);
/// assert_eq!(sweep.shapes().count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SweepConfig {
    /// Total cache sizes in bytes
    #[serde(default = "SweepConfig::default_cache_sizes")]
    pub cache_sizes: Vec<usize>,

    /// Block sizes in bytes
    #[serde(default = "SweepConfig::default_block_sizes")]
    pub block_sizes: Vec<usize>,

    /// Associativities
    #[serde(default = "SweepConfig::default_associativities")]
    pub associativities: Vec<Associativity>,

    /// Write policies
    #[serde(default = "SweepConfig::default_write_policies")]
    pub write_policies: Vec<WritePolicy>,
}

impl SweepConfig {
    fn default_cache_sizes() -> Vec<usize> {
        defaults::SWEEP_CACHE_SIZES.to_vec()
    }

    fn default_block_sizes() -> Vec<usize> {
        defaults::SWEEP_BLOCK_SIZES.to_vec()
    }

    fn default_associativities() -> Vec<Associativity> {
        defaults::SWEEP_ASSOCIATIVITIES.to_vec()
    }

    fn default_write_policies() -> Vec<WritePolicy> {
        defaults::SWEEP_WRITE_POLICIES.to_vec()
    }

    /// Loads a sweep from a JSON file. Missing fields fall back to the default grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it does not match the schema.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every shape in the grid, nested as cache size, block size,
    /// associativity, then write policy (innermost).
    ///
    /// Shapes are yielded unvalidated; callers decide how to treat invalid ones.
    pub fn shapes(&self) -> impl Iterator<Item = CacheConfig> + '_ {
        self.cache_sizes.iter().flat_map(move |&size| {
            self.block_sizes.iter().flat_map(move |&block| {
                self.associativities.iter().flat_map(move |&assoc| {
                    self.write_policies
                        .iter()
                        .map(move |&policy| CacheConfig::new(size, block, assoc, policy))
                })
            })
        })
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            cache_sizes: Self::default_cache_sizes(),
            block_sizes: Self::default_block_sizes(),
            associativities: Self::default_associativities(),
            write_policies: Self::default_write_policies(),
        }
    }
}
