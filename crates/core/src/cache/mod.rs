//! Set-Associative Cache Model.
//!
//! This module implements a single-level set-associative cache driven one
//! access at a time. It models:
//! 1. **Mapping:** `block = addr / block_bytes`, `set = block % num_sets`, `tag = block / num_sets`.
//! 2. **Replacement:** Invalid lines are filled first, then the least recently used line is evicted.
//! 3. **Write policy:** Write-back defers traffic to dirty evictions; write-through forwards every write.
//!
//! Misses always allocate (write-allocate), so a write miss fetches its block
//! like a read miss. Recency is tracked with a logical clock that ticks once
//! per access; no timing is modeled.
//!
//! # Performance
//!
//! - **Lookup:** O(W) scan of the addressed set, where W is the associativity.
//! - **Victim selection:** O(W) scan for an invalid line, then for the minimum `last_used`.
//! - **Space:** O(S × W) lines in one contiguous vector.

use tracing::{debug, trace};

use crate::common::Access;
use crate::common::error::ConfigError;
use crate::config::{Associativity, CacheConfig, WritePolicy};
use crate::stats::CacheStats;

/// Cache line entry containing tag, validity, dirty bit, and recency stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// The slot holds a live block.
    pub valid: bool,
    /// The block is newer than backing memory. Only set under write-back.
    pub dirty: bool,
    /// Identifies which block occupies the slot within its set.
    pub tag: u64,
    /// Logical time of the most recent access to this slot.
    pub last_used: u64,
}

/// Cache simulator implementing a set-associative LRU cache.
///
/// Geometry and write policy are fixed at construction. Statistics accumulate
/// across calls to [`access`](Self::access) until [`reset`](Self::reset).
///
/// # Examples
///
/// ```
/// use cachesim_core::cache::CacheSim;
/// use cachesim_core::config::{Associativity, CacheConfig, WritePolicy};
///
/// let config = CacheConfig::new(1024, 32, Associativity::Ways(2), WritePolicy::WriteThrough);
/// let mut cache = CacheSim::new(&config).unwrap();
///
/// cache.access(true, 0x0);
/// cache.access(true, 0x0);
///
/// let stats = cache.stats();
/// assert_eq!((stats.hits, stats.misses), (1, 1));
/// assert_eq!(stats.bytes_mem_to_cache, 32);
/// assert_eq!(stats.bytes_cache_to_mem, 64);
/// ```
#[derive(Debug, Clone)]
pub struct CacheSim {
    config: CacheConfig,
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    clock: u64,
    stats: CacheStats,
}

impl CacheSim {
    /// Creates a new cache with every line invalid and all counters zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the shape does not describe a whole,
    /// positive number of sets (see [`CacheConfig::geometry`]).
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;

        debug!(
            size_bytes = config.size_bytes,
            block_bytes = config.block_bytes,
            ways = geometry.ways,
            num_sets = geometry.num_sets,
            policy = %config.write_policy,
            "cache constructed"
        );

        Ok(Self {
            config: *config,
            lines: vec![CacheLine::default(); geometry.num_sets * geometry.ways],
            num_sets: geometry.num_sets,
            ways: geometry.ways,
            clock: 0,
            stats: CacheStats::default(),
        })
    }

    /// Splits an address into its set index and tag.
    #[inline]
    const fn locate(&self, addr: u64) -> (usize, u64) {
        let block_addr = addr / self.config.block_bytes as u64;
        let num_sets = self.num_sets as u64;
        ((block_addr % num_sets) as usize, block_addr / num_sets)
    }

    /// Picks the way to replace: the first invalid line, else the least
    /// recently used one (lowest way wins ties).
    fn select_victim(set: &[CacheLine]) -> usize {
        set.iter().position(|line| !line.valid).unwrap_or_else(|| {
            set.iter()
                .enumerate()
                .min_by_key(|(_, line)| line.last_used)
                .map_or(0, |(way, _)| way)
        })
    }

    /// Performs one access and updates the statistics.
    ///
    /// A hit refreshes the line's recency; a write hit dirties the line under
    /// write-back or charges one block of write traffic under write-through.
    /// A miss charges one block of fetch traffic, evicts a victim (charging a
    /// block of write-back traffic if it was dirty), and installs the block.
    /// A write miss under write-through additionally charges one block of
    /// write traffic on top of the fetch.
    ///
    /// # Arguments
    ///
    /// * `is_write` - Whether this is a write operation
    /// * `addr` - The byte address to access
    pub fn access(&mut self, is_write: bool, addr: u64) {
        self.stats.total_requests += 1;
        self.clock += 1;
        let now = self.clock;

        let (set_index, tag) = self.locate(addr);
        let write_back = self.config.write_policy.is_write_back();
        let block_bytes = self.config.block_bytes as u64;
        let base = set_index * self.ways;
        let set = &mut self.lines[base..base + self.ways];

        if let Some(line) = set.iter_mut().find(|line| line.valid && line.tag == tag) {
            self.stats.hits += 1;
            line.last_used = now;
            if is_write {
                if write_back {
                    line.dirty = true;
                } else {
                    self.stats.bytes_cache_to_mem += block_bytes;
                }
            }
            trace!(addr, set_index, tag, is_write, "hit");
            return;
        }

        self.stats.misses += 1;
        self.stats.bytes_mem_to_cache += block_bytes;

        let way = Self::select_victim(set);
        let victim = &mut set[way];
        let evicted_dirty = victim.valid && victim.dirty && write_back;
        if evicted_dirty {
            self.stats.bytes_cache_to_mem += block_bytes;
        }
        trace!(
            addr,
            set_index,
            tag,
            is_write,
            way,
            evicted = victim.valid,
            evicted_dirty,
            "miss"
        );

        *victim = CacheLine {
            valid: true,
            dirty: is_write && write_back,
            tag,
            last_used: now,
        };

        if is_write && !write_back {
            self.stats.bytes_cache_to_mem += block_bytes;
        }
    }

    /// Replays every record of `trace` in order.
    pub fn replay(&mut self, trace: &[Access]) {
        for access in trace {
            self.access(access.is_write(), access.address);
        }
    }

    /// Invalidates every line and zeroes the clock and counters.
    ///
    /// The line grid is reused; afterwards the cache is indistinguishable from
    /// a freshly constructed one with the same configuration.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.clock = 0;
        self.stats = CacheStats::default();
    }

    /// Returns the statistics accumulated since construction or the last reset.
    #[inline]
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Returns the resident line holding `addr`'s block, if any.
    ///
    /// Does not count as an access and does not touch recency.
    pub fn resident_line(&self, addr: u64) -> Option<&CacheLine> {
        let (set_index, tag) = self.locate(addr);
        self.set_lines(set_index)?
            .iter()
            .find(|line| line.valid && line.tag == tag)
    }

    /// Checks if the cache contains the block of `addr`.
    pub fn contains(&self, addr: u64) -> bool {
        self.resident_line(addr).is_some()
    }

    /// Checks if the block of `addr` is resident and dirty.
    pub fn is_dirty(&self, addr: u64) -> bool {
        self.resident_line(addr).is_some_and(|line| line.dirty)
    }

    /// Returns the lines of one set, or `None` if `set_index` is out of range.
    pub fn set_lines(&self, set_index: usize) -> Option<&[CacheLine]> {
        let base = set_index.checked_mul(self.ways)?;
        let end = base.checked_add(self.ways)?;
        self.lines.get(base..end)
    }

    /// Returns the configuration this cache was built from.
    #[inline]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Total cache size in bytes.
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.config.size_bytes
    }

    /// Block size in bytes.
    #[inline]
    pub const fn block_bytes(&self) -> usize {
        self.config.block_bytes
    }

    /// Requested associativity.
    #[inline]
    pub const fn associativity(&self) -> Associativity {
        self.config.associativity
    }

    /// Write propagation policy.
    #[inline]
    pub const fn write_policy(&self) -> WritePolicy {
        self.config.write_policy
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Lines per set (resolved; `Full` becomes the total block count).
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }
}
