//! Cache statistics collection.
//!
//! This module tracks the counters a single cache run accumulates. It provides:
//! 1. **Request accounting:** Total requests, hits, and misses.
//! 2. **Traffic accounting:** Bytes fetched from memory and bytes written back to it.
//! 3. **Derived metrics:** Hit and miss rates, undefined when no request was made.

use serde::Serialize;

/// Counters accumulated by one cache over one trace replay.
///
/// `hits + misses == total_requests` holds after every access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of accesses issued to the cache.
    pub total_requests: u64,
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that had to fetch their block.
    pub misses: u64,
    /// Bytes fetched from backing memory into the cache.
    pub bytes_mem_to_cache: u64,
    /// Bytes written from the cache to backing memory.
    pub bytes_cache_to_mem: u64,
}

impl CacheStats {
    /// Fraction of requests that hit, or `None` before the first request.
    ///
    /// Callers must render `None` as "no data" rather than coercing it to a number.
    pub fn hit_rate(&self) -> Option<f64> {
        (self.total_requests > 0).then(|| self.hits as f64 / self.total_requests as f64)
    }

    /// Fraction of requests that missed, or `None` before the first request.
    pub fn miss_rate(&self) -> Option<f64> {
        (self.total_requests > 0).then(|| self.misses as f64 / self.total_requests as f64)
    }

    /// Total bytes moved in either direction.
    pub const fn total_traffic(&self) -> u64 {
        self.bytes_mem_to_cache + self.bytes_cache_to_mem
    }

    /// Prints a short human-readable summary to stdout.
    pub fn print(&self) {
        let rate = |r: Option<f64>| r.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * 100.0));
        println!("----------------------------------------------------------");
        println!("cache.requests           {}", self.total_requests);
        println!("cache.hits               {}", self.hits);
        println!("cache.misses             {}", self.misses);
        println!("cache.hit_rate           {}", rate(self.hit_rate()));
        println!("cache.miss_rate          {}", rate(self.miss_rate()));
        println!("mem.bytes_fetched        {}", self.bytes_mem_to_cache);
        println!("mem.bytes_written        {}", self.bytes_cache_to_mem);
        println!("mem.bytes_total          {}", self.total_traffic());
        println!("----------------------------------------------------------");
    }
}
