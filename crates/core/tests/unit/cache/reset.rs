//! Reset Tests.
//!
//! `reset` must leave a used cache observably identical to a fresh one.

use cachesim_core::cache::CacheLine;
use cachesim_core::config::{Associativity, WritePolicy};
use cachesim_core::stats::CacheStats;

use crate::common::{small_cache, test_cache, writes};

#[test]
fn reset_clears_counters_and_lines() {
    let mut cache = small_cache(WritePolicy::WriteBack);
    cache.replay(&writes(&[0x000, 0x040, 0x080, 0x100]));
    cache.reset();

    assert_eq!(*cache.stats(), CacheStats::default());
    for set in 0..cache.num_sets() {
        for line in cache.set_lines(set).unwrap() {
            assert_eq!(*line, CacheLine::default());
        }
    }
    assert!(!cache.contains(0x000));
}

#[test]
fn reset_keeps_geometry() {
    let mut cache = test_cache(2048, 32, Associativity::Ways(4), WritePolicy::WriteThrough);
    cache.access(true, 0x40);
    cache.reset();

    assert_eq!(cache.num_sets(), 16);
    assert_eq!(cache.ways(), 4);
    assert_eq!(cache.write_policy(), WritePolicy::WriteThrough);
}

/// Replaying after a reset gives the same numbers as a fresh cache.
#[test]
fn replay_after_reset_matches_fresh() {
    let trace = writes(&[0x000, 0x080, 0x000, 0x100, 0x180, 0x080, 0x040]);

    let mut reused = small_cache(WritePolicy::WriteBack);
    reused.replay(&trace);
    let first = *reused.stats();
    reused.reset();
    reused.replay(&trace);

    let mut fresh = small_cache(WritePolicy::WriteBack);
    fresh.replay(&trace);

    assert_eq!(*reused.stats(), first);
    assert_eq!(*reused.stats(), *fresh.stats());
}

/// The logical clock restarts, so recency stamps match a fresh run.
#[test]
fn reset_restarts_clock() {
    let mut cache = small_cache(WritePolicy::WriteBack);
    cache.replay(&writes(&[0x000, 0x040, 0x080]));
    cache.reset();
    cache.access(false, 0x000);

    assert_eq!(cache.resident_line(0x000).unwrap().last_used, 1);
}
