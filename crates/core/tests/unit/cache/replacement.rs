//! Replacement Tests.
//!
//! Verifies victim selection: invalid lines are filled first (lowest way
//! wins), then the least recently used valid line is evicted.

use cachesim_core::config::{Associativity, WritePolicy};
use rstest::rstest;

use crate::common::{reads, small_cache, test_cache};

// Set 0 of the small cache (2 sets, 2 ways, 64-byte blocks).
const A: u64 = 0x000;
const B: u64 = 0x080;
const C: u64 = 0x100;

/// Fill both ways, then a third block evicts the older one.
#[test]
fn conflict_evicts_least_recent() {
    let mut cache = small_cache(WritePolicy::WriteBack);
    cache.replay(&reads(&[A, B, C]));

    assert!(!cache.contains(A), "LRU victim should be evicted");
    assert!(cache.contains(B), "Recently used block should survive");
    assert!(cache.contains(C), "Newly installed block should be present");
}

/// Re-accessing a block before the conflict protects it.
#[test]
fn reaccess_protects_from_eviction() {
    let mut cache = small_cache(WritePolicy::WriteBack);
    cache.replay(&reads(&[A, B, A, C]));

    assert!(cache.contains(A));
    assert!(!cache.contains(B), "B became LRU after A was touched");
    assert!(cache.contains(C));
    assert_eq!(cache.stats().hits, 1);
}

/// Classic thrashing: N + 1 blocks cycled through an N-way set never hit.
#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn cyclic_pattern_thrashes(#[case] ways: usize) {
    // One set of `ways` lines: size = ways * 16, block = 16, fully associative.
    let mut cache = test_cache(ways * 16, 16, Associativity::Ways(ways), WritePolicy::WriteBack);
    let blocks: Vec<u64> = (0..=ways as u64).map(|b| b * 16).collect();

    cache.replay(&reads(&blocks));
    cache.replay(&reads(&blocks));

    let stats = cache.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 2 * (ways as u64 + 1));
}

/// Touching one of the first N blocks before the (N+1)th keeps it resident.
#[rstest]
#[case(2, 0)]
#[case(4, 1)]
#[case(4, 3)]
fn touched_block_survives_overflow(#[case] ways: usize, #[case] keep: u64) {
    let mut cache = test_cache(ways * 16, 16, Associativity::Ways(ways), WritePolicy::WriteBack);
    let first: Vec<u64> = (0..ways as u64).map(|b| b * 16).collect();

    cache.replay(&reads(&first));
    cache.access(false, keep * 16);
    cache.access(false, ways as u64 * 16);

    assert!(cache.contains(keep * 16));
    let victim = if keep == 0 { 16 } else { 0 };
    assert!(!cache.contains(victim), "Oldest untouched block is evicted");
}

/// An invalid way is filled before any valid line is evicted, even when a
/// valid line is older.
#[test]
fn invalid_line_preferred_over_lru() {
    // 4 ways, one set.
    let mut cache = test_cache(256, 64, Associativity::Full, WritePolicy::WriteBack);
    cache.replay(&reads(&[0x000, 0x040, 0x000, 0x080]));

    assert!(cache.contains(0x000));
    assert!(cache.contains(0x040), "LRU line kept while an invalid way existed");
    assert!(cache.contains(0x080));

    let set = cache.set_lines(0).unwrap();
    assert!(set[2].valid, "Third block fills the lowest invalid way");
    assert!(!set[3].valid);
}

/// Cold fills use ways in ascending order.
#[test]
fn cold_fills_take_lowest_way_first() {
    let mut cache = test_cache(256, 64, Associativity::Full, WritePolicy::WriteBack);
    cache.replay(&reads(&[0x0c0, 0x000]));

    let set = cache.set_lines(0).unwrap();
    assert_eq!(set[0].tag, 3);
    assert_eq!(set[1].tag, 0);
    assert!(!set[2].valid && !set[3].valid);
}

/// The evicted line's slot is reused in place.
#[test]
fn victim_slot_is_reused() {
    let mut cache = small_cache(WritePolicy::WriteBack);
    cache.replay(&reads(&[A, B, C]));

    let set = cache.set_lines(0).unwrap();
    // A (tag 0) was in way 0; C (tag 2) overwrote it.
    assert_eq!(set[0].tag, 2);
    assert_eq!(set[1].tag, 1);
}

/// Fully associative caches hold any working set up to their block count.
#[test]
fn fully_associative_never_thrashes_within_capacity() {
    let mut cache = test_cache(1024, 32, Associativity::Full, WritePolicy::WriteBack);
    // 32 blocks that would collide in a direct-mapped cache of 32 sets.
    let blocks: Vec<u64> = (0..32).map(|i| i * 1024).collect();

    cache.replay(&reads(&blocks));
    cache.replay(&reads(&blocks));

    let stats = cache.stats();
    assert_eq!(stats.misses, 32);
    assert_eq!(stats.hits, 32);
}

/// The same pattern thrashes a direct-mapped cache.
#[test]
fn direct_mapped_thrashes_on_same_pattern() {
    let mut cache = test_cache(1024, 32, Associativity::Ways(1), WritePolicy::WriteBack);
    let blocks: Vec<u64> = (0..32).map(|i| i * 1024).collect();

    cache.replay(&reads(&blocks));
    cache.replay(&reads(&blocks));

    assert_eq!(cache.stats().hits, 0);
}
