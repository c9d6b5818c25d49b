//! Cache Model Property Tests.
//!
//! Random traces over random valid shapes; checks the counter and structural
//! invariants that must hold for every input.

use std::collections::HashSet;

use cachesim_core::cache::CacheSim;
use cachesim_core::common::Access;
use cachesim_core::config::{Associativity, CacheConfig, WritePolicy};
use proptest::prelude::*;

fn arb_policy() -> impl Strategy<Value = WritePolicy> {
    prop_oneof![Just(WritePolicy::WriteBack), Just(WritePolicy::WriteThrough)]
}

/// Valid shapes only: power-of-two sizes with ways dividing the block count.
fn arb_config() -> impl Strategy<Value = CacheConfig> {
    (2u32..=8, 2u32..=6, 0u32..=3, any::<bool>(), arb_policy()).prop_map(
        |(blocks_log2, block_log2, ways_log2, full, policy)| {
            let block = 1usize << block_log2;
            let num_blocks = 1usize << blocks_log2;
            let assoc = if full {
                Associativity::Full
            } else {
                Associativity::Ways(1 << ways_log2.min(blocks_log2))
            };
            CacheConfig::new(num_blocks * block, block, assoc, policy)
        },
    )
}

fn arb_trace() -> impl Strategy<Value = Vec<Access>> {
    prop::collection::vec(
        (any::<bool>(), 0u64..0x4000).prop_map(|(write, address)| {
            if write { Access::write(address) } else { Access::read(address) }
        }),
        0..400,
    )
}

proptest! {
    #[test]
    fn hits_plus_misses_equals_requests(config in arb_config(), trace in arb_trace()) {
        let mut cache = CacheSim::new(&config).unwrap();
        cache.replay(&trace);

        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, stats.total_requests);
        prop_assert_eq!(stats.total_requests, trace.len() as u64);
    }

    #[test]
    fn every_miss_fetches_one_block(config in arb_config(), trace in arb_trace()) {
        let mut cache = CacheSim::new(&config).unwrap();
        cache.replay(&trace);

        let stats = cache.stats();
        prop_assert_eq!(stats.bytes_mem_to_cache, stats.misses * config.block_bytes as u64);
    }

    #[test]
    fn no_duplicate_tags_within_a_set(config in arb_config(), trace in arb_trace()) {
        let mut cache = CacheSim::new(&config).unwrap();
        cache.replay(&trace);

        for set in 0..cache.num_sets() {
            let mut seen = HashSet::new();
            for line in cache.set_lines(set).unwrap().iter().filter(|l| l.valid) {
                prop_assert!(seen.insert(line.tag), "duplicate tag {} in set {}", line.tag, set);
            }
        }
    }

    #[test]
    fn last_access_is_always_resident(config in arb_config(), trace in arb_trace()) {
        let mut cache = CacheSim::new(&config).unwrap();
        cache.replay(&trace);

        if let Some(last) = trace.last() {
            prop_assert!(cache.contains(last.address));
        }
    }

    #[test]
    fn read_only_traces_never_write(config in arb_config(), addrs in prop::collection::vec(0u64..0x4000, 0..400)) {
        let mut cache = CacheSim::new(&config).unwrap();
        for addr in &addrs {
            cache.access(false, *addr);
        }
        prop_assert_eq!(cache.stats().bytes_cache_to_mem, 0);
    }

    #[test]
    fn write_through_charges_each_write_once(config in arb_config(), trace in arb_trace()) {
        let config = CacheConfig { write_policy: WritePolicy::WriteThrough, ..config };
        let mut cache = CacheSim::new(&config).unwrap();
        cache.replay(&trace);

        let writes = trace.iter().filter(|a| a.is_write()).count() as u64;
        prop_assert_eq!(cache.stats().bytes_cache_to_mem, writes * config.block_bytes as u64);
        for access in &trace {
            prop_assert!(!cache.is_dirty(access.address));
        }
    }

    #[test]
    fn write_back_never_writes_more_than_write_through(config in arb_config(), trace in arb_trace()) {
        let wb = CacheConfig { write_policy: WritePolicy::WriteBack, ..config };
        let wt = CacheConfig { write_policy: WritePolicy::WriteThrough, ..config };
        let mut wb_cache = CacheSim::new(&wb).unwrap();
        let mut wt_cache = CacheSim::new(&wt).unwrap();
        wb_cache.replay(&trace);
        wt_cache.replay(&trace);

        prop_assert_eq!(wb_cache.stats().hits, wt_cache.stats().hits);
        prop_assert!(wb_cache.stats().bytes_cache_to_mem <= wt_cache.stats().bytes_cache_to_mem);
    }

    #[test]
    fn fully_associative_misses_only_on_first_touch(
        blocks_log2 in 2u32..=6,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..300),
    ) {
        let num_blocks = 1usize << blocks_log2;
        let config = CacheConfig::new(num_blocks * 16, 16, Associativity::Full, WritePolicy::WriteBack);
        let mut cache = CacheSim::new(&config).unwrap();

        // Working set of exactly `num_blocks` blocks, spread so they would collide in smaller caches.
        let trace: Vec<u64> = picks.iter().map(|i| i.index(num_blocks) as u64 * 4096).collect();
        for addr in &trace {
            cache.access(false, *addr);
        }

        let distinct = trace.iter().collect::<HashSet<_>>().len() as u64;
        prop_assert_eq!(cache.stats().misses, distinct);
    }
}
