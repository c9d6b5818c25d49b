//! Shared helpers for building caches and traces in tests.


pub use harness::{reads, small_cache, test_cache, writes};
