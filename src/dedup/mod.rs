//! Transfer hash deduplication with bulk eviction.
//!
//! Every hash the scheduler observes is marked here exactly once, whether
//! or not it produced a notification. Memory is bounded by clearing the
//! whole set once it grows past a fixed cap — a deliberate coarse policy
//! (no LRU, no TTL). Immediately after a clear, a transfer still inside
//! the fetch window can be reprocessed and re-notify; that re-notification
//! is an accepted tradeoff of the policy, not a bug.

use std::collections::HashSet;
use tracing::debug;

/// Clear the set once it holds more than this many hashes.
const EVICTION_CAP: usize = 1500;

/// Bounded set of transfer hashes seen since the last eviction.
#[derive(Debug, Default)]
pub struct SeenSet {
    hashes: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the hash was marked since the last eviction.
    pub fn seen(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Idempotent: marking a hash twice is the same as marking it once.
    pub fn mark_seen(&mut self, hash: &str) {
        self.hashes.insert(hash.to_string());
    }

    /// Bulk eviction: clears everything once the cap is exceeded.
    ///
    /// The scheduler calls this once per completed pass over the
    /// watchlist, never per record, so a single cycle can overshoot the
    /// cap before the clear lands.
    pub fn maybe_evict(&mut self) {
        if self.hashes.len() > EVICTION_CAP {
            debug!(evicted = self.hashes.len(), "clearing seen-set");
            self.hashes.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seen_after_mark() {
        let mut set = SeenSet::new();
        assert!(!set.seen("0xabc"));
        set.mark_seen("0xabc");
        assert!(set.seen("0xabc"));
        assert!(!set.seen("0xdef"));
    }

    #[test]
    fn mark_is_idempotent() {
        let mut set = SeenSet::new();
        set.mark_seen("0xabc");
        set.mark_seen("0xabc");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn no_eviction_at_or_below_cap() {
        let mut set = SeenSet::new();
        for i in 0..EVICTION_CAP {
            set.mark_seen(&format!("0x{i}"));
        }
        set.maybe_evict();
        assert_eq!(set.len(), EVICTION_CAP);
    }

    #[test]
    fn bulk_eviction_above_cap() {
        let mut set = SeenSet::new();
        for i in 0..=EVICTION_CAP {
            set.mark_seen(&format!("0x{i}"));
        }
        assert_eq!(set.len(), EVICTION_CAP + 1);
        set.maybe_evict();
        assert!(set.is_empty());
    }

    #[test]
    fn eviction_starts_a_fresh_epoch() {
        let mut set = SeenSet::new();
        for i in 0..=EVICTION_CAP {
            set.mark_seen(&format!("0x{i}"));
        }
        set.maybe_evict();
        // A hash from the previous epoch is no longer deduplicated.
        assert!(!set.seen("0x0"));
    }
}
