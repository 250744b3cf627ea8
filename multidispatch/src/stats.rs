//! Instrumentation counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a generic function's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Calls to `invoke`.
    pub invocations: u64,
    /// Invocations answered from the cache.
    pub cache_hits: u64,
    /// Effective method computations (layering runs).
    pub resolutions: u64,
    /// Successful method registrations.
    pub registrations: u64,
    /// Cache clears caused by registration.
    pub invalidations: u64,
}

impl DispatchStats {
    /// Fraction of invocations answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        if self.invocations == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.invocations as f64
        }
    }
}

/// Live counters, updated without taking the dispatch lock.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    invocations: AtomicU64,
    cache_hits: AtomicU64,
    resolutions: AtomicU64,
    registrations: AtomicU64,
    invalidations: AtomicU64,
}

impl Counters {
    pub(crate) fn invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            invocations: self.invocations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_hit_rate() {
        let counters = Counters::default();
        assert_eq!(counters.snapshot().hit_rate(), 0.0);

        for _ in 0..4 {
            counters.invocation();
        }
        counters.cache_hit();
        counters.cache_hit();
        counters.cache_hit();
        counters.resolution();

        let stats = counters.snapshot();
        assert_eq!(stats.invocations, 4);
        assert_eq!(stats.cache_hits, 3);
        assert_eq!(stats.resolutions, 1);
        assert_eq!(stats.hit_rate(), 0.75);
    }
}
