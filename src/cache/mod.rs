//! Gram matrix cache for the SMO solver
//!
//! Linear-kernel inner products `<x_i, x_j>` are recomputed constantly while
//! pairs of multipliers are optimized. The Gram matrix is symmetric, so only
//! the entry with `i <= j` is stored.

use lru::LruCache;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PairKey {
    lo: usize,
    hi: usize,
}

impl PairKey {
    fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { lo: i, hi: j }
        } else {
            Self { lo: j, hi: i }
        }
    }
}

/// LRU cache of Gram matrix entries
pub struct GramCache {
    cache: LruCache<PairKey, f64>,
    hits: u64,
    misses: u64,
}

impl GramCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Size the cache from a memory budget in bytes (16 bytes per entry),
    /// never reserving more slots than the
    /// `n_rows * (n_rows + 1) / 2` distinct entries of the Gram matrix
    pub fn for_rows(n_rows: usize, memory_bytes: usize) -> Self {
        let distinct = n_rows.saturating_mul(n_rows.saturating_add(1)) / 2;
        Self::new((memory_bytes / 16).min(distinct).max(1))
    }

    /// Return the cached entry for (i, j), computing and storing it on a miss
    pub fn get_or_compute<F>(&mut self, i: usize, j: usize, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        let key = PairKey::new(i, j);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            return value;
        }
        self.misses += 1;
        let value = compute();
        self.cache.put(key, value);
        value
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_symmetric() {
        assert_eq!(PairKey::new(1, 5), PairKey::new(5, 1));
        assert_eq!(PairKey::new(5, 1).lo, 1);
    }

    #[test]
    fn test_get_or_compute_caches_value() {
        let mut cache = GramCache::new(4);
        let mut calls = 0;

        let first = cache.get_or_compute(0, 1, || {
            calls += 1;
            5.0
        });
        let second = cache.get_or_compute(1, 0, || {
            calls += 1;
            -1.0
        });

        assert_eq!(first, 5.0);
        assert_eq!(second, 5.0);
        assert_eq!(calls, 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = GramCache::new(2);
        cache.get_or_compute(0, 1, || 1.0);
        cache.get_or_compute(1, 2, || 2.0);
        cache.get_or_compute(2, 3, || 3.0); // evicts (0, 1)

        assert_eq!(cache.get_or_compute(0, 1, || 10.0), 10.0);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn test_memory_limit_and_zero_capacity() {
        assert_eq!(GramCache::new(0).stats().capacity, 1);
        assert_eq!(GramCache::for_rows(4, 100_000_000).stats().capacity, 10);
        assert_eq!(GramCache::for_rows(1000, 1600).stats().capacity, 100);
    }
}
