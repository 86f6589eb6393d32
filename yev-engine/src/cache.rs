//! Shared caches and their hit/miss counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use rustc_hash::FxHashMap;
use yev_core::{DiceMultiset, NUM_CATEGORIES};

/// Hit/miss counters for one cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups served from the cache (0.0 before any lookup).
    pub fn hit_rate(&self) -> f64 {
        let h = self.hits() as f64;
        let total = h + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            h / total
        }
    }
}

/// Per-roll expected value of every category, in category index order.
pub type CategoryValues = [f64; NUM_CATEGORIES];

/// Expected-value cache: one entry per roll holds all thirteen category values.
#[derive(Debug, Default)]
pub struct ExpectedValueCache {
    map: RwLock<FxHashMap<DiceMultiset, CategoryValues>>,
    stats: CacheStats,
}

impl ExpectedValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached vector for `roll`, computing it with `compute` on a miss.
    ///
    /// `compute` runs under the write lock, at most once per key.
    pub fn get_or_insert_with(
        &self,
        roll: DiceMultiset,
        compute: impl FnOnce() -> CategoryValues,
    ) -> CategoryValues {
        if let Some(v) = self
            .map
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&roll)
        {
            self.stats.hit();
            return *v;
        }
        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        if let Some(v) = map.get(&roll) {
            self.stats.hit();
            return *v;
        }
        self.stats.miss();
        let v = compute();
        map.insert(roll, v);
        v
    }

    pub fn contains(&self, roll: &DiceMultiset) -> bool {
        self.map
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(roll)
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
