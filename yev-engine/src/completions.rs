//! Completion enumeration: every five-dice outcome reachable from a partial roll.
//!
//! For a partial roll missing `k` dice, all `6^k` ordered face sequences are
//! enumerated and folded into a weighted multiset distribution. Weights count
//! orderings, so they always sum to `6^k`.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;
use yev_core::{DiceMultiset, NUM_FACES};

use crate::cache::CacheStats;

/// Complete rolls reachable from `base`, each with its number of orderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeDistribution {
    base: DiceMultiset,
    // Sorted ascending by multiset.
    outcomes: Vec<(DiceMultiset, u32)>,
    total_weight: u64,
}

impl OutcomeDistribution {
    /// The partial roll this distribution completes.
    pub fn base(&self) -> DiceMultiset {
        self.base
    }

    /// Dice rolled to complete `base`.
    pub fn dice_rolled(&self) -> usize {
        self.base.missing()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Sum of weights; always `6^dice_rolled()`.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Weight of one outcome (0 if unreachable).
    pub fn weight(&self, roll: &DiceMultiset) -> u32 {
        self.outcomes
            .binary_search_by(|(r, _)| r.cmp(roll))
            .map(|i| self.outcomes[i].1)
            .unwrap_or(0)
    }

    /// Probability of one outcome.
    pub fn probability(&self, roll: &DiceMultiset) -> f64 {
        self.weight(roll) as f64 / self.total_weight as f64
    }

    /// Outcomes in ascending multiset order.
    pub fn iter(&self) -> impl Iterator<Item = (DiceMultiset, u32)> + '_ {
        self.outcomes.iter().copied()
    }
}

/// Enumerate all completions of `partial`.
///
/// A complete roll yields the single outcome `{partial: 1}`.
pub fn enumerate_completions(partial: DiceMultiset) -> OutcomeDistribution {
    let missing = partial.missing();
    if missing == 0 {
        return OutcomeDistribution {
            base: partial,
            outcomes: vec![(partial, 1)],
            total_weight: 1,
        };
    }

    let sequences = (NUM_FACES as u32).pow(missing as u32);
    let mut acc: FxHashMap<DiceMultiset, u32> = FxHashMap::default();
    for seq in 0..sequences {
        // Decode `seq` as `missing` base-6 digits, one per rolled die.
        let mut counts = partial.counts();
        let mut rest = seq;
        for _ in 0..missing {
            counts[(rest % NUM_FACES as u32) as usize] += 1;
            rest /= NUM_FACES as u32;
        }
        let outcome = DiceMultiset::from_counts(counts)
            .expect("partial roll plus missing dice is exactly five dice");
        *acc.entry(outcome).or_insert(0) += 1;
    }

    let mut outcomes: Vec<(DiceMultiset, u32)> = acc.into_iter().collect();
    outcomes.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    OutcomeDistribution {
        base: partial,
        outcomes,
        total_weight: sequences as u64,
    }
}

/// Shared, append-only cache of completion distributions keyed by partial roll.
///
/// Safe to share across threads: lookups take a read lock; a miss computes and
/// inserts under the write lock, so each key is computed at most once.
#[derive(Debug, Default)]
pub struct CompletionCache {
    map: RwLock<FxHashMap<DiceMultiset, Arc<OutcomeDistribution>>>,
    stats: CacheStats,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached [`enumerate_completions`].
    pub fn get(&self, partial: DiceMultiset) -> Arc<OutcomeDistribution> {
        if let Some(d) = self
            .map
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&partial)
        {
            self.stats.hit();
            return Arc::clone(d);
        }
        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        if let Some(d) = map.get(&partial) {
            self.stats.hit();
            return Arc::clone(d);
        }
        self.stats.miss();
        let d = Arc::new(enumerate_completions(partial));
        map.insert(partial, Arc::clone(&d));
        d
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
