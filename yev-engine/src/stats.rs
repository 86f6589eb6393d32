//! Score distributions over completion outcomes.

use std::sync::OnceLock;

use yev_core::{Category, DiceMultiset, NUM_CATEGORIES};

use crate::completions::{enumerate_completions, OutcomeDistribution};

/// Weighted scores sorted ascending, with equal scores merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreDistribution {
    // (score, weight), strictly ascending by score.
    entries: Vec<(i32, u64)>,
    total_weight: u64,
}

impl ScoreDistribution {
    /// Score every outcome of `dist` with `scorer`.
    pub fn build(dist: &OutcomeDistribution, scorer: impl Fn(&DiceMultiset) -> i32) -> Self {
        Self::from_weighted(dist.iter().map(|(roll, w)| (scorer(&roll), w as u64)))
    }

    /// Unit-weight distribution of observed scores, e.g. finished game totals.
    pub fn from_scores(scores: impl IntoIterator<Item = i32>) -> Self {
        Self::from_weighted(scores.into_iter().map(|s| (s, 1)))
    }

    fn from_weighted(raw: impl Iterator<Item = (i32, u64)>) -> Self {
        let mut raw: Vec<(i32, u64)> = raw.collect();
        raw.sort_unstable_by_key(|&(s, _)| s);

        let mut entries: Vec<(i32, u64)> = Vec::with_capacity(raw.len());
        for (s, w) in raw {
            match entries.last_mut() {
                Some(last) if last.0 == s => last.1 += w,
                _ => entries.push((s, w)),
            }
        }
        let total_weight = entries.iter().map(|&(_, w)| w).sum();
        Self {
            entries,
            total_weight,
        }
    }

    /// Distribution of `cat`'s score over the completions of `dist`.
    pub fn for_category(dist: &OutcomeDistribution, cat: Category) -> Self {
        Self::build(dist, |r| cat.score(r))
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct scores with their merged weights, ascending.
    pub fn entries(&self) -> &[(i32, u64)] {
        &self.entries
    }

    /// Weighted arithmetic mean; 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.total_weight == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .entries
            .iter()
            .map(|&(s, w)| s as f64 * w as f64)
            .sum();
        sum / self.total_weight as f64
    }

    /// Weighted population standard deviation; 0.0 when empty.
    pub fn std_dev(&self) -> f64 {
        if self.total_weight == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let var: f64 = self
            .entries
            .iter()
            .map(|&(s, w)| (s as f64 - mean).powi(2) * w as f64)
            .sum::<f64>()
            / self.total_weight as f64;
        var.sqrt()
    }

    /// Empirical CDF: fraction of weight with score `<= score`.
    ///
    /// 1.0 at or above the maximum (and everywhere when empty), 0.0 below the minimum.
    pub fn percentile(&self, score: i32) -> f64 {
        if self.total_weight == 0 {
            return 1.0;
        }
        let mut acc = 0u64;
        for &(s, w) in &self.entries {
            if s > score {
                break;
            }
            acc += w;
        }
        if acc == self.total_weight {
            1.0
        } else {
            acc as f64 / self.total_weight as f64
        }
    }

    pub fn min(&self) -> Option<i32> {
        self.entries.first().map(|&(s, _)| s)
    }

    pub fn max(&self) -> Option<i32> {
        self.entries.last().map(|&(s, _)| s)
    }

    /// Smallest score whose CDF reaches 0.5.
    pub fn median(&self) -> Option<i32> {
        let mut acc = 0u64;
        for &(s, w) in &self.entries {
            acc += w;
            if acc * 2 >= self.total_weight {
                return Some(s);
            }
        }
        None
    }
}

/// Fresh-turn distributions: each category's score over all five dice rolled
/// once from nothing. Used to rank a committed score against what a turn
/// usually yields.
#[derive(Debug, Clone)]
pub struct CategoryTables {
    tables: Vec<ScoreDistribution>,
}

impl CategoryTables {
    pub fn new() -> Self {
        let fresh = enumerate_completions(DiceMultiset::EMPTY);
        let tables = Category::ALL
            .iter()
            .map(|&c| ScoreDistribution::for_category(&fresh, c))
            .collect();
        Self { tables }
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> &'static CategoryTables {
        static TABLES: OnceLock<CategoryTables> = OnceLock::new();
        TABLES.get_or_init(CategoryTables::new)
    }

    pub fn get(&self, cat: Category) -> &ScoreDistribution {
        &self.tables[cat.index()]
    }

    pub fn percentile(&self, cat: Category, score: i32) -> f64 {
        self.get(cat).percentile(score)
    }

    /// Fresh-turn mean of every category.
    pub fn means(&self) -> [f64; NUM_CATEGORIES] {
        let mut out = [0.0; NUM_CATEGORIES];
        for (o, t) in out.iter_mut().zip(&self.tables) {
            *o = t.mean();
        }
        out
    }
}

impl Default for CategoryTables {
    fn default() -> Self {
        Self::new()
    }
}
