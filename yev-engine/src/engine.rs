//! Expected-value decision engine.
//!
//! ## Model
//! - **roll**: the dice currently on the table, possibly fewer than five.
//! - **open**: categories still unfilled in the scorecard column.
//! - **attempts**: physical rolls still allowed this turn ([`Attempts`], 0..=3).
//!
//! The value of holding a multiset `k` is one step deep: the best open
//! category's mean score over every completion of `k`. A complete roll with
//! attempts left is rerolled only when some keep strictly beats stopping.

use std::sync::Arc;

use thiserror::Error;
use yev_core::{Category, CategorySet, DiceError, DiceMultiset, EngineConfig, NUM_CATEGORIES};

use crate::cache::{CategoryValues, ExpectedValueCache};
use crate::completions::CompletionCache;
use crate::keep::enumerate_keep_options;
use crate::stats::ScoreDistribution;
use crate::turn::Attempts;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecideError {
    #[error("no open categories left to score")]
    NoOpenCategories,
    #[error("turn already committed")]
    TurnFinished,
    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// What to do with the current roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Score the current roll in `category`.
    Commit {
        category: Category,
        expected_value: f64,
    },
    /// Hold `keep` and roll the remaining dice.
    Reroll {
        keep: DiceMultiset,
        expected_value: f64,
    },
}

impl Decision {
    pub fn expected_value(&self) -> f64 {
        match *self {
            Decision::Commit { expected_value, .. } | Decision::Reroll { expected_value, .. } => {
                expected_value
            }
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Decision::Commit { .. })
    }
}

/// Expected-value engine. Cheap to clone; clones share caches.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    completions: Arc<CompletionCache>,
    values: Arc<ExpectedValueCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default config and fresh caches.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_caches(
            config,
            Arc::new(CompletionCache::new()),
            Arc::new(ExpectedValueCache::new()),
        )
    }

    /// Engine over caller-owned caches (shared across engines or inspected by tests).
    ///
    /// `max_attempts` is clamped to `1..=3`; [`yev_core::Config::validate`]
    /// rejects out-of-range values before they get here.
    pub fn with_caches(
        mut config: EngineConfig,
        completions: Arc<CompletionCache>,
        values: Arc<ExpectedValueCache>,
    ) -> Self {
        config.max_attempts = config.max_attempts.clamp(1, Attempts::MAX.get());
        Self {
            config,
            completions,
            values,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn completion_cache(&self) -> &Arc<CompletionCache> {
        &self.completions
    }

    pub fn value_cache(&self) -> &Arc<ExpectedValueCache> {
        &self.values
    }

    /// Attempts a fresh turn starts with.
    pub fn max_attempts(&self) -> Attempts {
        Attempts::new(self.config.max_attempts).unwrap_or(Attempts::MAX)
    }

    /// Mean score of every category over all completions of `roll`.
    pub fn expected_values(&self, roll: DiceMultiset) -> CategoryValues {
        self.values.get_or_insert_with(roll, || {
            let dist = self.completions.get(roll);
            let mut out = [0.0; NUM_CATEGORIES];
            for cat in Category::ALL {
                out[cat.index()] = ScoreDistribution::for_category(&dist, cat).mean();
            }
            out
        })
    }

    /// Mean score of `category` over all completions of `roll`.
    pub fn expected_value(&self, roll: DiceMultiset, category: Category) -> f64 {
        self.expected_values(roll)[category.index()]
    }

    /// Open category with the highest expected value; lowest index wins ties.
    pub fn best_category(
        &self,
        roll: DiceMultiset,
        open: CategorySet,
    ) -> Result<(Category, f64), DecideError> {
        let values = self.expected_values(roll);
        let mut best: Option<(Category, f64)> = None;
        for cat in open.iter() {
            let v = values[cat.index()];
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((cat, v)),
            }
        }
        best.ok_or(DecideError::NoOpenCategories)
    }

    /// Every keep option of `roll` paired with its one-step value, in
    /// enumeration order (`roll` itself first).
    pub fn keep_values(
        &self,
        roll: DiceMultiset,
        open: CategorySet,
    ) -> Result<Vec<(DiceMultiset, f64)>, DecideError> {
        enumerate_keep_options(roll)
            .into_iter()
            .map(|k| self.best_category(k, open).map(|(_, v)| (k, v)))
            .collect()
    }

    /// Highest-valued keep option of `roll`; the first one wins ties.
    pub fn best_keep(
        &self,
        roll: DiceMultiset,
        open: CategorySet,
    ) -> Result<(DiceMultiset, f64), DecideError> {
        let mut best: Option<(DiceMultiset, f64)> = None;
        for (k, v) in self.keep_values(roll, open)? {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((k, v)),
            }
        }
        best.ok_or(DecideError::NoOpenCategories)
    }

    /// Decide between committing `roll` now and rerolling part of it.
    pub fn decide_move(
        &self,
        roll: DiceMultiset,
        open: CategorySet,
        attempts: Attempts,
    ) -> Result<Decision, DecideError> {
        if open.is_empty() {
            return Err(DecideError::NoOpenCategories);
        }

        if attempts.is_exhausted() {
            let (category, expected_value) = self.best_category(roll, open)?;
            return Ok(Decision::Commit {
                category,
                expected_value,
            });
        }

        // Nothing to commit yet: fill the roll up.
        if !roll.is_complete() {
            let (keep, expected_value) = self.best_keep(roll, open)?;
            return Ok(Decision::Reroll {
                keep,
                expected_value,
            });
        }

        // The empty keep is always an option and scores above 0 for every
        // category, so a stop value of 0 always rerolls here.
        let (category, stop) = self.best_category(roll, open)?;
        let (keep, reroll) = self.best_keep(roll, open)?;
        if reroll > stop {
            return Ok(Decision::Reroll {
                keep,
                expected_value: reroll,
            });
        }

        Ok(Decision::Commit {
            category,
            expected_value: stop,
        })
    }
}
