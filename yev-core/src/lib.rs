//! yev-core: dice multisets, scoring categories, scorecards, dice sources and configuration.

pub mod category;
pub mod chance;
pub mod config;
pub mod dice;
pub mod scorecard;
pub mod scoring;

pub use category::{Category, CategorySet, UnknownCategory, CATEGORY_NAMES, NUM_CATEGORIES};
pub use chance::{DiceSource, EventKeyedDice, RngDice, ScriptedDice};
pub use config::{Config, ConfigError, EngineConfig, StrategyKind};
pub use dice::{DiceError, DiceMultiset, NUM_DICE, NUM_FACES};
pub use scorecard::{ScoreCard, ScoreCardColumn, ScoreCardError};
pub use scoring::{scores_for_roll, UPPER_BONUS, UPPER_BONUS_THRESHOLD};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod chance_tests;
