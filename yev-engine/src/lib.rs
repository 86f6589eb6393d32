//! Expected-value Yahtzee decision engine.
//!
//! This crate reasons over dice analytically: every completion of a partial
//! roll is enumerated with its multiplicity, so expected scores are exact.
//! See [`engine::Engine::decide_move`] for the commit/reroll contract and
//! [`turn::Turn`] for the bounded state machine that drives a turn.

pub mod cache;
pub mod completions;
pub mod engine;
pub mod game;
pub mod keep;
pub mod sim;
pub mod stats;
pub mod strategy;
pub mod turn;

pub use cache::{CacheStats, CategoryValues, ExpectedValueCache};
pub use completions::{enumerate_completions, CompletionCache, OutcomeDistribution};
pub use engine::{DecideError, Decision, Engine};
pub use game::{play_game, GameError, GameRecord, TurnRecord};
pub use keep::{enumerate_keep_options, keep_option_count};
pub use sim::{render_histogram, simulate, summarize_scores, ScoreSummary, SimulationResult};
pub use stats::{CategoryTables, ScoreDistribution};
pub use strategy::{
    build_strategy, ExpectedValueStrategy, GreedyStrategy, RandomStrategy, RareStrategy, Strategy,
};
pub use turn::{Attempts, Turn, TurnState};

#[cfg(test)]
mod completions_tests;
#[cfg(test)]
mod game_tests;
#[cfg(test)]
mod stats_tests;
