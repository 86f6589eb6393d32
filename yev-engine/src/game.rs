//! Thirteen-turn game loop.

use thiserror::Error;
use yev_core::{
    Category, DiceError, DiceMultiset, DiceSource, ScoreCardColumn, ScoreCardError,
    NUM_CATEGORIES,
};

use crate::engine::{DecideError, Decision};
use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("decision failed: {0}")]
    Decide(#[from] DecideError),
    #[error("bad dice: {0}")]
    Dice(#[from] DiceError),
    #[error("scorecard rejected move: {0}")]
    ScoreCard(#[from] ScoreCardError),
    #[error("scorecard column is already full")]
    ColumnFull,
}

/// One played turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    /// Zero-based turn index.
    pub turn: u8,
    /// Every complete roll seen this turn, in order.
    pub rolls: Vec<DiceMultiset>,
    /// Engine decisions (expected-value strategy only).
    pub decisions: Vec<Decision>,
    pub category: Category,
    /// The roll committed to `category`.
    pub roll: DiceMultiset,
    pub score: i32,
}

/// A finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub strategy: String,
    pub column: ScoreCardColumn,
    pub turns: Vec<TurnRecord>,
}

impl GameRecord {
    pub fn total(&self) -> i32 {
        self.column.total()
    }

    pub fn got_upper_bonus(&self) -> bool {
        self.column.upper_bonus() > 0
    }

    /// Physical rolls used across all turns.
    pub fn rolls_used(&self) -> usize {
        self.turns.iter().map(|t| t.rolls.len()).sum()
    }
}

/// Play a full game: thirteen turns, each committed to the column.
pub fn play_game(
    strategy: &dyn Strategy,
    dice: &mut dyn DiceSource,
    name: &str,
) -> Result<GameRecord, GameError> {
    let mut column = ScoreCardColumn::new(name);
    let mut turns = Vec::with_capacity(NUM_CATEGORIES);

    for _ in 0..NUM_CATEGORIES {
        let record = strategy.play_turn(&column, dice)?;
        column.assign(record.category, record.roll)?;
        turns.push(record);
    }

    Ok(GameRecord {
        strategy: strategy.name().to_string(),
        column,
        turns,
    })
}
