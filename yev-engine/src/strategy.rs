//! Turn strategies: three scorecard heuristics and the expected-value engine.

use yev_core::{
    Category, DiceError, DiceMultiset, DiceSource, ScoreCardColumn, StrategyKind, NUM_CATEGORIES,
    NUM_DICE,
};

use crate::engine::Engine;
use crate::game::{GameError, TurnRecord};
use crate::stats::CategoryTables;
use crate::turn::Turn;

/// Plays one turn against a scorecard column. The caller commits the result.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn play_turn(
        &self,
        column: &ScoreCardColumn,
        dice: &mut dyn DiceSource,
    ) -> Result<TurnRecord, GameError>;
}

/// Build the strategy for `kind`. Expected-value strategies share `engine`'s caches.
pub fn build_strategy(kind: StrategyKind, engine: &Engine) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Random => Box::new(RandomStrategy),
        StrategyKind::Greedy => Box::new(GreedyStrategy),
        StrategyKind::Rare => Box::new(RareStrategy::new()),
        StrategyKind::ExpectedValue => Box::new(ExpectedValueStrategy::new(engine.clone())),
    }
}

/// Zero-based turn index: the number of categories already filled.
fn turn_index(column: &ScoreCardColumn) -> u8 {
    (NUM_CATEGORIES - column.open_categories().len()) as u8
}

fn roll_all(dice: &mut dyn DiceSource, turn: u8, roll_idx: u8) -> Result<DiceMultiset, DiceError> {
    dice.begin_roll(turn, roll_idx);
    DiceMultiset::from_values(&dice.roll(NUM_DICE))
}

fn commit_record(turn: u8, rolls: Vec<DiceMultiset>, category: Category) -> TurnRecord {
    let roll = rolls.last().copied().unwrap_or(DiceMultiset::EMPTY);
    TurnRecord {
        turn,
        rolls,
        decisions: Vec::new(),
        category,
        roll,
        score: category.score(&roll),
    }
}

/// One roll, scored in the first open category.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "Random"
    }

    fn play_turn(
        &self,
        column: &ScoreCardColumn,
        dice: &mut dyn DiceSource,
    ) -> Result<TurnRecord, GameError> {
        let turn = turn_index(column);
        let category = column
            .open_categories()
            .iter()
            .next()
            .ok_or(GameError::ColumnFull)?;
        let roll = roll_all(dice, turn, 0)?;
        Ok(commit_record(turn, vec![roll], category))
    }
}

/// One roll, scored in the open category paying the most right now.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn name(&self) -> &str {
        "Greedy"
    }

    fn play_turn(
        &self,
        column: &ScoreCardColumn,
        dice: &mut dyn DiceSource,
    ) -> Result<TurnRecord, GameError> {
        let turn = turn_index(column);
        let roll = roll_all(dice, turn, 0)?;
        let mut best: Option<(Category, i32)> = None;
        for cat in column.open_categories().iter() {
            let s = cat.score(&roll);
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((cat, s)),
            }
        }
        let (category, _) = best.ok_or(GameError::ColumnFull)?;
        Ok(commit_record(turn, vec![roll], category))
    }
}

/// Prefers scores that are rare for their category: each open category is
/// weighted by `percentile × score` against its fresh-turn distribution.
/// A roll worth nothing anywhere is thrown again, up to three rolls.
#[derive(Debug, Clone, Copy)]
pub struct RareStrategy {
    tables: &'static CategoryTables,
}

impl RareStrategy {
    pub const MAX_ROLLS: u8 = 3;

    pub fn new() -> Self {
        Self {
            tables: CategoryTables::shared(),
        }
    }

    fn weight(&self, cat: Category, roll: &DiceMultiset) -> f64 {
        let s = cat.score(roll);
        self.tables.percentile(cat, s) * s as f64
    }
}

impl Default for RareStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RareStrategy {
    fn name(&self) -> &str {
        "Rare"
    }

    fn play_turn(
        &self,
        column: &ScoreCardColumn,
        dice: &mut dyn DiceSource,
    ) -> Result<TurnRecord, GameError> {
        let turn = turn_index(column);
        let open = column.open_categories();
        let mut rolls = Vec::new();

        for roll_idx in 0..Self::MAX_ROLLS {
            let roll = roll_all(dice, turn, roll_idx)?;
            rolls.push(roll);

            let mut best: Option<(Category, f64)> = None;
            for cat in open.iter() {
                let w = self.weight(cat, &roll);
                match best {
                    Some((_, b)) if w <= b => {}
                    _ => best = Some((cat, w)),
                }
            }
            let (category, weight) = best.ok_or(GameError::ColumnFull)?;
            if weight > 0.0 || roll_idx + 1 == Self::MAX_ROLLS {
                return Ok(commit_record(turn, rolls, category));
            }
        }
        Err(GameError::ColumnFull)
    }
}

/// Drives the engine's turn state machine.
#[derive(Debug, Clone)]
pub struct ExpectedValueStrategy {
    engine: Engine,
}

impl ExpectedValueStrategy {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Strategy for ExpectedValueStrategy {
    fn name(&self) -> &str {
        "ExpectedValue"
    }

    fn play_turn(
        &self,
        column: &ScoreCardColumn,
        dice: &mut dyn DiceSource,
    ) -> Result<TurnRecord, GameError> {
        let turn_idx = turn_index(column);
        let mut turn = Turn::new(
            turn_idx,
            column.open_categories(),
            self.engine.max_attempts(),
        )?;
        let category = turn.run(&self.engine, dice)?;
        let roll = turn.roll();
        Ok(TurnRecord {
            turn: turn_idx,
            rolls: turn.rolls().to_vec(),
            decisions: turn.decisions().to_vec(),
            category,
            roll,
            score: category.score(&roll),
        })
    }
}
