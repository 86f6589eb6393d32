//! Turn state machine.
//!
//! A turn starts `Rolling` with the full attempt budget and the empty roll.
//! Each engine decision either commits (terminal) or names the dice to hold;
//! the held dice are topped up from a [`DiceSource`] and one attempt is spent.
//! Attempts only ever decrease, so a turn ends after at most three rolls.

use yev_core::{Category, CategorySet, DiceMultiset, DiceSource};

use crate::engine::{DecideError, Decision, Engine};

/// Physical rolls remaining in a turn, bounded to `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attempts(u8);

impl Attempts {
    pub const ZERO: Attempts = Attempts(0);
    pub const MAX: Attempts = Attempts(3);

    /// `None` if `n > 3`.
    pub fn new(n: u8) -> Option<Attempts> {
        (n <= Self::MAX.0).then_some(Attempts(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_exhausted(self) -> bool {
        self.0 == 0
    }

    /// One attempt spent; `None` when already exhausted.
    pub fn decrement(self) -> Option<Attempts> {
        self.0.checked_sub(1).map(Attempts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Rolling { attempts_remaining: Attempts },
    Committed { category: Category },
}

/// One turn driven by the engine.
#[derive(Debug, Clone)]
pub struct Turn {
    turn_idx: u8,
    open: CategorySet,
    roll: DiceMultiset,
    state: TurnState,
    rolls: Vec<DiceMultiset>,
    decisions: Vec<Decision>,
}

impl Turn {
    pub fn new(turn_idx: u8, open: CategorySet, attempts: Attempts) -> Result<Self, DecideError> {
        if open.is_empty() {
            return Err(DecideError::NoOpenCategories);
        }
        Ok(Self {
            turn_idx,
            open,
            roll: DiceMultiset::EMPTY,
            state: TurnState::Rolling {
                attempts_remaining: attempts,
            },
            rolls: Vec::new(),
            decisions: Vec::new(),
        })
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn roll(&self) -> DiceMultiset {
        self.roll
    }

    /// Every complete roll seen, in order.
    pub fn rolls(&self) -> &[DiceMultiset] {
        &self.rolls
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.state, TurnState::Committed { .. })
    }

    /// Ask the engine for a decision and apply it.
    pub fn step(
        &mut self,
        engine: &Engine,
        dice: &mut dyn DiceSource,
    ) -> Result<Decision, DecideError> {
        let attempts = match self.state {
            TurnState::Committed { .. } => return Err(DecideError::TurnFinished),
            TurnState::Rolling { attempts_remaining } => attempts_remaining,
        };

        let decision = engine.decide_move(self.roll, self.open, attempts)?;
        self.decisions.push(decision);
        match decision {
            Decision::Commit { category, .. } => {
                self.state = TurnState::Committed { category };
            }
            Decision::Reroll { keep, .. } => {
                // decide_move never rerolls with zero attempts.
                let remaining = attempts.decrement().unwrap_or(Attempts::ZERO);
                let roll_idx = self.rolls.len() as u8;
                dice.begin_roll(self.turn_idx, roll_idx);
                let fresh = DiceMultiset::from_values(&dice.roll(keep.missing()))?;
                self.roll = keep.union(&fresh)?;
                self.rolls.push(self.roll);
                self.state = TurnState::Rolling {
                    attempts_remaining: remaining,
                };
            }
        }
        Ok(decision)
    }

    /// Step until committed; returns the chosen category.
    pub fn run(
        &mut self,
        engine: &Engine,
        dice: &mut dyn DiceSource,
    ) -> Result<Category, DecideError> {
        loop {
            if let TurnState::Committed { category } = self.state {
                return Ok(category);
            }
            self.step(engine, dice)?;
        }
    }
}
