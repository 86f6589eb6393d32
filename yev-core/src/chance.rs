//! Physical dice sources for the turn loop.
//!
//! The engine never rolls dice itself; it reasons over every outcome
//! analytically. Actual play asks a [`DiceSource`] for `count` pip values.
//!
//! Two reproducible sources are provided:
//! - [`RngDice`]: a seeded `ChaCha8Rng` stream.
//! - [`EventKeyedDice`]: dice defined by (seed, turn, roll) rather than by
//!   evolving RNG state, so two strategies facing the same seed see the same
//!   fresh five dice at every (turn, roll) event.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use crate::dice::NUM_DICE;

/// Source of physical dice: returns `count` pip values in `1..=6`.
pub trait DiceSource {
    fn roll(&mut self, count: usize) -> Vec<u8>;

    /// Called by the turn loop when a new physical roll event starts.
    fn begin_roll(&mut self, _turn: u8, _roll_idx: u8) {}
}

/// Pseudorandom dice backed by ChaCha8.
pub struct RngDice {
    rng: ChaCha8Rng,
}

impl RngDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DiceSource for RngDice {
    fn roll(&mut self, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.rng.gen_range(1..=6)).collect()
    }
}

/// Structural event key for deterministic dice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub seed: u64,
    pub turn: u8,
    pub roll_idx: u8,
}

/// SplitMix64 step.
fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mix_seed(key: EventKey) -> u64 {
    // Fixed mixing; std Hash/RandomState would not be stable across runs.
    let mut x = key.seed;
    x ^= (key.turn as u64).wrapping_mul(0xA5A35625E4F7C1AD);
    x ^= (key.roll_idx as u64).wrapping_mul(0x9E3779B97F4A7C15);
    let mut s = x;
    splitmix64_next(&mut s)
}

/// Deterministically generate five dice for an event.
pub fn roll5(key: EventKey) -> [u8; NUM_DICE] {
    let mut state = mix_seed(key);
    let mut out = [0u8; NUM_DICE];
    for o in &mut out {
        let r = splitmix64_next(&mut state);
        *o = ((r % 6) + 1) as u8;
    }
    out
}

/// Event-keyed dice: rolling k dice takes the first k values of `roll5(key)`.
pub struct EventKeyedDice {
    key: EventKey,
}

impl EventKeyedDice {
    pub fn new(seed: u64) -> Self {
        Self {
            key: EventKey {
                seed,
                turn: 0,
                roll_idx: 0,
            },
        }
    }
}

impl DiceSource for EventKeyedDice {
    fn begin_roll(&mut self, turn: u8, roll_idx: u8) {
        self.key.turn = turn;
        self.key.roll_idx = roll_idx;
    }

    fn roll(&mut self, count: usize) -> Vec<u8> {
        assert!(count <= NUM_DICE, "cannot roll {} dice", count);
        roll5(self.key)[..count].to_vec()
    }
}

/// Fixed queue of pip values, consumed front to back. Used for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    queue: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u8>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for ScriptedDice {
    /// # Panics
    /// Panics if the script runs out of dice.
    fn roll(&mut self, count: usize) -> Vec<u8> {
        assert!(
            self.queue.len() >= count,
            "scripted dice exhausted: wanted {}, have {}",
            count,
            self.queue.len()
        );
        self.queue.drain(..count).collect()
    }
}
