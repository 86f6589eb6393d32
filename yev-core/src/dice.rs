//! Canonical dice representation: an unordered multiset of up to five dice.
//!
//! A roll is stored as six face counts. Physical order is discarded at
//! construction, so two rolls compare equal (and hash equally) iff their count
//! vectors match. Faces are addressed by zero-based index (`0` = one pip,
//! `5` = six pips); pip values `1..=6` only appear at the parsing/printing edges.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Dice per complete roll.
pub const NUM_DICE: usize = 5;
/// Faces per die.
pub const NUM_FACES: usize = 6;

/// Errors raised when an operation would break the multiset invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("invalid face {face}: {reason}")]
    InvalidFace { face: u8, reason: &'static str },
    #[error("cannot remove face {face}: no die shows it")]
    InvalidRemoval { face: u8 },
}

/// Up to five dice as face counts (`counts[f]` = dice showing face index `f`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DiceMultiset {
    counts: [u8; NUM_FACES],
}

impl DiceMultiset {
    /// The roll with no dice fixed.
    pub const EMPTY: DiceMultiset = DiceMultiset {
        counts: [0; NUM_FACES],
    };

    /// Build from face counts; the counts must sum to at most five.
    pub fn from_counts(counts: [u8; NUM_FACES]) -> Result<Self, DiceError> {
        let total: u32 = counts.iter().map(|&c| c as u32).sum();
        if total as usize > NUM_DICE {
            return Err(DiceError::InvalidFace {
                face: counts.iter().rposition(|&c| c > 0).unwrap_or(0) as u8,
                reason: "more than five dice",
            });
        }
        Ok(Self { counts })
    }

    /// Build from pip values (`1..=6`), in any order.
    pub fn from_values(values: &[u8]) -> Result<Self, DiceError> {
        values.iter().try_fold(Self::EMPTY, |acc, &v| {
            if !(1..=NUM_FACES as u8).contains(&v) {
                return Err(DiceError::InvalidFace {
                    face: v,
                    reason: "pip value outside 1..=6",
                });
            }
            acc.with_one_more(v - 1)
        })
    }

    /// Number of dice in the multiset.
    pub fn len(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts == [0; NUM_FACES]
    }

    pub fn is_complete(&self) -> bool {
        self.len() == NUM_DICE
    }

    /// Dice still missing from a complete roll.
    pub fn missing(&self) -> usize {
        NUM_DICE - self.len()
    }

    /// Dice showing zero-based face index `face`.
    ///
    /// # Panics
    /// Panics if `face >= 6`.
    pub fn count(&self, face: usize) -> u8 {
        self.counts[face]
    }

    pub fn counts(&self) -> [u8; NUM_FACES] {
        self.counts
    }

    /// Sum of pips over all dice.
    pub fn pip_sum(&self) -> i32 {
        self.counts
            .iter()
            .enumerate()
            .map(|(f, &c)| c as i32 * (f as i32 + 1))
            .sum()
    }

    /// Pip values in ascending order.
    pub fn values(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for (f, &c) in self.counts.iter().enumerate() {
            out.extend(std::iter::repeat(f as u8 + 1).take(c as usize));
        }
        out
    }

    /// A copy with one more die showing `face`.
    pub fn with_one_more(&self, face: u8) -> Result<Self, DiceError> {
        if face as usize >= NUM_FACES {
            return Err(DiceError::InvalidFace {
                face,
                reason: "face index outside 0..=5",
            });
        }
        if self.is_complete() {
            return Err(DiceError::InvalidFace {
                face,
                reason: "roll already holds five dice",
            });
        }
        let mut counts = self.counts;
        counts[face as usize] += 1;
        Ok(Self { counts })
    }

    /// A copy with one die showing `face` taken away.
    pub fn with_one_removed(&self, face: u8) -> Result<Self, DiceError> {
        if face as usize >= NUM_FACES {
            return Err(DiceError::InvalidFace {
                face,
                reason: "face index outside 0..=5",
            });
        }
        if self.counts[face as usize] == 0 {
            return Err(DiceError::InvalidRemoval { face });
        }
        let mut counts = self.counts;
        counts[face as usize] -= 1;
        Ok(Self { counts })
    }

    /// Merge two multisets, e.g. kept dice plus freshly rolled ones.
    pub fn union(&self, other: &DiceMultiset) -> Result<Self, DiceError> {
        let mut counts = self.counts;
        for (c, o) in counts.iter_mut().zip(other.counts) {
            *c += o;
        }
        Self::from_counts(counts)
    }

    /// Faces with at least one die, ascending.
    pub fn present_faces(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(f, _)| f as u8)
    }
}

const GLYPHS: [&str; NUM_FACES] = ["⚀", "⚁", "⚂", "⚃", "⚄", "⚅"];

impl fmt::Display for DiceMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("empty");
        }
        for (face, &c) in self.counts.iter().enumerate() {
            for _ in 0..c {
                f.write_str(GLYPHS[face])?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DiceMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits: String = self.values().iter().map(|v| (b'0' + v) as char).collect();
        write!(f, "DiceMultiset({digits})")
    }
}

/// Parses the digit form, e.g. `"11166"`; `""` and `"-"` are the empty roll.
impl FromStr for DiceMultiset {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-" {
            return Ok(Self::EMPTY);
        }
        let mut values = Vec::with_capacity(s.len());
        for ch in s.chars().filter(|c| !matches!(c, ',' | ' ')) {
            let v = ch.to_digit(10).ok_or(DiceError::InvalidFace {
                face: 0,
                reason: "expected digits 1..=6",
            })?;
            values.push(v as u8);
        }
        Self::from_values(&values)
    }
}
