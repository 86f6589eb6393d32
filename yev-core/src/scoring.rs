//! Category scoring rules.
//!
//! All scorers are total over any multiset of up to five dice, so the engine can
//! ask "what would this keep score" without completing the roll first.

use crate::category::{Category, NUM_CATEGORIES};
use crate::dice::{DiceMultiset, NUM_FACES};

/// Upper-section base score must exceed this for the bonus.
pub const UPPER_BONUS_THRESHOLD: i32 = 63;
pub const UPPER_BONUS: i32 = 35;

pub const SMALL_STRAIGHT_SCORE: i32 = 30;
pub const LARGE_STRAIGHT_SCORE: i32 = 40;
pub const FULL_HOUSE_SCORE: i32 = 25;
pub const YAHTZEE_SCORE: i32 = 50;

/// Score `roll` under `cat`.
pub fn score(cat: Category, roll: &DiceMultiset) -> i32 {
    let counts = roll.counts();
    match cat {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = cat.index();
            counts[face] as i32 * (face as i32 + 1)
        }
        Category::ThreeOfAKind => n_of_a_kind(roll, 3),
        Category::FourOfAKind => n_of_a_kind(roll, 4),
        Category::SmallStraight => {
            if longest_run(&counts) >= 4 {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if longest_run(&counts) >= 5 {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::FullHouse => {
            let has3 = counts.iter().any(|&c| c == 3);
            let has2 = counts.iter().any(|&c| c == 2);
            if has3 && has2 {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::Yahtzee => {
            if counts.iter().any(|&c| c == 5) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        Category::Chance => roll.pip_sum(),
    }
}

/// All thirteen category scores for `roll`, in index order.
pub fn scores_for_roll(roll: &DiceMultiset) -> [i32; NUM_CATEGORIES] {
    let mut s = [0i32; NUM_CATEGORIES];
    for cat in Category::ALL {
        s[cat.index()] = score(cat, roll);
    }
    s
}

fn n_of_a_kind(roll: &DiceMultiset, n: u8) -> i32 {
    if roll.counts().iter().any(|&c| c >= n) {
        roll.pip_sum()
    } else {
        0
    }
}

/// Longest stretch of consecutive faces that each show at least one die.
fn longest_run(counts: &[u8; NUM_FACES]) -> usize {
    let mut best = 0;
    let mut run = 0;
    for &c in counts {
        if c == 0 {
            run = 0;
        } else {
            run += 1;
            best = best.max(run);
        }
    }
    best
}
