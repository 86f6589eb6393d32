//! Keep-option enumeration.
//!
//! A keep option is any sub-multiset of a roll: the dice held back before the
//! next physical reroll. The search walks "remove one die of a present face"
//! edges depth-first with an explicit stack and a visited set, so each distinct
//! sub-multiset is emitted exactly once.

use rustc_hash::FxHashSet;
use yev_core::DiceMultiset;

/// Every distinct sub-multiset of `roll`, including `roll` itself and the empty
/// multiset.
///
/// Order is depth-first discovery order with `roll` first, so callers that scan
/// for a maximum and keep the first on ties prefer holding everything.
/// The result has exactly `Π (count_f + 1)` entries.
pub fn enumerate_keep_options(roll: DiceMultiset) -> Vec<DiceMultiset> {
    let mut visited: FxHashSet<DiceMultiset> = FxHashSet::default();
    let mut out = Vec::with_capacity(keep_option_count(&roll));
    let mut stack = vec![roll];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        out.push(current);
        // Push in reverse so the lowest face is explored first.
        let faces: Vec<u8> = current.present_faces().collect();
        for &face in faces.iter().rev() {
            if let Ok(next) = current.with_one_removed(face) {
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }
    }
    out
}

/// Number of distinct keep options of `roll`.
pub fn keep_option_count(roll: &DiceMultiset) -> usize {
    roll.counts().iter().map(|&c| c as usize + 1).product()
}
