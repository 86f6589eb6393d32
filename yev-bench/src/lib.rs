//! Shared fixtures for the criterion benches.

use yev_core::DiceMultiset;

/// Deterministic complete rolls, no rand dependency.
pub fn gen_rolls(n: usize) -> Vec<DiceMultiset> {
    let mut x: u64 = 0x1234_5678_9ABC_DEF0;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let mut d = [0u8; 5];
        for v in d.iter_mut() {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            *v = (x % 6) as u8 + 1;
        }
        if let Ok(r) = DiceMultiset::from_values(&d) {
            out.push(r);
        }
    }
    out
}

/// Every complete roll (252 multisets).
pub fn all_rolls() -> Vec<DiceMultiset> {
    yev_engine::enumerate_completions(DiceMultiset::EMPTY)
        .iter()
        .map(|(r, _)| r)
        .collect()
}
