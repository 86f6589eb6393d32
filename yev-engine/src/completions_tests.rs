#[cfg(test)]
mod tests {
    use crate::completions::{enumerate_completions, CompletionCache};
    use proptest::prelude::*;
    use std::sync::Arc;
    use yev_core::DiceMultiset;

    fn roll(s: &str) -> DiceMultiset {
        s.parse().unwrap()
    }

    #[test]
    fn fresh_roll_covers_all_252_hands() {
        let d = enumerate_completions(DiceMultiset::EMPTY);
        assert_eq!(d.total_weight(), 7776);
        assert_eq!(d.len(), 252);
        assert_eq!(d.dice_rolled(), 5);
        assert_eq!(d.weight(&roll("11111")), 1);
        assert_eq!(d.weight(&roll("12345")), 120);
        assert_eq!(d.weight(&roll("11222")), 10);
    }

    #[test]
    fn complete_roll_is_its_own_outcome() {
        let r = roll("12346");
        let d = enumerate_completions(r);
        assert_eq!(d.total_weight(), 1);
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![(r, 1)]);
        assert_eq!(d.probability(&r), 1.0);
    }

    #[test]
    fn one_missing_die_gives_six_outcomes() {
        let d = enumerate_completions(roll("1111"));
        assert_eq!(d.total_weight(), 6);
        assert_eq!(d.len(), 6);
        assert!(d.iter().all(|(_, w)| w == 1));
        assert_eq!(d.weight(&roll("11111")), 1);
        assert_eq!(d.weight(&roll("22222")), 0);
    }

    #[test]
    fn three_missing_dice() {
        let d = enumerate_completions(roll("11"));
        assert_eq!(d.total_weight(), 216);
        // Multisets of three dice over six faces: C(8, 3).
        assert_eq!(d.len(), 56);
    }

    #[test]
    fn outcomes_are_sorted() {
        let d = enumerate_completions(roll("3"));
        let rolls: Vec<_> = d.iter().map(|(r, _)| r).collect();
        let mut sorted = rolls.clone();
        sorted.sort();
        assert_eq!(rolls, sorted);
    }

    #[test]
    fn cache_computes_each_key_once() {
        let cache = CompletionCache::new();
        assert!(cache.is_empty());
        let a = cache.get(roll("66"));
        let b = cache.get(roll("66"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().hit_rate(), 0.5);
    }

    proptest! {
        #[test]
        fn weights_sum_to_six_pow_missing(values in prop::collection::vec(1u8..=6, 0..=5)) {
            let p = DiceMultiset::from_values(&values).unwrap();
            let d = enumerate_completions(p);
            let expected = 6u64.pow(p.missing() as u32);
            prop_assert_eq!(d.total_weight(), expected);
            prop_assert_eq!(d.iter().map(|(_, w)| w as u64).sum::<u64>(), expected);
        }

        #[test]
        fn outcomes_extend_the_partial_roll(values in prop::collection::vec(1u8..=6, 0..=5)) {
            let p = DiceMultiset::from_values(&values).unwrap();
            for (r, _) in enumerate_completions(p).iter() {
                prop_assert!(r.is_complete());
                for f in 0..6 {
                    prop_assert!(r.count(f) >= p.count(f));
                }
            }
        }
    }
}
