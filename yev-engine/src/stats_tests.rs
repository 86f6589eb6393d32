#[cfg(test)]
mod tests {
    use crate::completions::enumerate_completions;
    use crate::stats::{CategoryTables, ScoreDistribution};
    use proptest::prelude::*;
    use yev_core::{Category, DiceMultiset};

    fn fresh(cat: Category) -> ScoreDistribution {
        ScoreDistribution::for_category(&enumerate_completions(DiceMultiset::EMPTY), cat)
    }

    #[test]
    fn chance_mean_is_17_5() {
        let d = fresh(Category::Chance);
        assert!((d.mean() - 17.5).abs() < 1e-12, "mean={}", d.mean());
        assert_eq!(d.min(), Some(5));
        assert_eq!(d.max(), Some(30));
        assert_eq!(d.total_weight(), 7776);
        // Symmetric around 17.5, so exactly half the weight sits at or below 17.
        assert_eq!(d.percentile(17), 0.5);
        assert_eq!(d.median(), Some(17));
    }

    #[test]
    fn observed_scores_merge_duplicates() {
        let d = ScoreDistribution::from_scores([210, 180, 210, 250]);
        assert_eq!(d.entries(), &[(180, 1), (210, 2), (250, 1)]);
        assert_eq!(d.total_weight(), 4);
        assert_eq!(d.mean(), 212.5);
        assert_eq!(d.median(), Some(210));
        assert!((d.std_dev() - 618.75f64.sqrt()).abs() < 1e-9);
        assert_eq!(ScoreDistribution::from_scores(std::iter::empty()).std_dev(), 0.0);
    }

    #[test]
    fn ones_mean_is_five_sixths() {
        let d = fresh(Category::Ones);
        assert!((d.mean() - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn yahtzee_distribution_has_two_scores() {
        let d = fresh(Category::Yahtzee);
        assert_eq!(d.entries(), &[(0, 7770), (50, 6)]);
        assert_eq!(d.median(), Some(0));
        assert_eq!(d.percentile(0), 7770.0 / 7776.0);
        assert_eq!(d.percentile(49), 7770.0 / 7776.0);
        assert_eq!(d.percentile(50), 1.0);
    }

    #[test]
    fn percentile_bounds() {
        let d = fresh(Category::FullHouse);
        assert_eq!(d.percentile(-1), 0.0);
        assert_eq!(d.percentile(25), 1.0);
        assert_eq!(d.percentile(1000), 1.0);
    }

    #[test]
    fn equal_scores_are_merged() {
        let d = ScoreDistribution::build(&enumerate_completions("1111".parse().unwrap()), |r| {
            r.pip_sum()
        });
        let scores: Vec<i32> = d.entries().iter().map(|&(s, _)| s).collect();
        assert_eq!(scores, vec![5, 6, 7, 8, 9, 10]);

        let constant = ScoreDistribution::build(&enumerate_completions(DiceMultiset::EMPTY), |_| 7);
        assert_eq!(constant.entries(), &[(7, 7776)]);
        assert_eq!(constant.mean(), 7.0);
    }

    #[test]
    fn empty_distribution() {
        let d = ScoreDistribution::default();
        assert!(d.is_empty());
        assert_eq!(d.mean(), 0.0);
        assert_eq!(d.percentile(-100), 1.0);
        assert_eq!(d.median(), None);
        assert_eq!(d.min(), None);
    }

    #[test]
    fn category_tables_match_fresh_distributions() {
        let t = CategoryTables::shared();
        assert_eq!(t.get(Category::Chance), &fresh(Category::Chance));
        assert_eq!(t.percentile(Category::Yahtzee, 50), 1.0);
        let means = t.means();
        assert!((means[Category::Chance.index()] - 17.5).abs() < 1e-12);
        assert!((means[Category::Sixes.index()] - 5.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn percentile_is_monotone(cat_idx in 0usize..13, a in -5i32..60, b in -5i32..60) {
            let cat = Category::from_index(cat_idx).unwrap();
            let d = CategoryTables::shared().get(cat);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(d.percentile(lo) <= d.percentile(hi));
            prop_assert_eq!(d.percentile(d.max().unwrap()), 1.0);
        }
    }
}
