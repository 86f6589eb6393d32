#[cfg(test)]
mod tests {
    use crate::engine::Engine;
    use crate::game::{play_game, GameError};
    use crate::sim::{render_histogram, simulate, summarize_scores};
    use crate::strategy::{
        build_strategy, ExpectedValueStrategy, GreedyStrategy, RandomStrategy, RareStrategy,
        Strategy,
    };
    use yev_core::{Category, RngDice, ScoreCardColumn, ScriptedDice, StrategyKind};

    #[test]
    fn random_fills_categories_in_order() {
        let mut dice = RngDice::new(1);
        let g = play_game(&RandomStrategy, &mut dice, "Random").unwrap();
        assert!(g.column.is_full());
        let cats: Vec<Category> = g.turns.iter().map(|t| t.category).collect();
        assert_eq!(cats, Category::ALL.to_vec());
        assert_eq!(g.rolls_used(), 13);
    }

    #[test]
    fn greedy_takes_the_best_raw_score() {
        let mut column = ScoreCardColumn::new("g");
        let mut dice = ScriptedDice::new([5, 5, 5, 5, 5]);
        let t = GreedyStrategy.play_turn(&column, &mut dice).unwrap();
        assert_eq!(t.category, Category::Yahtzee);
        assert_eq!(t.score, 50);

        column.assign(Category::Yahtzee, t.roll).unwrap();
        let mut dice = ScriptedDice::new([5, 5, 5, 5, 5]);
        let t = GreedyStrategy.play_turn(&column, &mut dice).unwrap();
        // Fives, 3/4 of a kind and chance all pay 25; Fives has the lowest index.
        assert_eq!(t.category, Category::Fives);
    }

    #[test]
    fn rare_rerolls_worthless_dice() {
        let mut column = ScoreCardColumn::new("r");
        for cat in Category::ALL {
            if cat != Category::Yahtzee {
                column.assign(cat, "12345".parse().unwrap()).unwrap();
            }
        }
        let mut dice = ScriptedDice::new([1, 2, 3, 4, 6, 1, 1, 2, 2, 3, 6, 6, 6, 6, 6]);
        let t = RareStrategy::new().play_turn(&column, &mut dice).unwrap();
        assert_eq!(t.rolls.len(), 3);
        assert_eq!(t.category, Category::Yahtzee);
        assert_eq!(t.score, 50);
    }

    #[test]
    fn rare_stops_after_three_rolls() {
        let mut column = ScoreCardColumn::new("r");
        for cat in Category::ALL {
            if cat != Category::Yahtzee {
                column.assign(cat, "12345".parse().unwrap()).unwrap();
            }
        }
        let mut dice = ScriptedDice::new([1, 2, 3, 4, 6, 1, 2, 3, 4, 6, 1, 2, 3, 4, 6, 6, 6]);
        let t = RareStrategy::new().play_turn(&column, &mut dice).unwrap();
        assert_eq!(t.rolls.len(), 3);
        assert_eq!(t.score, 0);
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn full_column_is_an_error() {
        let mut column = ScoreCardColumn::new("x");
        for cat in Category::ALL {
            column.assign(cat, "12345".parse().unwrap()).unwrap();
        }
        let mut dice = RngDice::new(0);
        assert_eq!(
            RandomStrategy.play_turn(&column, &mut dice).unwrap_err(),
            GameError::ColumnFull
        );
    }

    #[test]
    fn expected_value_game_is_reproducible() {
        let strategy = ExpectedValueStrategy::new(Engine::new());
        let a = play_game(&strategy, &mut RngDice::new(42), "EV").unwrap();
        let b = play_game(&strategy, &mut RngDice::new(42), "EV").unwrap();
        assert!(a.column.is_full());
        assert_eq!(a.total(), b.total());
        assert_eq!(a.turns, b.turns);
        for t in &a.turns {
            assert!(!t.rolls.is_empty() && t.rolls.len() <= 3);
            assert_eq!(t.score, t.category.score(&t.roll));
            assert!(t.decisions.last().unwrap().is_commit());
        }
    }

    #[test]
    fn build_strategy_names() {
        let engine = Engine::new();
        let names: Vec<String> = StrategyKind::ALL
            .iter()
            .map(|&k| build_strategy(k, &engine).name().to_string())
            .collect();
        assert_eq!(names, vec!["Random", "Greedy", "Rare", "ExpectedValue"]);
    }

    #[test]
    fn simulation_is_seeded_per_game() {
        let sim = simulate(&GreedyStrategy, 12, 7).unwrap();
        assert_eq!(sim.games.len(), 12);
        for (i, g) in sim.games.iter().enumerate() {
            let solo = play_game(&GreedyStrategy, &mut RngDice::new(7 + i as u64), "Greedy").unwrap();
            assert_eq!(g.total(), solo.total(), "game {i}");
        }
        assert_eq!(sim.scores(), simulate(&GreedyStrategy, 12, 7).unwrap().scores());
    }

    #[test]
    fn expected_value_beats_random() {
        let ev = simulate(&ExpectedValueStrategy::new(Engine::new()), 10, 3).unwrap();
        let random = simulate(&RandomStrategy, 10, 3).unwrap();
        assert!(
            ev.summary().mean > random.summary().mean,
            "ev={} random={}",
            ev.summary().mean,
            random.summary().mean
        );
        assert!((0.0..=1.0).contains(&ev.upper_bonus_rate()));
        let best = ev.best_game().unwrap();
        assert_eq!(best.total(), ev.summary().max);
        assert_eq!(ev.distribution().total_weight(), 10);
        assert_eq!(ev.summary(), summarize_scores(&ev.scores()));
    }

    #[test]
    fn summarize_small_sample() {
        let s = summarize_scores(&[4, 1, 3, 2]);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2);
        assert_eq!(s.min, 1);
        assert_eq!(s.max, 4);
        assert!((s.std_dev - 1.25f64.sqrt()).abs() < 1e-12);

        let empty = summarize_scores(&[]);
        assert_eq!(empty.mean, 0.0);
        assert_eq!(empty.max, 0);
    }

    #[test]
    fn histogram_lists_every_bucket() {
        let h = render_histogram(&[95, 101, 127]);
        assert!(h.contains("N=3"));
        assert!(h.contains(" 90- 99"));
        assert!(h.contains("100-109"));
        assert!(h.contains("110-119"));
        assert!(h.contains("120-129"));
        assert!(!h.contains("130-139"));
        assert!(h.contains("median=101"));

        assert!(render_histogram(&[]).contains("N=0"));
    }
}
