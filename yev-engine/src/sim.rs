//! Parallel game simulation, score summaries and a text histogram.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rayon::prelude::*;
use yev_core::RngDice;

use crate::game::{play_game, GameError, GameRecord};
use crate::stats::ScoreDistribution;
use crate::strategy::Strategy;

pub struct SimulationResult {
    pub strategy: String,
    pub seed: u64,
    /// Finished games, in game-index order.
    pub games: Vec<GameRecord>,
}

impl SimulationResult {
    pub fn scores(&self) -> Vec<i32> {
        self.games.iter().map(GameRecord::total).collect()
    }

    pub fn upper_totals(&self) -> Vec<i32> {
        self.games.iter().map(|g| g.column.upper_total()).collect()
    }

    pub fn bonus_count(&self) -> usize {
        self.games.iter().filter(|g| g.got_upper_bonus()).count()
    }

    /// Fraction of games that earned the upper-section bonus.
    pub fn upper_bonus_rate(&self) -> f64 {
        if self.games.is_empty() {
            0.0
        } else {
            self.bonus_count() as f64 / self.games.len() as f64
        }
    }

    /// Distribution of final totals, one unit of weight per game.
    pub fn distribution(&self) -> ScoreDistribution {
        ScoreDistribution::from_scores(self.games.iter().map(GameRecord::total))
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::from_distribution(&self.distribution())
    }

    /// Highest-scoring game (earliest on ties).
    pub fn best_game(&self) -> Option<&GameRecord> {
        self.games
            .iter()
            .rev()
            .max_by_key(|g| g.total())
    }
}

/// Summary statistics of a set of game totals. The median is the lower one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub mean: f64,
    pub median: i32,
    pub std_dev: f64,
    pub min: i32,
    pub max: i32,
}

impl ScoreSummary {
    /// Summary of `dist`; all zeros when it is empty.
    pub fn from_distribution(dist: &ScoreDistribution) -> Self {
        Self {
            mean: dist.mean(),
            median: dist.median().unwrap_or(0),
            std_dev: dist.std_dev(),
            min: dist.min().unwrap_or(0),
            max: dist.max().unwrap_or(0),
        }
    }
}

pub fn summarize_scores(scores: &[i32]) -> ScoreSummary {
    ScoreSummary::from_distribution(&ScoreDistribution::from_scores(scores.iter().copied()))
}

/// Play `games` games in parallel; game `i` rolls from `RngDice::new(seed + i)`.
///
/// Results are independent of thread count and come back in game order.
pub fn simulate(
    strategy: &dyn Strategy,
    games: u32,
    seed: u64,
) -> Result<SimulationResult, GameError> {
    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| {
            let mut dice = RngDice::new(seed.wrapping_add(i as u64));
            play_game(strategy, &mut dice, strategy.name())
        })
        .collect::<Result<_, _>>()?;

    Ok(SimulationResult {
        strategy: strategy.name().to_string(),
        seed,
        games: records,
    })
}

const BUCKET_SIZE: i32 = 10;
const BAR_WIDTH: usize = 50;

/// Text histogram of scores in 10-point buckets, followed by a summary line.
pub fn render_histogram(scores: &[i32]) -> String {
    let mut out = String::new();
    let (Some(&min_score), Some(&max_score)) = (scores.iter().min(), scores.iter().max()) else {
        out.push_str("Score histogram (N=0): no games\n");
        return out;
    };

    let min_bucket = min_score.div_euclid(BUCKET_SIZE) * BUCKET_SIZE;
    let max_bucket = max_score.div_euclid(BUCKET_SIZE) * BUCKET_SIZE;

    let mut buckets: BTreeMap<i32, usize> = BTreeMap::new();
    for &score in scores {
        *buckets
            .entry(score.div_euclid(BUCKET_SIZE) * BUCKET_SIZE)
            .or_insert(0) += 1;
    }
    let max_count = buckets.values().copied().max().unwrap_or(1).max(1);

    let _ = writeln!(out, "Score histogram (N={}, bin={}):", scores.len(), BUCKET_SIZE);
    let _ = writeln!(out, "{}", "─".repeat(70));

    let mut bucket = min_bucket;
    while bucket <= max_bucket {
        let count = buckets.get(&bucket).copied().unwrap_or(0);
        let bar = "█".repeat(count * BAR_WIDTH / max_count);
        let _ = writeln!(
            out,
            "{:3}-{:3} │{:<50} {:4} ({:.1}%)",
            bucket,
            bucket + BUCKET_SIZE - 1,
            bar,
            count,
            count as f64 / scores.len() as f64 * 100.0
        );
        bucket += BUCKET_SIZE;
    }

    let _ = writeln!(out, "{}", "─".repeat(70));
    let s = summarize_scores(scores);
    let _ = writeln!(
        out,
        "Summary: mean={:.2}, median={}, std={:.2}, min={}, max={}",
        s.mean, s.median, s.std_dev, s.min, s.max
    );
    out
}
