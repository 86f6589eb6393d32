//! Scorecard columns and the text table used to compare strategies.

use std::fmt::Write as _;

use thiserror::Error;

use crate::category::{Category, CategorySet, NUM_CATEGORIES};
use crate::dice::DiceMultiset;
use crate::scoring::{UPPER_BONUS, UPPER_BONUS_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreCardError {
    #[error("category {0} is already filled")]
    AlreadyFilled(Category),
    #[error("cannot commit incomplete roll {roll} to {category}")]
    IncompleteRoll {
        category: Category,
        roll: DiceMultiset,
    },
}

/// One player's column: the finalized roll committed to each category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCardColumn {
    pub name: String,
    lines: [Option<DiceMultiset>; NUM_CATEGORIES],
}

impl ScoreCardColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: [None; NUM_CATEGORIES],
        }
    }

    /// Commit a complete roll to an open category.
    pub fn assign(&mut self, category: Category, roll: DiceMultiset) -> Result<(), ScoreCardError> {
        if !roll.is_complete() {
            return Err(ScoreCardError::IncompleteRoll { category, roll });
        }
        let slot = &mut self.lines[category.index()];
        if slot.is_some() {
            return Err(ScoreCardError::AlreadyFilled(category));
        }
        *slot = Some(roll);
        Ok(())
    }

    pub fn roll(&self, category: Category) -> Option<DiceMultiset> {
        self.lines[category.index()]
    }

    /// Score of a filled category; `None` while still open.
    pub fn score(&self, category: Category) -> Option<i32> {
        self.roll(category).map(|r| category.score(&r))
    }

    pub fn open_categories(&self) -> CategorySet {
        Category::ALL
            .into_iter()
            .filter(|c| self.lines[c.index()].is_none())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.lines.iter().all(Option::is_some)
    }

    pub fn upper_base_score(&self) -> i32 {
        Category::UPPER
            .iter()
            .filter_map(|&c| self.score(c))
            .sum()
    }

    pub fn upper_bonus(&self) -> i32 {
        if self.upper_base_score() > UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    pub fn upper_total(&self) -> i32 {
        self.upper_base_score() + self.upper_bonus()
    }

    pub fn lower_total(&self) -> i32 {
        Category::ALL
            .iter()
            .filter(|c| !c.is_upper())
            .filter_map(|&c| self.score(c))
            .sum()
    }

    pub fn total(&self) -> i32 {
        self.upper_total() + self.lower_total()
    }
}

/// Several columns side by side.
#[derive(Debug, Clone, Default)]
pub struct ScoreCard {
    pub columns: Vec<ScoreCardColumn>,
}

const ROW_LABELS: [(&str, Category); NUM_CATEGORIES] = [
    ("Ones", Category::Ones),
    ("Twos", Category::Twos),
    ("Threes", Category::Threes),
    ("Fours", Category::Fours),
    ("Fives", Category::Fives),
    ("Sixes", Category::Sixes),
    ("3 of a Kind", Category::ThreeOfAKind),
    ("4 of a Kind", Category::FourOfAKind),
    ("Full House", Category::FullHouse),
    ("SM Straight", Category::SmallStraight),
    ("LG Straight", Category::LargeStraight),
    ("Yahtzee", Category::Yahtzee),
    ("Chance", Category::Chance),
];

impl ScoreCard {
    pub fn new(columns: Vec<ScoreCardColumn>) -> Self {
        Self { columns }
    }

    /// Render a right-aligned table. Each category cell reads
    /// `score (roll) (percentile)`, where `percentile(category, score)` is
    /// supplied by the caller (usually the fresh-turn distribution of that category).
    pub fn render(&self, percentile: impl Fn(Category, i32) -> f64) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let header = |rows: &mut Vec<Vec<String>>, name: &str| {
            let mut r = vec![name.to_string()];
            r.extend(self.columns.iter().map(|_| "--".to_string()));
            rows.push(r);
        };
        let row = |rows: &mut Vec<Vec<String>>, name: &str, f: &dyn Fn(&ScoreCardColumn) -> String| {
            let mut r = vec![name.to_string()];
            r.extend(self.columns.iter().map(f));
            rows.push(r);
        };
        let cell = |col: &ScoreCardColumn, cat: Category| match col.roll(cat) {
            Some(roll) => {
                let s = cat.score(&roll);
                format!("{} ({}) ({:.2})", s, roll, percentile(cat, s))
            }
            None => "-".to_string(),
        };

        header(&mut rows, "Score");
        header(&mut rows, "Upper Section");
        row(&mut rows, "Name", &|c: &ScoreCardColumn| c.name.clone());
        for &(label, cat) in &ROW_LABELS[..6] {
            row(&mut rows, label, &|c: &ScoreCardColumn| cell(c, cat));
        }
        row(&mut rows, "SubTotal", &|c: &ScoreCardColumn| c.upper_base_score().to_string());
        row(&mut rows, "Bonus", &|c: &ScoreCardColumn| c.upper_bonus().to_string());
        row(&mut rows, "Total Score", &|c: &ScoreCardColumn| c.upper_total().to_string());
        header(&mut rows, "Lower Section");
        for &(label, cat) in &ROW_LABELS[6..] {
            row(&mut rows, label, &|c: &ScoreCardColumn| cell(c, cat));
        }
        row(&mut rows, "SubTotal", &|c: &ScoreCardColumn| c.lower_total().to_string());
        row(&mut rows, "Total", &|c: &ScoreCardColumn| c.total().to_string());

        let ncols = self.columns.len() + 1;
        let mut widths = vec![0usize; ncols];
        for r in &rows {
            for (w, s) in widths.iter_mut().zip(r) {
                *w = (*w).max(s.chars().count());
            }
        }

        let mut out = String::new();
        for r in &rows {
            for (i, s) in r.iter().enumerate() {
                let pad = widths[i] - s.chars().count();
                let _ = write!(out, "{}{} ", " ".repeat(pad), s);
            }
            out.truncate(out.trim_end().len());
            out.push('\n');
        }
        out
    }
}
