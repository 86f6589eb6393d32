//! Scoring categories and category sets.
//!
//! Index order is fixed: the six upper-section face categories first, then the
//! seven lower-section combinations. Every tie-break in the workspace resolves
//! to the lowest index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dice::DiceMultiset;
use crate::scoring;

pub const NUM_CATEGORIES: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Category {
    Ones = 0,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    SmallStraight,
    LargeStraight,
    FullHouse,
    Yahtzee,
    Chance,
}

/// Category names in index order.
pub const CATEGORY_NAMES: [&str; NUM_CATEGORIES] = [
    "ones",
    "twos",
    "threes",
    "fours",
    "fives",
    "sixes",
    "three_of_a_kind",
    "four_of_a_kind",
    "small_straight",
    "large_straight",
    "full_house",
    "yahtzee",
    "chance",
];

impl Category {
    pub const ALL: [Category; NUM_CATEGORIES] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::FullHouse,
        Category::Yahtzee,
        Category::Chance,
    ];

    pub const UPPER: [Category; 6] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Category> {
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        CATEGORY_NAMES[self.index()]
    }

    /// Upper-section categories count towards the 35-point bonus.
    pub fn is_upper(self) -> bool {
        self.index() < 6
    }

    /// Score `roll` under this category. Total and pure; partial rolls are allowed.
    pub fn score(self, roll: &DiceMultiset) -> i32 {
        scoring::score(self, roll)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Accepts the snake_case name (`"full_house"`) or the index (`"10"`).
impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase().replace('-', "_");
        if let Ok(idx) = t.parse::<usize>() {
            return Category::from_index(idx).ok_or_else(|| UnknownCategory(s.to_string()));
        }
        CATEGORY_NAMES
            .iter()
            .position(|&n| n == t)
            .and_then(Category::from_index)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Set of categories as a bitset (bit `i` = category index `i`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategorySet(u16);

impl CategorySet {
    pub const EMPTY: CategorySet = CategorySet(0);
    pub const ALL: CategorySet = CategorySet((1u16 << NUM_CATEGORIES) - 1);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn single(cat: Category) -> CategorySet {
        CategorySet(1u16 << cat.index())
    }

    pub fn contains(self, cat: Category) -> bool {
        (self.0 >> cat.index()) & 1 != 0
    }

    pub fn with(self, cat: Category) -> CategorySet {
        CategorySet(self.0 | (1u16 << cat.index()))
    }

    pub fn without(self, cat: Category) -> CategorySet {
        CategorySet(self.0 & !(1u16 << cat.index()))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ascending index order.
    pub fn iter(self) -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        iter.into_iter().fold(CategorySet::EMPTY, CategorySet::with)
    }
}

impl fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
