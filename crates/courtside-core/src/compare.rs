// Category-by-category comparison of two team snapshots.

use crate::category::{Category, Direction};
use crate::stats::TeamStats;
use serde::Serialize;

/// A category is competitive when the two values are within this many
/// percent of the larger one (inclusive).
pub const COMPETITIVE_THRESHOLD_PCT: f64 = 15.0;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Which side took a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    A,
    B,
    Tie,
    /// At least one side has no value for the category.
    Unavailable,
}

impl Winner {
    /// The same result seen from the other side.
    pub fn flipped(self) -> Self {
        match self {
            Winner::A => Winner::B,
            Winner::B => Winner::A,
            other => other,
        }
    }
}

/// Outcome of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub category: Category,
    pub value_a: Option<f64>,
    pub value_b: Option<f64>,
    pub winner: Winner,
    /// `|a - b| / max(a, b) * 100`; `None` when the category is unavailable.
    pub percent_difference: Option<f64>,
    pub competitive: bool,
}

/// Who is ahead on categories won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leader {
    A,
    B,
    Even,
}

/// All nine category results for one pairing, plus the win tallies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupOutcome {
    pub wins_a: u32,
    pub wins_b: u32,
    pub ties: u32,
    pub categories: Vec<ComparisonResult>,
}

impl MatchupOutcome {
    pub fn leader(&self) -> Leader {
        match self.wins_a.cmp(&self.wins_b) {
            std::cmp::Ordering::Greater => Leader::A,
            std::cmp::Ordering::Less => Leader::B,
            std::cmp::Ordering::Equal => Leader::Even,
        }
    }

    /// `wins_a - wins_b`.
    pub fn margin(&self) -> i32 {
        self.wins_a as i32 - self.wins_b as i32
    }

    pub fn result(&self, category: Category) -> Option<&ComparisonResult> {
        self.categories.iter().find(|r| r.category == category)
    }

    pub fn competitive_categories(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.categories.iter().filter(|r| r.competitive)
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Percent difference relative to the larger value; 0 when the larger value
/// is not positive.
pub fn percent_difference(a: f64, b: f64) -> f64 {
    let higher = a.max(b);
    if higher > 0.0 {
        ((a - b) / higher).abs() * 100.0
    } else {
        0.0
    }
}

pub fn is_competitive(percent_difference: f64) -> bool {
    percent_difference <= COMPETITIVE_THRESHOLD_PCT
}

/// Compare one category's values under its direction.
pub fn compare_category(category: Category, value_a: Option<f64>, value_b: Option<f64>) -> ComparisonResult {
    let (Some(a), Some(b)) = (value_a, value_b) else {
        return ComparisonResult {
            category,
            value_a,
            value_b,
            winner: Winner::Unavailable,
            percent_difference: None,
            competitive: false,
        };
    };

    let winner = if a == b {
        Winner::Tie
    } else {
        let a_better = match category.direction() {
            Direction::HigherBetter => a > b,
            Direction::LowerBetter => a < b,
        };
        if a_better { Winner::A } else { Winner::B }
    };

    let pct = percent_difference(a, b);
    ComparisonResult {
        category,
        value_a,
        value_b,
        winner,
        percent_difference: Some(pct),
        competitive: is_competitive(pct),
    }
}

/// Compare two snapshots across all nine categories, in display order.
pub fn compare(a: &TeamStats, b: &TeamStats) -> MatchupOutcome {
    let mut outcome = MatchupOutcome {
        wins_a: 0,
        wins_b: 0,
        ties: 0,
        categories: Vec::with_capacity(Category::ALL.len()),
    };

    for category in Category::ALL {
        let result = compare_category(category, a.get(category), b.get(category));
        match result.winner {
            Winner::A => outcome.wins_a += 1,
            Winner::B => outcome.wins_b += 1,
            Winner::Tie => outcome.ties += 1,
            Winner::Unavailable => {}
        }
        outcome.categories.push(result);
    }

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
