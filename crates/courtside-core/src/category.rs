// Scoring category table: the nine head-to-head categories, their comparison
// direction, and the upstream stat-id lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// One of the nine scored head-to-head categories.
///
/// Declaration order is display order, so a `BTreeMap<Category, _>` iterates
/// (and serializes) in the same order as the scoreboard columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FgPct,
    FtPct,
    ThreePm,
    Pts,
    Reb,
    Ast,
    Stl,
    Blk,
    To,
}

/// Whether a larger or smaller value wins a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

/// Static configuration for a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub key: &'static str,
    pub display_name: &'static str,
    pub direction: Direction,
}

/// The fixed rule table, in display order.
pub static CATEGORY_RULES: [CategoryRule; 9] = [
    CategoryRule {
        category: Category::FgPct,
        key: "fg_pct",
        display_name: "FG%",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::FtPct,
        key: "ft_pct",
        display_name: "FT%",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::ThreePm,
        key: "three_pm",
        display_name: "3PTM",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::Pts,
        key: "pts",
        display_name: "PTS",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::Reb,
        key: "reb",
        display_name: "REB",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::Ast,
        key: "ast",
        display_name: "AST",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::Stl,
        key: "stl",
        display_name: "ST",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::Blk,
        key: "blk",
        display_name: "BLK",
        direction: Direction::HigherBetter,
    },
    CategoryRule {
        category: Category::To,
        key: "to",
        display_name: "TO",
        direction: Direction::LowerBetter,
    },
];

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 9] = [
        Category::FgPct,
        Category::FtPct,
        Category::ThreePm,
        Category::Pts,
        Category::Reb,
        Category::Ast,
        Category::Stl,
        Category::Blk,
        Category::To,
    ];

    /// Map an upstream stat id to a scored category. Unknown ids (including
    /// the display-only made/attempted splits) return `None`.
    pub fn from_stat_id(stat_id: &str) -> Option<Self> {
        match stat_id.trim() {
            "5" => Some(Category::FgPct),
            "8" => Some(Category::FtPct),
            "10" => Some(Category::ThreePm),
            "12" => Some(Category::Pts),
            "15" => Some(Category::Reb),
            "16" => Some(Category::Ast),
            "17" => Some(Category::Stl),
            "18" => Some(Category::Blk),
            "19" => Some(Category::To),
            _ => None,
        }
    }

    /// Parse a canonical category key (`"fg_pct"`, `"to"`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        CATEGORY_RULES
            .iter()
            .find(|rule| rule.key == key)
            .map(|rule| rule.category)
    }

    pub fn rule(self) -> &'static CategoryRule {
        // CATEGORY_RULES is indexed in declaration order.
        &CATEGORY_RULES[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.rule().key
    }

    pub fn display_name(self) -> &'static str {
        self.rule().display_name
    }

    pub fn direction(self) -> Direction {
        self.rule().direction
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Display-only raw splits
// ---------------------------------------------------------------------------

/// Raw made/attempted splits carried alongside the scored categories for
/// display. They never take part in comparison or ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSplit {
    FgmFga,
    FtmFta,
}

impl RawSplit {
    pub fn from_stat_id(stat_id: &str) -> Option<Self> {
        match stat_id.trim() {
            "9004003" => Some(RawSplit::FgmFga),
            "9007006" => Some(RawSplit::FtmFta),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
