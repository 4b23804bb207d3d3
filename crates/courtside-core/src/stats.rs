// Canonical per-team snapshots and the per-week snapshot set.

use crate::category::{Category, RawSplit};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Team name used when the upstream metadata carries no `name`.
pub const UNKNOWN_TEAM: &str = "Unknown Team";

// ---------------------------------------------------------------------------
// TeamStats
// ---------------------------------------------------------------------------

/// One team's statistics for one scoring period.
///
/// `categories` only holds the categories present in the source payload;
/// absent categories are never filled with zero here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub team_id: Option<String>,
    pub team_name: String,
    pub categories: BTreeMap<Category, f64>,
    /// Raw made/attempted strings, display only.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub splits: BTreeMap<RawSplit, String>,
}

impl TeamStats {
    /// Build a snapshot from already-canonical values.
    pub fn new(
        team_id: impl Into<String>,
        team_name: impl Into<String>,
        categories: impl IntoIterator<Item = (Category, f64)>,
    ) -> Self {
        TeamStats {
            team_id: Some(team_id.into()),
            team_name: team_name.into(),
            categories: categories.into_iter().collect(),
            splits: BTreeMap::new(),
        }
    }

    /// An empty snapshot carrying only best-effort identity.
    pub fn empty(team_id: Option<String>, team_name: Option<String>) -> Self {
        TeamStats {
            team_id,
            team_name: team_name.unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
            categories: BTreeMap::new(),
            splits: BTreeMap::new(),
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.categories.get(&category).copied()
    }

    pub fn has_data(&self) -> bool {
        !self.categories.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WeeklySnapshotSet
// ---------------------------------------------------------------------------

/// All teams' snapshots for one scoring period, keyed by team id.
///
/// Iteration follows first-registration order (the order teams appear in the
/// schedule). Registering an id a second time replaces its stats in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeeklySnapshotSet {
    teams: Vec<TeamStats>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl WeeklySnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a snapshot under its team id. Snapshots without an id cannot
    /// be looked up and are rejected; returns whether it was stored.
    pub fn insert(&mut self, stats: TeamStats) -> bool {
        let Some(team_id) = stats.team_id.clone() else {
            return false;
        };
        match self.index.get(&team_id) {
            Some(&pos) => self.teams[pos] = stats,
            None => {
                self.index.insert(team_id, self.teams.len());
                self.teams.push(stats);
            }
        }
        true
    }

    pub fn get(&self, team_id: &str) -> Option<&TeamStats> {
        self.index.get(team_id).map(|&pos| &self.teams[pos])
    }

    pub fn contains(&self, team_id: &str) -> bool {
        self.index.contains_key(team_id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Snapshots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TeamStats> {
        self.teams.iter()
    }

    /// Team ids in registration order.
    pub fn team_ids(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().filter_map(|t| t.team_id.as_deref())
    }
}

impl FromIterator<TeamStats> for WeeklySnapshotSet {
    fn from_iter<I: IntoIterator<Item = TeamStats>>(iter: I) -> Self {
        let mut set = WeeklySnapshotSet::new();
        for stats in iter {
            set.insert(stats);
        }
        set
    }
}
