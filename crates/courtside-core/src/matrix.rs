// Possibility matrix: how every team would have fared against every other
// team in the same week, not just its scheduled opponent.

use crate::compare::{compare, MatchupOutcome};
use crate::stats::WeeklySnapshotSet;
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// One ordered pairing: `team_id` plays as side A against `opponent_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixCell {
    pub team_id: String,
    pub opponent_id: String,
    pub outcome: MatchupOutcome,
}

/// Outcomes for every ordered pair of distinct teams in a week.
///
/// `(x, y)` and `(y, x)` are separate cells. There is no `(x, x)` cell.
/// Cells are stored row-major in the snapshot set's order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PossibilityMatrix {
    team_ids: Vec<String>,
    cells: Vec<MatrixCell>,
    #[serde(skip)]
    index: HashMap<(String, String), usize>,
}

/// Build the full matrix for a week.
pub fn build_matrix(snapshots: &WeeklySnapshotSet) -> PossibilityMatrix {
    let teams: Vec<_> = snapshots.iter().collect();
    let n = teams.len();
    let mut matrix = PossibilityMatrix {
        team_ids: snapshots.team_ids().map(str::to_string).collect(),
        cells: Vec::with_capacity(n.saturating_sub(1) * n),
        index: HashMap::with_capacity(n.saturating_sub(1) * n),
    };

    for (x, row) in matrix.team_ids.iter().zip(&teams) {
        for (y, col) in matrix.team_ids.iter().zip(&teams) {
            if x == y {
                continue;
            }
            matrix
                .index
                .insert((x.clone(), y.clone()), matrix.cells.len());
            matrix.cells.push(MatrixCell {
                team_id: x.clone(),
                opponent_id: y.clone(),
                outcome: compare(row, col),
            });
        }
    }

    matrix
}

impl PossibilityMatrix {
    /// Outcome with `team_id` as side A. `None` for self-pairs and unknown ids.
    pub fn get(&self, team_id: &str, opponent_id: &str) -> Option<&MatchupOutcome> {
        self.index
            .get(&(team_id.to_string(), opponent_id.to_string()))
            .map(|&i| &self.cells[i].outcome)
    }

    pub fn team_ids(&self) -> &[String] {
        &self.team_ids
    }

    pub fn cells(&self) -> &[MatrixCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// One team's row, in column order.
    pub fn row<'a>(&'a self, team_id: &'a str) -> impl Iterator<Item = &'a MatrixCell> + 'a {
        self.cells.iter().filter(move |c| c.team_id == team_id)
    }

    /// Overall category record of each team against the whole league,
    /// sorted by win percentage (descending, stable).
    pub fn strength_rankings(&self) -> Vec<StrengthRecord> {
        let mut records: Vec<StrengthRecord> = self
            .team_ids
            .iter()
            .map(|id| {
                let mut record = StrengthRecord {
                    team_id: id.clone(),
                    wins: 0,
                    losses: 0,
                    ties: 0,
                    win_pct: 0.0,
                };
                for cell in self.row(id) {
                    record.wins += cell.outcome.wins_a;
                    record.losses += cell.outcome.wins_b;
                    record.ties += cell.outcome.ties;
                }
                let decided = record.wins + record.losses;
                if decided > 0 {
                    record.win_pct = record.wins as f64 / decided as f64;
                }
                record
            })
            .collect();

        records.sort_by(|a, b| {
            b.win_pct
                .partial_cmp(&a.win_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records
    }

    /// Best and worst opponent for each team by category margin. Among equal
    /// margins the best is the first opponent in row order and the worst is
    /// the last.
    pub fn opponent_extremes(&self) -> Vec<OpponentExtremes> {
        self.team_ids
            .iter()
            .filter_map(|id| {
                let mut best: Option<OpponentMargin> = None;
                let mut worst: Option<OpponentMargin> = None;
                for cell in self.row(id) {
                    let candidate = OpponentMargin::from_cell(cell);
                    if best.as_ref().map_or(true, |b| candidate.margin > b.margin) {
                        best = Some(candidate.clone());
                    }
                    if worst.as_ref().map_or(true, |w| candidate.margin <= w.margin) {
                        worst = Some(candidate);
                    }
                }
                Some(OpponentExtremes {
                    team_id: id.clone(),
                    best: best?,
                    worst: worst?,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Derived aggregates
// ---------------------------------------------------------------------------

/// A team's summed category record across all of its matrix cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthRecord {
    pub team_id: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// `wins / (wins + losses)`, or 0 when nothing was decided.
    pub win_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentMargin {
    pub opponent_id: String,
    pub wins: u32,
    pub losses: u32,
    pub margin: i32,
}

impl OpponentMargin {
    fn from_cell(cell: &MatrixCell) -> Self {
        OpponentMargin {
            opponent_id: cell.opponent_id.clone(),
            wins: cell.outcome.wins_a,
            losses: cell.outcome.wins_b,
            margin: cell.outcome.margin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentExtremes {
    pub team_id: String,
    pub best: OpponentMargin,
    pub worst: OpponentMargin,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
