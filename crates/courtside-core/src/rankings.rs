// Per-category rankings: every team ranked 1..N in each category, with an
// average-rank rollup for display ordering.

use crate::category::{Category, Direction};
use crate::stats::{TeamStats, WeeklySnapshotSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// One team's rank in every category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRanks {
    pub team_id: String,
    pub team_name: String,
    pub ranks: BTreeMap<Category, usize>,
    /// Mean of the nine category ranks.
    pub average_rank: f64,
    strengths: Vec<Category>,
    weaknesses: Vec<Category>,
}

/// Ranks 1 through this one are strengths.
pub const STRENGTH_MAX_RANK: usize = 3;
/// How many places at the bottom of the league count as weaknesses.
pub const WEAKNESS_BOTTOM_PLACES: usize = 3;

impl TeamRanks {
    /// Categories ranked in the top three, in display order.
    pub fn strengths(&self) -> &[Category] {
        &self.strengths
    }

    /// Categories ranked in the bottom three of an `N`-team week
    /// (rank >= N - 2), in display order. A category that is already a
    /// strength is never also a weakness, which only matters for weeks of
    /// fewer than six teams.
    pub fn weaknesses(&self) -> &[Category] {
        &self.weaknesses
    }
}

fn classify(ranks: &BTreeMap<Category, usize>, num_teams: usize) -> (Vec<Category>, Vec<Category>) {
    let weak_from = num_teams.saturating_sub(WEAKNESS_BOTTOM_PLACES - 1).max(1);
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for category in Category::ALL {
        let Some(&rank) = ranks.get(&category) else {
            continue;
        };
        if rank <= STRENGTH_MAX_RANK {
            strengths.push(category);
        } else if rank >= weak_from {
            weaknesses.push(category);
        }
    }
    (strengths, weaknesses)
}

/// Category ranks for a whole week, in snapshot-set order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryRankings {
    teams: Vec<TeamRanks>,
}

impl CategoryRankings {
    pub fn rank(&self, team_id: &str, category: Category) -> Option<usize> {
        self.team(team_id)?.ranks.get(&category).copied()
    }

    pub fn team(&self, team_id: &str) -> Option<&TeamRanks> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamRanks> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Teams ordered best average rank first. Equal averages keep
    /// snapshot-set order.
    pub fn by_average_rank(&self) -> Vec<&TeamRanks> {
        let mut ordered: Vec<&TeamRanks> = self.teams.iter().collect();
        ordered.sort_by(|a, b| {
            a.average_rank
                .partial_cmp(&b.average_rank)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ordered
    }
}

/// Value used for ranking. A missing category ranks last: 0 when higher is
/// better, +infinity when lower is better.
fn ranking_value(stats: &TeamStats, category: Category) -> f64 {
    stats.get(category).unwrap_or(match category.direction() {
        Direction::HigherBetter => 0.0,
        Direction::LowerBetter => f64::INFINITY,
    })
}

/// Rank every team in every category.
///
/// Ranks are positions in a stable sort, so exact ties are broken by
/// snapshot-set order and every category's ranks are a permutation of 1..N.
pub fn rank_categories(snapshots: &WeeklySnapshotSet) -> CategoryRankings {
    let teams: Vec<&TeamStats> = snapshots.iter().collect();
    let mut ranks: Vec<BTreeMap<Category, usize>> = vec![BTreeMap::new(); teams.len()];

    for category in Category::ALL {
        let mut order: Vec<usize> = (0..teams.len()).collect();
        order.sort_by(|&i, &j| {
            let a = ranking_value(teams[i], category);
            let b = ranking_value(teams[j], category);
            let ord = match category.direction() {
                Direction::HigherBetter => b.partial_cmp(&a),
                Direction::LowerBetter => a.partial_cmp(&b),
            };
            ord.unwrap_or(std::cmp::Ordering::Equal)
        });
        for (position, &team_idx) in order.iter().enumerate() {
            ranks[team_idx].insert(category, position + 1);
        }
    }

    let num_teams = teams.len();
    let teams = teams
        .into_iter()
        .zip(ranks)
        .filter_map(|(stats, ranks)| {
            let team_id = stats.team_id.clone()?;
            let average_rank = if ranks.is_empty() {
                0.0
            } else {
                ranks.values().sum::<usize>() as f64 / ranks.len() as f64
            };
            let (strengths, weaknesses) = classify(&ranks, num_teams);
            Some(TeamRanks {
                team_id,
                team_name: stats.team_name.clone(),
                ranks,
                average_rank,
                strengths,
                weaknesses,
            })
        })
        .collect();

    CategoryRankings { teams }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, values: &[(Category, f64)]) -> TeamStats {
        TeamStats::new(id, format!("Team {id}"), values.iter().copied())
    }

    fn week() -> WeeklySnapshotSet {
        [
            team("a", &[(Category::Pts, 100.0), (Category::To, 12.0), (Category::FgPct, 0.470)]),
            team("b", &[(Category::Pts, 120.0), (Category::To, 9.0), (Category::FgPct, 0.455)]),
            team("c", &[(Category::Pts, 90.0), (Category::To, 15.0)]),
            team("d", &[(Category::Pts, 100.0)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn each_category_is_a_permutation() {
        let rankings = rank_categories(&week());
        assert_eq!(rankings.len(), 4);
        for category in Category::ALL {
            let mut seen: Vec<usize> = rankings
                .iter()
                .map(|t| t.ranks[&category])
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![1, 2, 3, 4], "category {category}");
        }
    }

    #[test]
    fn higher_better_ranks_descending_with_stable_ties() {
        let rankings = rank_categories(&week());
        assert_eq!(rankings.rank("b", Category::Pts), Some(1));
        // a and d both have 100; a was registered first.
        assert_eq!(rankings.rank("a", Category::Pts), Some(2));
        assert_eq!(rankings.rank("d", Category::Pts), Some(3));
        assert_eq!(rankings.rank("c", Category::Pts), Some(4));
    }

    #[test]
    fn lower_better_ranks_ascending_and_missing_is_last() {
        let rankings = rank_categories(&week());
        assert_eq!(rankings.rank("b", Category::To), Some(1));
        assert_eq!(rankings.rank("a", Category::To), Some(2));
        assert_eq!(rankings.rank("c", Category::To), Some(3));
        assert_eq!(rankings.rank("d", Category::To), Some(4));
    }

    #[test]
    fn missing_higher_better_ranks_last() {
        let rankings = rank_categories(&week());
        assert_eq!(rankings.rank("a", Category::FgPct), Some(1));
        assert_eq!(rankings.rank("b", Category::FgPct), Some(2));
        // c and d both missing: treated as 0, stable order.
        assert_eq!(rankings.rank("c", Category::FgPct), Some(3));
        assert_eq!(rankings.rank("d", Category::FgPct), Some(4));
    }

    #[test]
    fn average_rank_and_display_order() {
        let set: WeeklySnapshotSet = [
            team("low", &[(Category::Pts, 1.0)]),
            team("high", &Category::ALL.map(|c| (c, if c == Category::To { 0.5 } else { 9.0 }))),
        ]
        .into_iter()
        .collect();
        let rankings = rank_categories(&set);
        let high = rankings.team("high").unwrap();
        assert_eq!(high.average_rank, 1.0);
        let low = rankings.team("low").unwrap();
        assert_eq!(low.average_rank, 2.0);

        let order: Vec<&str> = rankings
            .by_average_rank()
            .iter()
            .map(|t| t.team_id.as_str())
            .collect();
        assert_eq!(order, vec!["high", "low"]);
    }

    /// Ten teams where team `t{i}` ranks `i` in points and `11 - i` in
    /// rebounds; every other category is missing for everyone.
    fn ten_team_week() -> WeeklySnapshotSet {
        (1..=10)
            .map(|i: u32| {
                let v = f64::from(i);
                TeamStats::new(
                    format!("t{i}"),
                    format!("Team {i}"),
                    [(Category::Pts, 200.0 - v), (Category::Reb, v)],
                )
            })
            .collect()
    }

    #[test]
    fn strengths_and_weaknesses_in_ten_team_week() {
        let rankings = rank_categories(&ten_team_week());

        // Top in points, bottom in rebounds.
        let first = rankings.team("t1").unwrap();
        assert_eq!(first.ranks[&Category::Pts], 1);
        assert!(first.strengths().contains(&Category::Pts));
        assert!(first.weaknesses().contains(&Category::Reb));

        // Rank 8 is the first of the bottom three; rank 7 is neither.
        let eighth = rankings.team("t8").unwrap();
        assert!(eighth.weaknesses().contains(&Category::Pts));
        assert!(eighth.strengths().contains(&Category::Reb));
        let seventh = rankings.team("t7").unwrap();
        assert!(!seventh.weaknesses().contains(&Category::Pts));
        assert!(!seventh.strengths().contains(&Category::Pts));

        // Middle of the pack in both.
        let fifth = rankings.team("t5").unwrap();
        assert!(!fifth.strengths().contains(&Category::Pts));
        assert!(!fifth.weaknesses().contains(&Category::Reb));
    }

    #[test]
    fn small_week_never_lists_a_category_as_both() {
        let rankings = rank_categories(&week());
        for team in rankings.iter() {
            for category in team.weaknesses() {
                assert!(!team.strengths().contains(category));
            }
        }
        // Four teams: ranks 1-3 are strengths, only rank 4 is a weakness.
        let c = rankings.team("c").unwrap();
        assert!(c.weaknesses().contains(&Category::Pts));
        assert!(c.strengths().contains(&Category::To));
        let d = rankings.team("d").unwrap();
        assert_eq!(d.ranks[&Category::Pts], 3);
        assert!(d.strengths().contains(&Category::Pts));
        assert!(!d.weaknesses().contains(&Category::Pts));
    }

    #[test]
    fn strengths_and_weaknesses_are_serialized() {
        let rankings = rank_categories(&week());
        let value = serde_json::to_value(rankings.team("b").unwrap()).unwrap();
        assert_eq!(value["strengths"][0], "fg_pct");
        assert!(value["weaknesses"].is_array());
    }

    #[test]
    fn empty_week_has_no_rankings() {
        let rankings = rank_categories(&WeeklySnapshotSet::new());
        assert!(rankings.is_empty());
        assert_eq!(rankings.rank("a", Category::Pts), None);
    }
}
