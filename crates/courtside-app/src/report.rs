// Week report: every analytics output for one week, assembled into a single
// serializable document.

use crate::config::Config;
use chrono::{DateTime, Utc};
use courtside_core::matrix::{OpponentExtremes, StrengthRecord};
use courtside_core::predict::ScheduledPrediction;
use courtside_core::rankings::TeamRanks;
use courtside_core::{
    build_matrix, predict_schedule, rank_categories, scoreboard, DecodedWeek, LiveMatchup,
    PeriodSource, PossibilityMatrix, Window,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LeagueInfo {
    pub name: String,
    pub season: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamEntry {
    pub team_id: String,
    pub team_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowPredictions {
    /// Window label as configured (`last`, `last_3`, `total`).
    pub window: String,
    pub matchups: Vec<ScheduledPrediction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekReport {
    pub league: LeagueInfo,
    pub week: u32,
    pub generated_at: DateTime<Utc>,
    pub teams: Vec<TeamEntry>,
    pub scoreboard: Vec<LiveMatchup>,
    pub matrix: PossibilityMatrix,
    pub strength: Vec<StrengthRecord>,
    pub extremes: Vec<OpponentExtremes>,
    /// Teams in display order (best average rank first).
    pub rankings: Vec<TeamRanks>,
    pub predictions: Vec<WindowPredictions>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Every prior period any of `windows` samples for `current_week`, ascending.
pub fn history_periods(windows: &[Window], current_week: u32) -> Vec<u32> {
    windows
        .iter()
        .flat_map(|w| w.periods(current_week))
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

/// Build the report for `current`, the decoded payload of the configured
/// week. Historical periods come from `history`.
pub fn build_report<S: PeriodSource + ?Sized>(
    config: &Config,
    current: &DecodedWeek,
    history: &mut S,
) -> WeekReport {
    let week = config.league.current_week;

    let teams: Vec<TeamEntry> = current
        .snapshots
        .iter()
        .filter_map(|stats| {
            let team_id = stats.team_id.clone()?;
            Some(TeamEntry {
                abbreviation: config.display.abbreviation(&team_id).map(String::from),
                team_id,
                team_name: stats.team_name.clone(),
            })
        })
        .collect();

    let matrix = build_matrix(&current.snapshots);
    let strength = matrix.strength_rankings();
    let extremes = matrix.opponent_extremes();
    let rankings = rank_categories(&current.snapshots)
        .by_average_rank()
        .into_iter()
        .cloned()
        .collect();

    let predictions: Vec<WindowPredictions> = config
        .windows
        .iter()
        .map(|&window| WindowPredictions {
            window: window.to_string(),
            matchups: predict_schedule(&current.matchups, week, window, &mut *history),
        })
        .collect();

    if teams.len() != config.league.num_teams {
        info!(
            "Week {week} has {} identified teams; league is configured for {}",
            teams.len(),
            config.league.num_teams
        );
    }
    info!(
        "Built week {week} report: {} teams, {} matchups, {} matrix cells, {} windows",
        teams.len(),
        current.matchups.len(),
        matrix.len(),
        predictions.len()
    );

    WeekReport {
        league: LeagueInfo {
            name: config.league.name.clone(),
            season: config.league.season,
        },
        week,
        generated_at: Utc::now(),
        teams,
        scoreboard: scoreboard(current),
        matrix,
        strength,
        extremes,
        rankings,
        predictions,
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Write the report as pretty JSON to `output`, or stdout when `None`.
pub fn write_report(report: &WeekReport, output: Option<&Path>) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| ReportError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            }
            std::fs::write(path, format!("{json}\n")).map_err(|e| ReportError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").map_err(|e| ReportError::Io {
                path: PathBuf::from("<stdout>"),
                source: e,
            })?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataConfig, DisplayConfig, LeagueConfig};
    use courtside_core::category::Category;
    use courtside_core::decode::ScheduledMatchup;
    use courtside_core::{FetchError, TeamStats, WeeklySnapshotSet};
    use std::collections::HashMap;

    fn test_config(current_week: u32) -> Config {
        Config {
            league: LeagueConfig {
                name: "Test League".into(),
                season: 2025,
                num_teams: 2,
                current_week,
            },
            data: DataConfig {
                dir: "unused".into(),
                output: None,
            },
            windows: vec![Window::Last, Window::Total],
            display: DisplayConfig {
                abbreviations: HashMap::from([("a".to_string(), "ALP".to_string())]),
            },
        }
    }

    fn two_team_week() -> DecodedWeek {
        DecodedWeek {
            matchups: vec![ScheduledMatchup {
                team_id_a: Some("a".into()),
                team_id_b: Some("b".into()),
                team_name_a: "Alpha".into(),
                team_name_b: "Bravo".into(),
            }],
            snapshots: [
                TeamStats::new("a", "Alpha", [(Category::Pts, 110.0), (Category::To, 9.0)]),
                TeamStats::new("b", "Bravo", [(Category::Pts, 100.0), (Category::To, 12.0)]),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn history_periods_is_sorted_union() {
        let windows = [Window::Last, Window::LastN(2), Window::Total];
        assert_eq!(history_periods(&windows, 4), vec![1, 2, 3]);
        assert_eq!(history_periods(&[Window::Last], 1), Vec::<u32>::new());
        assert_eq!(history_periods(&[Window::LastN(2)], 6), vec![4, 5]);
    }

    #[test]
    fn report_covers_every_output() {
        let week = two_team_week();
        let snapshots = week.snapshots.clone();
        let mut history = move |period: u32| -> Result<WeeklySnapshotSet, FetchError> {
            if period == 1 {
                Err(FetchError::new(1, "missing"))
            } else {
                Ok(snapshots.clone())
            }
        };

        let report = build_report(&test_config(3), &week, &mut history);

        assert_eq!(report.week, 3);
        assert_eq!(report.teams.len(), 2);
        assert_eq!(report.teams[0].abbreviation.as_deref(), Some("ALP"));
        assert_eq!(report.teams[1].abbreviation, None);
        assert_eq!(report.scoreboard.len(), 1);
        assert_eq!(report.matrix.len(), 2);
        assert_eq!(report.strength[0].team_id, "a");
        assert_eq!(report.extremes.len(), 2);
        assert_eq!(report.rankings[0].team_id, "a");

        assert_eq!(report.predictions.len(), 2);
        assert_eq!(report.predictions[0].window, "last");
        assert!(report.predictions[0].matchups[0].prediction.is_available());
        // Total needs period 1, which failed.
        assert_eq!(report.predictions[1].window, "total");
        assert!(!report.predictions[1].matchups[0].prediction.is_available());
    }

    #[test]
    fn report_serializes_and_writes_to_file() {
        let week = two_team_week();
        let mut history = |period: u32| -> Result<WeeklySnapshotSet, FetchError> {
            Err(FetchError::new(period, "offline"))
        };
        let report = build_report(&test_config(1), &week, &mut history);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["league"]["name"], "Test League");
        assert!(value["generated_at"].is_string());
        // Two teams: every rank is in the top three, so nothing is a weakness.
        assert_eq!(value["rankings"][0]["strengths"].as_array().unwrap().len(), 9);
        assert_eq!(value["rankings"][1]["weaknesses"], serde_json::json!([]));
        assert_eq!(value["predictions"][0]["matchups"][0]["prediction"]["status"], "unavailable");

        let dir = std::env::temp_dir().join("courtside_report_write");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested/report.json");
        write_report(&report, Some(&path)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["week"], 1);
        assert_eq!(written["teams"][1]["team_id"], "b");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
