// Historical prediction: average each team's snapshots over a window of
// prior periods and compare the averages.
//
// A window is all-or-nothing. If any selected period cannot be fetched, or
// lacks either team, the prediction for that window is unavailable; a
// partial subset of periods is never used.

use crate::category::Category;
use crate::compare::{compare, MatchupOutcome};
use crate::decode::ScheduledMatchup;
use crate::error::FetchError;
use crate::stats::{TeamStats, WeeklySnapshotSet};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Which prior periods a prediction samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// The single period before the current one.
    Last,
    /// Up to `n` most recent prior periods, clipped at period 1.
    LastN(u32),
    /// Every prior period.
    Total,
}

impl Window {
    /// Parse a window name (`"last"`, `"last_n"`, `"total"`); `last_n` takes
    /// its size from `n`.
    pub fn from_name(name: &str, n: u32) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "last" => Some(Window::Last),
            "last_n" => Some(Window::LastN(n)),
            "total" => Some(Window::Total),
            _ => None,
        }
    }

    /// Periods sampled when predicting `current_period`, oldest first.
    pub fn periods(self, current_period: u32) -> Vec<u32> {
        match self {
            Window::Last => {
                if current_period > 1 {
                    vec![current_period - 1]
                } else {
                    Vec::new()
                }
            }
            Window::LastN(n) => {
                let start = current_period.saturating_sub(n).max(1);
                (start..current_period).collect()
            }
            Window::Total => (1..current_period).collect(),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Last => f.write_str("last"),
            Window::LastN(n) => write!(f, "last_{n}"),
            Window::Total => f.write_str("total"),
        }
    }
}

// ---------------------------------------------------------------------------
// Period source
// ---------------------------------------------------------------------------

/// Supplies one decoded period at a time. This is the seam to whatever
/// actually fetches league data; closures implement it directly.
pub trait PeriodSource {
    fn fetch_period(&mut self, period: u32) -> Result<WeeklySnapshotSet, FetchError>;
}

impl<F> PeriodSource for F
where
    F: FnMut(u32) -> Result<WeeklySnapshotSet, FetchError>,
{
    fn fetch_period(&mut self, period: u32) -> Result<WeeklySnapshotSet, FetchError> {
        self(period)
    }
}

/// Memoizes another source so each period is fetched at most once, failures
/// included.
pub struct CachedSource<S> {
    inner: S,
    cache: HashMap<u32, Result<WeeklySnapshotSet, FetchError>>,
}

impl<S: PeriodSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        CachedSource {
            inner,
            cache: HashMap::new(),
        }
    }
}

impl<S: PeriodSource> PeriodSource for CachedSource<S> {
    fn fetch_period(&mut self, period: u32) -> Result<WeeklySnapshotSet, FetchError> {
        if let Some(cached) = self.cache.get(&period) {
            return cached.clone();
        }
        let fetched = self.inner.fetch_period(period);
        self.cache.insert(period, fetched.clone());
        fetched
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Why a window could not produce a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The window selects no periods (e.g. predicting period 1).
    NoPriorPeriods,
    /// A selected period failed to fetch.
    FetchFailed { error: FetchError },
    /// A selected period has no data for this team.
    MissingSnapshot { period: u32, team_id: String },
    /// The scheduled pairing has a team without an id.
    UnidentifiedTeam,
}

/// A successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedMatchup {
    pub team_id_a: String,
    pub team_id_b: String,
    pub window: Window,
    pub periods: Vec<u32>,
    pub periods_used: usize,
    pub averaged_a: TeamStats,
    pub averaged_b: TeamStats,
    pub outcome: MatchupOutcome,
}

/// Outcome of predicting one pairing over one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prediction {
    Available(PredictedMatchup),
    Unavailable {
        window: Window,
        periods: Vec<u32>,
        reason: UnavailableReason,
    },
}

impl Prediction {
    pub fn is_available(&self) -> bool {
        matches!(self, Prediction::Available(_))
    }

    pub fn outcome(&self) -> Option<&MatchupOutcome> {
        match self {
            Prediction::Available(p) => Some(&p.outcome),
            Prediction::Unavailable { .. } => None,
        }
    }
}

/// A scheduled pairing together with its prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPrediction {
    pub matchup: ScheduledMatchup,
    pub prediction: Prediction,
}

// ---------------------------------------------------------------------------
// Averaging
// ---------------------------------------------------------------------------

/// Average a team's snapshots category by category.
///
/// Each category is averaged over the snapshots that carry it; a category
/// absent from every snapshot comes out as 0.0. The name is taken from the
/// most recent snapshot.
pub fn average_snapshots(team_id: &str, history: &[TeamStats]) -> TeamStats {
    let team_name = history
        .last()
        .map(|s| s.team_name.clone())
        .unwrap_or_else(|| crate::stats::UNKNOWN_TEAM.to_string());

    let categories = Category::ALL.map(|category| {
        let values: Vec<f64> = history.iter().filter_map(|s| s.get(category)).collect();
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        (category, mean)
    });

    TeamStats::new(team_id, team_name, categories)
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Predict `team_id_a` vs `team_id_b` for `current_period` from the prior
/// periods `window` selects.
pub fn predict<S: PeriodSource + ?Sized>(
    team_id_a: &str,
    team_id_b: &str,
    current_period: u32,
    window: Window,
    source: &mut S,
) -> Prediction {
    let periods = window.periods(current_period);
    let unavailable = |reason: UnavailableReason| Prediction::Unavailable {
        window,
        periods: periods.clone(),
        reason,
    };

    if periods.is_empty() {
        return unavailable(UnavailableReason::NoPriorPeriods);
    }

    let mut history_a = Vec::with_capacity(periods.len());
    let mut history_b = Vec::with_capacity(periods.len());

    for &period in &periods {
        let snapshots = match source.fetch_period(period) {
            Ok(s) => s,
            Err(error) => {
                debug!("{window} prediction {team_id_a} vs {team_id_b}: {error}");
                return unavailable(UnavailableReason::FetchFailed { error });
            }
        };
        for (team_id, history) in [(team_id_a, &mut history_a), (team_id_b, &mut history_b)] {
            match snapshots.get(team_id).filter(|s| s.has_data()) {
                Some(stats) => history.push(stats.clone()),
                None => {
                    debug!("{window} prediction: period {period} has no data for {team_id}");
                    return unavailable(UnavailableReason::MissingSnapshot {
                        period,
                        team_id: team_id.to_string(),
                    });
                }
            }
        }
    }

    let averaged_a = average_snapshots(team_id_a, &history_a);
    let averaged_b = average_snapshots(team_id_b, &history_b);
    let outcome = compare(&averaged_a, &averaged_b);

    Prediction::Available(PredictedMatchup {
        team_id_a: team_id_a.to_string(),
        team_id_b: team_id_b.to_string(),
        window,
        periods_used: periods.len(),
        periods,
        averaged_a,
        averaged_b,
        outcome,
    })
}

/// Predict every scheduled pairing of a week over one window. Each period is
/// fetched at most once across all pairings.
pub fn predict_schedule<S: PeriodSource + ?Sized>(
    matchups: &[ScheduledMatchup],
    current_period: u32,
    window: Window,
    source: &mut S,
) -> Vec<ScheduledPrediction> {
    let mut cached = CachedSource::new(|period: u32| source.fetch_period(period));

    let predictions: Vec<ScheduledPrediction> = matchups
        .iter()
        .map(|matchup| {
            let prediction = match (&matchup.team_id_a, &matchup.team_id_b) {
                (Some(a), Some(b)) => predict(a, b, current_period, window, &mut cached),
                _ => Prediction::Unavailable {
                    window,
                    periods: window.periods(current_period),
                    reason: UnavailableReason::UnidentifiedTeam,
                },
            };
            ScheduledPrediction {
                matchup: matchup.clone(),
                prediction,
            }
        })
        .collect();

    let available = predictions.iter().filter(|p| p.prediction.is_available()).count();
    info!(
        "{window} predictions for period {current_period}: {available}/{} available",
        predictions.len()
    );
    predictions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
