// Week payloads on disk: one raw scoreboard payload per file, named
// `week_<n>.json`, loaded with tokio and handed to the engine as decoded
// weeks.

use courtside_core::{decode_week, DecodeError, DecodedWeek, FetchError, PeriodSource, WeeklySnapshotSet};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read week file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unrecognized payload in {path}: {source}")]
    Decode { path: PathBuf, source: DecodeError },
}

// ---------------------------------------------------------------------------
// Directory of week files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WeekFiles {
    dir: PathBuf,
}

impl WeekFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        WeekFiles { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, week: u32) -> PathBuf {
        self.dir.join(format!("week_{week}.json"))
    }

    /// Read and decode one week's payload.
    pub async fn load_week(&self, week: u32) -> Result<DecodedWeek, SourceError> {
        let path = self.path_for(week);
        let bytes = tokio::fs::read(&path).await.map_err(|e| SourceError::Io {
            path: path.clone(),
            source: e,
        })?;
        let payload: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::Json {
                path: path.clone(),
                source: e,
            })?;
        let decoded = decode_week(&payload).map_err(|e| SourceError::Decode {
            path: path.clone(),
            source: e,
        })?;
        debug!(
            "Loaded week {week} from {}: {} matchups, {} teams",
            path.display(),
            decoded.matchups.len(),
            decoded.snapshots.len()
        );
        Ok(decoded)
    }

    /// Load every requested week concurrently. Failures are kept per week so
    /// the predictor can mark just the affected windows unavailable.
    pub async fn prefetch(&self, weeks: &[u32]) -> PrefetchedSource {
        let loads = weeks.iter().map(|&week| async move { (week, self.load_week(week).await) });
        let results = join_all(loads).await;

        let mut periods = HashMap::with_capacity(results.len());
        for (week, result) in results {
            let entry = match result {
                Ok(decoded) => Ok(decoded.snapshots),
                Err(e) => {
                    warn!("Week {week} unavailable: {e}");
                    Err(FetchError::new(week, e.to_string()))
                }
            };
            periods.insert(week, entry);
        }

        let loaded = periods.values().filter(|r| r.is_ok()).count();
        info!("Prefetched {loaded}/{} historical weeks from {}", weeks.len(), self.dir.display());

        PrefetchedSource { periods }
    }
}

// ---------------------------------------------------------------------------
// Prefetched periods
// ---------------------------------------------------------------------------

/// Periods loaded ahead of time. Asking for a period that was never
/// prefetched is a fetch failure, not a panic.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedSource {
    periods: HashMap<u32, Result<WeeklySnapshotSet, FetchError>>,
}

impl PrefetchedSource {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

impl PeriodSource for PrefetchedSource {
    fn fetch_period(&mut self, period: u32) -> Result<WeeklySnapshotSet, FetchError> {
        match self.periods.get(&period) {
            Some(result) => result.clone(),
            None => Err(FetchError::new(period, "period was not prefetched")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        tmp
    }

    fn bare_scoreboard(team_key: &str, pts: &str) -> serde_json::Value {
        let fragment = |key: &str, name: &str| {
            json!([
                [{ "team_key": key }, { "name": name }],
                { "team_stats": { "stats": [{ "stat": { "stat_id": "12", "value": pts } }] } }
            ])
        };
        json!({
            "scoreboard": { "0": { "matchups": {
                "count": 1,
                "0": { "matchup": { "0": { "teams": {
                    "0": { "team": fragment(team_key, "Home") },
                    "1": { "team": fragment("opp", "Away") }
                } } } }
            } } }
        })
    }

    #[test]
    fn week_file_naming() {
        let files = WeekFiles::new("data/weeks");
        assert_eq!(files.path_for(7), PathBuf::from("data/weeks/week_7.json"));
    }

    #[tokio::test]
    async fn load_week_decodes_file() {
        let dir = temp_dir("courtside_source_load");
        fs::write(dir.join("week_1.json"), bare_scoreboard("t.1", "88").to_string()).unwrap();

        let week = WeekFiles::new(&dir).load_week(1).await.unwrap();
        assert_eq!(week.matchups.len(), 1);
        assert_eq!(week.snapshots.len(), 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn load_week_error_kinds() {
        let dir = temp_dir("courtside_source_errors");
        fs::write(dir.join("week_2.json"), "{ not json").unwrap();
        fs::write(dir.join("week_3.json"), r#"{"error": "no such week"}"#).unwrap();
        let files = WeekFiles::new(&dir);

        assert!(matches!(files.load_week(1).await, Err(SourceError::Io { .. })));
        assert!(matches!(files.load_week(2).await, Err(SourceError::Json { .. })));
        assert!(matches!(files.load_week(3).await, Err(SourceError::Decode { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn prefetch_keeps_failures_per_week() {
        let dir = temp_dir("courtside_source_prefetch");
        fs::write(dir.join("week_1.json"), bare_scoreboard("t.1", "80").to_string()).unwrap();
        fs::write(dir.join("week_3.json"), bare_scoreboard("t.1", "95").to_string()).unwrap();

        let mut source = WeekFiles::new(&dir).prefetch(&[1, 2, 3]).await;
        assert_eq!(source.len(), 3);

        let week_1 = source.fetch_period(1).unwrap();
        assert!(week_1.contains("t.1"));
        let missing = source.fetch_period(2).unwrap_err();
        assert_eq!(missing.period, 2);
        assert!(source.fetch_period(3).is_ok());

        let never = source.fetch_period(9).unwrap_err();
        assert_eq!(never.period, 9);

        let _ = fs::remove_dir_all(&dir);
    }
}
