// Matchup decoding: a raw week scoreboard payload into the scheduled
// pairings plus every team's snapshot for the week.
//
// Expected nesting:
//   scoreboard -> "0" -> matchups -> { count, "0".."n-1" }
//     -> matchup -> "0" -> teams -> "0" | "1" -> team -> <team fragment>
//
// Only a missing `scoreboard` or `matchups` block is an error. Anything
// deeper degrades the same way the extractor does.

use crate::error::DecodeError;
use crate::extract::extract;
use crate::stats::{TeamStats, WeeklySnapshotSet};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// One pairing from the week's schedule, in schedule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledMatchup {
    pub team_id_a: Option<String>,
    pub team_id_b: Option<String>,
    pub team_name_a: String,
    pub team_name_b: String,
}

/// Everything decoded from one week's scoreboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecodedWeek {
    pub matchups: Vec<ScheduledMatchup>,
    pub snapshots: WeeklySnapshotSet,
}

/// Decode a week scoreboard payload.
///
/// Accepts either the bare `{ "scoreboard": ... }` object or the full API
/// envelope `{ "fantasy_content": { "league": [ <meta>, { "scoreboard": ... } ] } }`.
pub fn decode_week(payload: &Value) -> Result<DecodedWeek, DecodeError> {
    let scoreboard = locate_scoreboard(payload).ok_or_else(|| DecodeError::MissingPath {
        path: "scoreboard".into(),
    })?;

    let matchups = scoreboard
        .get("0")
        .and_then(|s| s.get("matchups"))
        .or_else(|| scoreboard.get("matchups"))
        .ok_or_else(|| DecodeError::MissingPath {
            path: "scoreboard.0.matchups".into(),
        })?;

    let count = matchup_count(matchups);
    debug!("decoding {count} matchups");

    let mut week = DecodedWeek::default();

    for i in 0..count {
        let Some(teams) = matchups
            .get(i.to_string())
            .and_then(|m| m.get("matchup"))
            .and_then(|m| m.get("0"))
            .and_then(|m| m.get("teams"))
        else {
            warn!("matchup {i} has no teams block, skipping");
            continue;
        };

        let a = extract_slot(teams, "0");
        let b = extract_slot(teams, "1");

        week.matchups.push(ScheduledMatchup {
            team_id_a: a.team_id.clone(),
            team_id_b: b.team_id.clone(),
            team_name_a: a.team_name.clone(),
            team_name_b: b.team_name.clone(),
        });

        for stats in [a, b] {
            let name = stats.team_name.clone();
            if !week.snapshots.insert(stats) {
                warn!("matchup {i}: team '{name}' has no team_key, not registered");
            }
        }
    }

    Ok(week)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn locate_scoreboard(payload: &Value) -> Option<&Value> {
    if let Some(scoreboard) = payload.get("scoreboard") {
        return Some(scoreboard);
    }
    payload
        .get("fantasy_content")?
        .get("league")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("scoreboard"))
}

/// Number of indexed matchups. Uses `count` (integer or numeric string) when
/// present, otherwise counts consecutive `"0"`, `"1"`, ... keys.
fn matchup_count(matchups: &Value) -> usize {
    let declared = matchups.get("count").and_then(|c| match c {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    });
    match declared {
        Some(n) => n,
        None => {
            let inferred = (0..)
                .take_while(|i: &usize| matchups.get(i.to_string()).is_some())
                .count();
            warn!("matchups block has no usable count, inferred {inferred}");
            inferred
        }
    }
}

fn extract_slot(teams: &Value, slot: &str) -> TeamStats {
    match teams.get(slot).and_then(|t| t.get("team")) {
        Some(fragment) => extract(fragment),
        None => {
            warn!("team slot {slot} missing from matchup");
            extract(&Value::Null)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::stats::UNKNOWN_TEAM;
    use serde_json::json;

    fn team(key: &str, name: &str, pts: &str) -> Value {
        json!([
            [{ "team_key": key }, { "name": name }],
            { "team_stats": { "stats": [ { "stat": { "stat_id": "12", "value": pts } } ] } }
        ])
    }

    fn matchup(a: Value, b: Value) -> Value {
        json!({ "matchup": { "0": { "teams": { "0": { "team": a }, "1": { "team": b } } } } })
    }

    fn scoreboard(matchups: Value) -> Value {
        json!({ "scoreboard": { "0": { "matchups": matchups } } })
    }

    #[test]
    fn decodes_schedule_order_and_snapshots() {
        let payload = scoreboard(json!({
            "count": 2,
            "0": matchup(team("t.4", "Four", "40"), team("t.1", "One", "10")),
            "1": matchup(team("t.3", "Three", "30"), team("t.2", "Two", "20")),
        }));
        let week = decode_week(&payload).unwrap();

        assert_eq!(week.matchups.len(), 2);
        assert_eq!(week.matchups[0].team_id_a.as_deref(), Some("t.4"));
        assert_eq!(week.matchups[0].team_name_b, "One");
        assert_eq!(week.matchups[1].team_id_b.as_deref(), Some("t.2"));

        let ids: Vec<&str> = week.snapshots.team_ids().collect();
        assert_eq!(ids, vec!["t.4", "t.1", "t.3", "t.2"]);
        assert_eq!(week.snapshots.get("t.3").unwrap().get(Category::Pts), Some(30.0));
    }

    #[test]
    fn accepts_full_api_envelope_and_string_count() {
        let payload = json!({
            "fantasy_content": {
                "league": [
                    { "league_key": "428.l.1" },
                    { "scoreboard": { "0": { "matchups": {
                        "count": "1",
                        "0": matchup(team("a", "A", "1"), team("b", "B", "2")),
                    } }, "week": "3" } }
                ]
            }
        });
        let week = decode_week(&payload).unwrap();
        assert_eq!(week.matchups.len(), 1);
        assert_eq!(week.snapshots.len(), 2);
    }

    #[test]
    fn infers_count_when_absent() {
        let payload = scoreboard(json!({
            "0": matchup(team("a", "A", "1"), team("b", "B", "2")),
            "1": matchup(team("c", "C", "1"), team("d", "D", "2")),
        }));
        let week = decode_week(&payload).unwrap();
        assert_eq!(week.matchups.len(), 2);
        assert_eq!(week.snapshots.len(), 4);
    }

    #[test]
    fn missing_scoreboard_is_decode_error() {
        let err = decode_week(&json!({ "standings": {} })).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingPath {
                path: "scoreboard".into()
            }
        );
    }

    #[test]
    fn missing_matchups_is_decode_error() {
        let err = decode_week(&json!({ "scoreboard": { "0": { "week": "1" } } })).unwrap_err();
        match err {
            DecodeError::MissingPath { path } => assert!(path.ends_with("matchups")),
        }
    }

    #[test]
    fn partial_matchups_degrade_gracefully() {
        let payload = scoreboard(json!({
            "count": 3,
            "0": matchup(team("a", "A", "1"), team("b", "B", "2")),
            "1": { "matchup": { "0": { "status": "preevent" } } },
            "2": { "matchup": { "0": { "teams": { "0": { "team": team("c", "C", "5") } } } } },
        }));
        let week = decode_week(&payload).unwrap();

        assert_eq!(week.matchups.len(), 2);
        let partial = &week.matchups[1];
        assert_eq!(partial.team_id_a.as_deref(), Some("c"));
        assert_eq!(partial.team_id_b, None);
        assert_eq!(partial.team_name_b, UNKNOWN_TEAM);
        // The anonymous team is scheduled but not registered.
        assert_eq!(week.snapshots.len(), 3);
    }
}
