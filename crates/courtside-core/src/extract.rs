// Stat extraction: one raw team fragment from the scoreboard payload into a
// canonical `TeamStats`.
//
// The fragment is a two-element array:
//   [0] = metadata sequence (objects carrying team_key, name, ...; the API
//         also pads it with empty arrays and nests some records one level)
//   [1] = { "team_stats": { "stats": [ { "stat": { "stat_id", "value" } } ] } }
//
// Extraction never fails. Whatever cannot be read falls back to the
// "no data" defaults: missing id, "Unknown Team", and 0.0 for blank values.

use crate::category::{Category, RawSplit};
use crate::stats::TeamStats;
use serde_json::Value;
use tracing::{debug, warn};

/// Extract a `TeamStats` from a raw team fragment.
pub fn extract(fragment: &Value) -> TeamStats {
    let metadata = fragment.get(0);
    let team_id = metadata.and_then(|m| find_metadata_str(m, "team_key"));
    let team_name = metadata.and_then(|m| find_metadata_str(m, "name"));

    let mut stats = TeamStats::empty(team_id, team_name);

    let Some(entries) = fragment
        .get(1)
        .and_then(|c| c.get("team_stats"))
        .and_then(|ts| ts.get("stats"))
        .and_then(Value::as_array)
    else {
        debug!("team '{}' has no team_stats block", stats.team_name);
        return stats;
    };

    for entry in entries {
        let Some(stat) = entry.get("stat") else {
            continue;
        };
        let Some(stat_id) = stat.get("stat_id").and_then(scalar_to_string) else {
            continue;
        };
        let raw_value = stat.get("value");

        if let Some(category) = Category::from_stat_id(&stat_id) {
            let value = coerce_value(raw_value, category, &stats.team_name);
            stats.categories.insert(category, value);
        } else if let Some(split) = RawSplit::from_stat_id(&stat_id) {
            if let Some(text) = raw_value.and_then(scalar_to_string) {
                stats.splits.insert(split, text);
            }
        }
    }

    stats
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First string value for `field` in the metadata sequence, searching nested
/// arrays in order.
fn find_metadata_str(metadata: &Value, field: &str) -> Option<String> {
    match metadata {
        Value::Array(items) => items.iter().find_map(|item| find_metadata_str(item, field)),
        Value::Object(map) => map.get(field).and_then(scalar_to_string),
        _ => None,
    }
}

/// Render a JSON scalar as a string. Stat ids and values arrive as strings
/// but are occasionally bare numbers.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a raw stat value to `f64`. Blank, non-numeric or non-finite values
/// become `0.0`.
fn coerce_value(raw: Option<&Value>, category: Category, team_name: &str) -> f64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "-" {
                debug!("team '{team_name}': blank {category} value, using 0.0");
                return 0.0;
            }
            match trimmed.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("team '{team_name}': non-numeric {category} value {trimmed:?}, using 0.0");
                    return 0.0;
                }
            }
        }
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        Some(v) => {
            warn!("team '{team_name}': non-finite {category} value {v}, using 0.0");
            0.0
        }
        None => {
            debug!("team '{team_name}': missing {category} value, using 0.0");
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
