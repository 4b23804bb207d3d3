// Live scoreboard: the week's scheduled pairings compared on the stats
// accumulated so far.

use crate::compare::{compare, MatchupOutcome};
use crate::decode::{DecodedWeek, ScheduledMatchup};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveMatchup {
    pub matchup: ScheduledMatchup,
    /// `None` when either side is not in the week's snapshot set.
    pub outcome: Option<MatchupOutcome>,
}

pub fn scoreboard(week: &DecodedWeek) -> Vec<LiveMatchup> {
    week.matchups
        .iter()
        .map(|matchup| {
            let a = matchup.team_id_a.as_deref().and_then(|id| week.snapshots.get(id));
            let b = matchup.team_id_b.as_deref().and_then(|id| week.snapshots.get(id));
            LiveMatchup {
                matchup: matchup.clone(),
                outcome: a.zip(b).map(|(a, b)| compare(a, b)),
            }
        })
        .collect()
}
