// Head-to-head category analytics engine: payload normalization, category
// comparison, possibility matrix, category rankings and historical
// prediction.

pub mod category;
pub mod compare;
pub mod decode;
pub mod error;
pub mod extract;
pub mod matrix;
pub mod predict;
pub mod rankings;
pub mod scoreboard;
pub mod stats;

pub use category::{Category, CategoryRule, Direction, RawSplit, CATEGORY_RULES};
pub use compare::{compare, ComparisonResult, Leader, MatchupOutcome, Winner, COMPETITIVE_THRESHOLD_PCT};
pub use decode::{decode_week, DecodedWeek, ScheduledMatchup};
pub use error::{DecodeError, FetchError};
pub use extract::extract;
pub use matrix::{build_matrix, PossibilityMatrix};
pub use predict::{predict, predict_schedule, PeriodSource, Prediction, Window};
pub use rankings::{rank_categories, CategoryRankings};
pub use scoreboard::{scoreboard, LiveMatchup};
pub use stats::{TeamStats, WeeklySnapshotSet};
