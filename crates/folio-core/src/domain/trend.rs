//! Trend score - views per day, boosted during a post's first week.

use chrono::{DateTime, Utc};

/// Posts at most this many days old get the recency bonus.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// Multiplier applied inside the recency window.
pub const RECENCY_BONUS: f64 = 1.5;

/// Compute the trend score of a post.
///
/// `days` is the number of whole days between `created_at` and `now`,
/// never less than one, so fresh (or future-dated) posts do not divide by zero.
pub fn trend_score(views: u64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - created_at).num_days().max(1);
    let bonus = if days <= RECENCY_WINDOW_DAYS {
        RECENCY_BONUS
    } else {
        1.0
    };

    views as f64 * bonus / days as f64
}
