//! Day-chained completion streaks.
//!
//! A streak counts completion dates chained backward from a reference day,
//! where each accepted date is at most one day before the previous one
//! (starting from the reference day itself).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Treatment of completions dated after the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FutureCompletions {
    /// A future date satisfies the one-day window like any other date and
    /// moves the cursor forward. Matches historical data.
    #[default]
    Count,
    /// Dates after the reference day are dropped before walking.
    Ignore,
}

impl FutureCompletions {
    pub fn from_flag(count_future: bool) -> Self {
        if count_future {
            FutureCompletions::Count
        } else {
            FutureCompletions::Ignore
        }
    }
}

/// Length of the streak ending at `as_of`.
///
/// Duplicate dates count once. Returns 0 for no completions.
pub fn compute_streak(completions: &[NaiveDate], as_of: NaiveDate, policy: FutureCompletions) -> u32 {
    let unique: BTreeSet<NaiveDate> = completions
        .iter()
        .copied()
        .filter(|d| policy == FutureCompletions::Count || *d <= as_of)
        .collect();

    let mut streak = 0;
    let mut cursor = as_of;
    for date in unique.into_iter().rev() {
        if (cursor - date).num_days() <= 1 {
            streak += 1;
            cursor = date;
        } else {
            break;
        }
    }
    streak
}
