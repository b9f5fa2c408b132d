use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single user profile: points, level and unlocked achievements.
///
/// `level` only ever goes up (see [`crate::engine::level::update_level`]),
/// so after points are taken back it can exceed what `total_points` implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub level: u32,
    pub total_points: i64,
    pub join_date: NaiveDate,
    /// Unlocked achievement ids, in unlock order. Append-only.
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl User {
    pub fn new(join_date: NaiveDate) -> Self {
        Self {
            level: 1,
            total_points: 0,
            join_date,
            achievements: Vec::new(),
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }
}

impl Default for User {
    fn default() -> Self {
        User::new(super::local_today())
    }
}
