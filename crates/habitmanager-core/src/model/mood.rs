use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MOOD_MIN: u8 = 1;
pub const MOOD_MAX: u8 = 5;

/// Self-reported mood for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub date: NaiveDate,
    pub mood: u8,
    pub timestamp: DateTime<Utc>,
}

impl Mood {
    pub fn new(date: NaiveDate, score: i64, timestamp: DateTime<Utc>) -> Result<Self, ValidationError> {
        if !(MOOD_MIN as i64..=MOOD_MAX as i64).contains(&score) {
            return Err(ValidationError::MoodOutOfRange(score));
        }
        Ok(Self {
            date,
            mood: score as u8,
            timestamp,
        })
    }
}

/// Mean score of the most recent `window` entries, or `None` when empty.
pub fn recent_average(moods: &[Mood], window: usize) -> Option<f64> {
    let start = moods.len().saturating_sub(window);
    let recent = &moods[start..];
    if recent.is_empty() {
        return None;
    }
    let sum: u32 = recent.iter().map(|m| m.mood as u32).sum();
    Some(sum as f64 / recent.len() as f64)
}
