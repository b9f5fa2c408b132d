//! Dashboard projections: progress rings, insight messages and the summary
//! card.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::aggregates::{completion_rate_pct, longest_streak, total_completions};
use crate::model::mood::recent_average;
use crate::model::task::week_start;
use crate::model::Habit;
use crate::store::EntityStore;

/// Moods averaged for insights.
pub const MOOD_WINDOW: usize = 7;

/// Percentage of habits with at least one completion in each window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressRings {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Suggestion,
    Celebration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub average_mood: Option<f64>,
    /// Share of habits done today, 0..=100.
    pub today_rate: f64,
    pub messages: Vec<Insight>,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub level: u32,
    pub total_points: i64,
    pub longest_streak: u32,
    pub total_completions: usize,
    pub completion_rate_pct: u32,
    pub today_completed: usize,
    pub today_total: usize,
    pub achievements_unlocked: usize,
}

fn share_completed_since(habits: &[Habit], since: NaiveDate) -> f64 {
    if habits.is_empty() {
        return 0.0;
    }
    let done = habits
        .iter()
        .filter(|h| h.completions.iter().any(|d| *d >= since))
        .count();
    done as f64 / habits.len() as f64 * 100.0
}

fn completed_today(habits: &[Habit], today: NaiveDate) -> usize {
    habits.iter().filter(|h| h.is_completed_on(today)).count()
}

pub fn progress_rings(habits: &[Habit], today: NaiveDate) -> ProgressRings {
    let month_start = today.with_day(1).unwrap_or(today);
    let daily = if habits.is_empty() {
        0.0
    } else {
        completed_today(habits, today) as f64 / habits.len() as f64 * 100.0
    };
    ProgressRings {
        daily,
        weekly: share_completed_since(habits, week_start(today)),
        monthly: share_completed_since(habits, month_start),
    }
}

pub fn insights(store: &EntityStore, today: NaiveDate) -> Insights {
    let average_mood = recent_average(&store.moods, MOOD_WINDOW);
    let today_rate = progress_rings(&store.habits, today).daily;
    let mut messages = Vec::new();

    match average_mood {
        Some(avg) if avg >= 4.0 => messages.push(Insight {
            kind: InsightKind::Positive,
            text: "Your mood has been excellent! Keep up the great work.",
        }),
        Some(avg) if avg <= 2.0 => messages.push(Insight {
            kind: InsightKind::Suggestion,
            text: "Consider adding more mindfulness habits to improve your mood.",
        }),
        _ => {}
    }

    if longest_streak(&store.habits) >= 21 {
        messages.push(Insight {
            kind: InsightKind::Celebration,
            text: "Amazing! You've built a strong habit foundation.",
        });
    }

    if !store.habits.is_empty() && completed_today(&store.habits, today) == store.habits.len() {
        messages.push(Insight {
            kind: InsightKind::Celebration,
            text: "Perfect day! All habits completed.",
        });
    } else if today_rate >= 75.0 {
        messages.push(Insight {
            kind: InsightKind::Positive,
            text: "Great progress today! You're on track.",
        });
    }

    let score = (average_mood.unwrap_or(0.0) * 20.0 + today_rate * 0.8).round() as i64;
    tracing::debug!(?average_mood, today_rate, score, "insights derived");

    Insights {
        average_mood,
        today_rate,
        messages,
        score,
    }
}

pub fn dashboard(store: &EntityStore, today: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        level: store.user.level,
        total_points: store.user.total_points,
        longest_streak: longest_streak(&store.habits),
        total_completions: total_completions(&store.habits),
        completion_rate_pct: completion_rate_pct(&store.habits, store.user.join_date, today),
        today_completed: completed_today(&store.habits, today),
        today_total: store.habits.len(),
        achievements_unlocked: store.user.achievements.len(),
    }
}
