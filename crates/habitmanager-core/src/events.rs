use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerState};

/// Every user-visible state change produces an Event.
/// The CLI prints them; callers may also log or forward them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCompleted {
        habit_id: String,
        date: NaiveDate,
        points: i64,
        streak: u32,
        with_proof: bool,
        at: DateTime<Utc>,
    },
    /// Completion is waiting on a photo.
    ProofRequested {
        habit_id: String,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: String,
        title: String,
        points: i64,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    GoalToggled {
        goal_id: String,
        completed: bool,
        delta: i64,
        at: DateTime<Utc>,
    },
    TaskToggled {
        task_id: String,
        completed: bool,
        delta: i64,
        at: DateTime<Utc>,
    },
    HabitSaved {
        habit_id: String,
        created: bool,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        habit_id: String,
        at: DateTime<Utc>,
    },
    GoalSaved {
        goal_id: String,
        created: bool,
        at: DateTime<Utc>,
    },
    GoalDeleted {
        goal_id: String,
        at: DateTime<Utc>,
    },
    TaskSaved {
        task_id: String,
        created: bool,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    MoodRecorded {
        date: NaiveDate,
        mood: u8,
        at: DateTime<Utc>,
    },
    TemplateApplied {
        template: String,
        habit_ids: Vec<String>,
        at: DateTime<Utc>,
    },
    DataImported {
        habits: usize,
        goals: usize,
        tasks: usize,
        at: DateTime<Utc>,
    },
    DataReset {
        at: DateTime<Utc>,
    },
    FocusSessionAwarded {
        points: i64,
        total_points: i64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A phase ran out; the timer stopped with `next` loaded.
    PhaseCompleted {
        phase: Phase,
        next: Phase,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        phase: Phase,
        remaining_secs: u32,
        total_secs: u32,
        display: String,
        at: DateTime<Utc>,
    },
    ReminderDue {
        habit_id: String,
        name: String,
        time: NaiveTime,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let ev = Event::LevelUp {
            level: 3,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "LevelUp");
        assert_eq!(json["level"], 3);
    }

    #[test]
    fn events_round_trip() {
        let ev = Event::PhaseCompleted {
            phase: Phase::Work,
            next: Phase::Break,
            at: Utc::now(),
        };
        let text = serde_json::to_string(&ev).unwrap();
        let back: Event = serde_json::from_str(&text).unwrap();
        assert_eq!(back, ev);
    }
}
