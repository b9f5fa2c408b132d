//! Daily habit reminders.
//!
//! A reminder fires when the wall clock's `HH:MM` equals a habit's
//! `reminder_time` and the habit is still open for the day. Each habit fires
//! at most once per date, so polling more than once a minute is harmless.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::events::Event;
use crate::model::Habit;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub habit_id: String,
    pub name: String,
    pub time: NaiveTime,
}

impl Reminder {
    pub fn message(&self) -> String {
        format!("Time to: {}", self.name)
    }

    pub fn to_event(&self) -> Event {
        Event::ReminderDue {
            habit_id: self.habit_id.clone(),
            name: self.name.clone(),
            time: self.time,
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReminderScheduler {
    fired: HashSet<(String, NaiveDate)>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reminders due at `now`, marking each as fired for the day.
    pub fn due(&mut self, habits: &[Habit], now: NaiveDateTime) -> Vec<Reminder> {
        let today = now.date();
        let (hour, minute) = (now.hour(), now.minute());
        self.fired.retain(|(_, date)| *date == today);

        let mut due = Vec::new();
        for habit in habits {
            let Some(time) = habit.reminder_time else {
                continue;
            };
            if time.hour() != hour || time.minute() != minute {
                continue;
            }
            if habit.is_completed_on(today) {
                continue;
            }
            if !self.fired.insert((habit.id.clone(), today)) {
                continue;
            }
            tracing::debug!(habit = %habit.id, %time, "reminder due");
            due.push(Reminder {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                time,
            });
        }
        due
    }
}
