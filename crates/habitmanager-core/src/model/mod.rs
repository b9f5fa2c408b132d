//! Stored entity types: habits, goals, tasks, moods and the user profile.

pub mod goal;
pub mod habit;
pub mod mood;
pub(crate) mod serde_ext;
pub mod task;
pub mod user;

pub use goal::{
    youtube_video_id, Attachment, Goal, GoalDraft, GoalFilter, GoalKind, GOAL_POINTS,
};
pub use habit::{Difficulty, Habit, HabitDraft, HabitFilter};
pub use mood::Mood;
pub use serde_ext::parse_hhmm;
pub use task::{
    task_calendar, CalendarDay, CalendarTask, Priority, Task, TaskCalendar, TaskDraft, TaskFilter,
    TASK_POINTS,
};
pub use user::User;

use chrono::NaiveDate;

/// Fresh entity identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Today's date on the local calendar. Completions are bucketed by this,
/// never by UTC timestamp.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
