//! Dated to-do items.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Points awarded when a task is checked off.
pub const TASK_POINTS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    pub created: NaiveDate,
}

impl Task {
    pub fn from_draft(draft: TaskDraft, created: NaiveDate) -> Self {
        Self {
            id: draft.id.unwrap_or_else(super::new_id),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            priority: draft.priority,
            category: draft.category,
            completed: false,
            created,
        }
    }

    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.date = draft.date;
        self.priority = draft.priority;
        self.category = draft.category;
    }
}

#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub priority: Priority,
    pub category: String,
}

/// Task list window, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    /// Same Sunday-started week as today.
    Week,
    Month,
}

impl TaskFilter {
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task.date == today,
            TaskFilter::Week => week_start(task.date) == week_start(today),
            TaskFilter::Month => {
                task.date.year() == today.year() && task.date.month() == today.month()
            }
        }
    }

    /// Matching tasks ordered by date.
    pub fn apply<'a>(self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        let mut out: Vec<&Task> = tasks.iter().filter(|t| self.matches(t, today)).collect();
        out.sort_by_key(|t| t.date);
        out
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(TaskFilter::All),
            "today" => Ok(TaskFilter::Today),
            "week" => Ok(TaskFilter::Week),
            "month" => Ok(TaskFilter::Month),
            other => Err(format!("unknown task filter: {other}")),
        }
    }
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - chrono::Duration::days(offset)
}

/// Tasks shown per calendar day before collapsing into a "+N more" count.
pub const CALENDAR_TASKS_SHOWN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarTask {
    pub id: String,
    pub title: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub is_today: bool,
    pub tasks: Vec<CalendarTask>,
    /// Tasks on this day beyond the first [`CALENDAR_TASKS_SHOWN`].
    pub more: usize,
}

/// One month of tasks laid out on a Sunday-started grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCalendar {
    /// e.g. "May 2024"
    pub title: String,
    /// Empty cells before the 1st, so it lands under its weekday.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

/// The calendar for the month containing `today`.
pub fn task_calendar(tasks: &[Task], today: NaiveDate) -> TaskCalendar {
    let first = today.with_day(1).unwrap_or(today);
    let days = first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .map(|date| {
            let on_day: Vec<&Task> = tasks.iter().filter(|t| t.date == date).collect();
            CalendarDay {
                date,
                day: date.day(),
                is_today: date == today,
                tasks: on_day
                    .iter()
                    .take(CALENDAR_TASKS_SHOWN)
                    .map(|t| CalendarTask {
                        id: t.id.clone(),
                        title: t.title.clone(),
                        priority: t.priority,
                    })
                    .collect(),
                more: on_day.len().saturating_sub(CALENDAR_TASKS_SHOWN),
            }
        })
        .collect();

    TaskCalendar {
        title: first.format("%B %Y").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    }
}
