//! Habits: recurring activities completed at most once per day.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::serde_ext;
use crate::engine::streak::{compute_streak, FutureCompletions};

/// How hard a habit is. Drives the points awarded per completion.
///
/// Unknown strings in stored documents read as [`Difficulty::Other`], which
/// scores like `medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Other,
}

impl Difficulty {
    /// Points awarded for a regular (non photo-proof) completion.
    pub fn points(self) -> i64 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
            Difficulty::Other => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other => "other",
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_target() -> String {
    "daily".to_string()
}

fn default_created() -> NaiveDate {
    super::local_today()
}

/// A tracked habit.
///
/// `streak` is a cache of [`compute_streak`] over `completions` and is
/// refreshed on every mutation and on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completions: Vec<NaiveDate>,
    #[serde(default)]
    pub points: i64,
    #[serde(default = "default_created")]
    pub created: NaiveDate,
    #[serde(default, with = "serde_ext::opt_hhmm")]
    pub reminder_time: Option<NaiveTime>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub requires_photo: bool,
    /// Photo payload (data URL) keyed by completion date.
    #[serde(default)]
    pub proof_photos: BTreeMap<NaiveDate, String>,
}

impl Habit {
    /// Create a habit from user input, with a fresh id unless `draft.id` is set.
    pub fn from_draft(draft: HabitDraft, created: NaiveDate) -> Self {
        Self {
            id: draft.id.unwrap_or_else(super::new_id),
            name: draft.name,
            category: draft.category,
            difficulty: draft.difficulty,
            description: draft.description,
            target: draft.target,
            streak: 0,
            completions: Vec::new(),
            points: 0,
            created,
            reminder_time: draft.reminder_time,
            dependencies: draft.dependencies,
            requires_photo: draft.requires_photo,
            proof_photos: BTreeMap::new(),
        }
    }

    /// Replace the user-editable fields, keeping history intact.
    pub fn apply_draft(&mut self, draft: HabitDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.difficulty = draft.difficulty;
        self.description = draft.description;
        self.target = draft.target;
        self.reminder_time = draft.reminder_time;
        self.dependencies = draft.dependencies;
        self.requires_photo = draft.requires_photo;
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completions.contains(&date)
    }

    /// Record a completion. Returns `false` if the date was already present.
    pub fn record_completion(&mut self, date: NaiveDate) -> bool {
        if self.is_completed_on(date) {
            return false;
        }
        self.completions.push(date);
        true
    }

    /// Drop duplicate completion dates, keeping first occurrences.
    pub fn dedup_completions(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.completions.retain(|d| seen.insert(*d));
    }

    pub fn current_streak(&self, as_of: NaiveDate, policy: FutureCompletions) -> u32 {
        compute_streak(&self.completions, as_of, policy)
    }

    pub fn refresh_streak(&mut self, as_of: NaiveDate, policy: FutureCompletions) {
        self.streak = self.current_streak(as_of, policy);
    }
}

/// User input for creating or editing a habit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitDraft {
    /// Existing id when editing.
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub target: String,
    pub reminder_time: Option<NaiveTime>,
    pub dependencies: Vec<String>,
    pub requires_photo: bool,
}

impl HabitDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: "health".to_string(),
            target: default_target(),
            ..Default::default()
        }
    }
}

/// Habit list filter. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct HabitFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
}

impl HabitFilter {
    pub fn matches(&self, habit: &Habit) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| c.is_empty() || habit.category == c);
        let difficulty_ok = self.difficulty.map_or(true, |d| habit.difficulty == d);
        let search_ok = self.search.as_deref().map_or(true, |s| {
            s.is_empty() || habit.name.to_lowercase().contains(&s.to_lowercase())
        });
        category_ok && difficulty_ok && search_ok
    }

    pub fn apply<'a>(&self, habits: &'a [Habit]) -> Vec<&'a Habit> {
        habits.iter().filter(|h| self.matches(h)).collect()
    }
}
