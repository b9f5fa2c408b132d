//! In-memory entity collections, loaded from and saved to a [`DocumentStore`].
//!
//! Each collection is one named document. Reads degrade to the empty
//! default with a warning; writes report failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

use crate::engine::streak::FutureCompletions;
use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::model::{Goal, GoalDraft, Habit, HabitDraft, Mood, Task, TaskDraft, User};
use crate::storage::DocumentStore;

/// Named documents in the storage gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKey {
    Habits,
    Goals,
    Tasks,
    User,
    Moods,
}

impl DocKey {
    pub const ALL: [DocKey; 5] = [
        DocKey::Habits,
        DocKey::Goals,
        DocKey::Tasks,
        DocKey::User,
        DocKey::Moods,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocKey::Habits => "habits",
            DocKey::Goals => "goals",
            DocKey::Tasks => "tasks",
            DocKey::User => "user",
            DocKey::Moods => "moods",
        }
    }
}

/// All user data. The single owner of every collection.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub habits: Vec<Habit>,
    pub goals: Vec<Goal>,
    pub tasks: Vec<Task>,
    pub moods: Vec<Mood>,
    pub user: User,
}

impl EntityStore {
    /// Empty store for a first run.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            user: User::new(today),
            ..Default::default()
        }
    }

    /// Load every collection. Missing or unreadable documents yield empty
    /// collections (and a new profile joined `today`).
    pub fn load(gateway: &dyn DocumentStore, today: NaiveDate, policy: FutureCompletions) -> Self {
        let mut store = Self {
            habits: load_document(gateway, DocKey::Habits).unwrap_or_default(),
            goals: load_document(gateway, DocKey::Goals).unwrap_or_default(),
            tasks: load_document(gateway, DocKey::Tasks).unwrap_or_default(),
            moods: load_document(gateway, DocKey::Moods).unwrap_or_default(),
            user: load_document(gateway, DocKey::User).unwrap_or_else(|| User::new(today)),
        };
        for habit in &mut store.habits {
            habit.dedup_completions();
        }
        store.refresh_streaks(today, policy);
        tracing::debug!(
            habits = store.habits.len(),
            goals = store.goals.len(),
            tasks = store.tasks.len(),
            moods = store.moods.len(),
            "store loaded"
        );
        store
    }

    /// Write the given documents in one gateway transaction.
    pub fn persist(&self, gateway: &mut dyn DocumentStore, keys: &[DocKey]) -> Result<(), StorageError> {
        let mut docs = Vec::with_capacity(keys.len());
        for key in keys {
            docs.push((key.as_str(), self.document(*key)?));
        }
        gateway.set_many(&docs)?;
        tracing::debug!(keys = ?keys, "documents persisted");
        Ok(())
    }

    pub fn document(&self, key: DocKey) -> Result<serde_json::Value, StorageError> {
        let encoded = match key {
            DocKey::Habits => serde_json::to_value(&self.habits),
            DocKey::Goals => serde_json::to_value(&self.goals),
            DocKey::Tasks => serde_json::to_value(&self.tasks),
            DocKey::User => serde_json::to_value(&self.user),
            DocKey::Moods => serde_json::to_value(&self.moods),
        };
        encoded.map_err(|source| StorageError::Serialize {
            key: key.as_str().to_string(),
            source,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn habit_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn total_completions(&self) -> usize {
        self.habits.iter().map(|h| h.completions.len()).sum()
    }

    pub fn mood_on(&self, date: NaiveDate) -> Option<&Mood> {
        self.moods.iter().find(|m| m.date == date)
    }

    /// Recompute every cached streak against `today`.
    pub fn refresh_streaks(&mut self, today: NaiveDate, policy: FutureCompletions) {
        for habit in &mut self.habits {
            habit.refresh_streak(today, policy);
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a habit, or edit the one whose id matches `draft.id`.
    ///
    /// New dependencies must name existing habits. With `reject_cycles`, a
    /// dependency set that would make a habit (transitively) depend on
    /// itself is refused.
    pub fn save_habit(
        &mut self,
        draft: HabitDraft,
        today: NaiveDate,
        reject_cycles: bool,
    ) -> Result<&Habit> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        let mut draft = draft;
        let mut seen = HashSet::new();
        draft.dependencies.retain(|d| !d.is_empty() && seen.insert(d.clone()));

        let existing = draft.id.as_deref().and_then(|id| self.position_of_habit(id));
        let self_id = draft.id.clone();
        // Dangling ids already on the habit survive an edit; only new ones must exist.
        let kept: &[String] = match existing {
            Some(index) => &self.habits[index].dependencies,
            None => &[],
        };
        for dep in &draft.dependencies {
            if self.habit(dep).is_none()
                && self_id.as_deref() != Some(dep.as_str())
                && !kept.contains(dep)
            {
                return Err(ValidationError::UnknownDependency(dep.clone()).into());
            }
        }

        let index = match existing {
            Some(index) => {
                let previous = self.habits[index].clone();
                self.habits[index].apply_draft(draft);
                if reject_cycles {
                    if let Some(path) = self.dependency_cycle(&self.habits[index].id) {
                        self.habits[index] = previous;
                        return Err(ValidationError::DependencyCycle { path }.into());
                    }
                }
                index
            }
            None => {
                let habit = Habit::from_draft(draft, today);
                if reject_cycles && habit.dependencies.contains(&habit.id) {
                    return Err(ValidationError::DependencyCycle {
                        path: vec![habit.id.clone(), habit.id.clone()],
                    }
                    .into());
                }
                self.habits.push(habit);
                self.habits.len() - 1
            }
        };
        let habit = &self.habits[index];
        tracing::info!(id = %habit.id, name = %habit.name, "habit saved");
        Ok(habit)
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<Habit> {
        let index = self.position_of_habit(id).ok_or_else(|| not_found("Habit", id))?;
        tracing::info!(id, "habit deleted");
        Ok(self.habits.remove(index))
    }

    pub fn save_goal(&mut self, draft: GoalDraft, today: NaiveDate) -> Result<&Goal> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        let existing = draft
            .id
            .as_deref()
            .and_then(|id| self.goals.iter().position(|g| g.id == id));
        let index = match existing {
            Some(index) => {
                self.goals[index].apply_draft(draft);
                index
            }
            None => {
                self.goals.push(Goal::from_draft(draft, today));
                self.goals.len() - 1
            }
        };
        tracing::info!(id = %self.goals[index].id, "goal saved");
        Ok(&self.goals[index])
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| not_found("Goal", id))?;
        tracing::info!(id, "goal deleted");
        Ok(self.goals.remove(index))
    }

    pub fn save_task(&mut self, draft: TaskDraft, today: NaiveDate) -> Result<&Task> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        let existing = draft
            .id
            .as_deref()
            .and_then(|id| self.tasks.iter().position(|t| t.id == id));
        let index = match existing {
            Some(index) => {
                self.tasks[index].apply_draft(draft);
                index
            }
            None => {
                self.tasks.push(Task::from_draft(draft, today));
                self.tasks.len() - 1
            }
        };
        tracing::info!(id = %self.tasks[index].id, "task saved");
        Ok(&self.tasks[index])
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found("Task", id))?;
        tracing::info!(id, "task deleted");
        Ok(self.tasks.remove(index))
    }

    /// Record today's mood, replacing any earlier entry for the same day.
    pub fn record_mood(&mut self, score: i64, today: NaiveDate, now: DateTime<Utc>) -> Result<&Mood> {
        let mood = Mood::new(today, score, now)?;
        self.moods.retain(|m| m.date != today);
        self.moods.push(mood);
        tracing::info!(score, %today, "mood recorded");
        Ok(&self.moods[self.moods.len() - 1])
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn position_of_habit(&self, id: &str) -> Option<usize> {
        self.habits.iter().position(|h| h.id == id)
    }

    /// A dependency path from `start` back to itself, if one exists.
    fn dependency_cycle(&self, start: &str) -> Option<Vec<String>> {
        fn walk(
            store: &EntityStore,
            current: &str,
            start: &str,
            path: &mut Vec<String>,
            visited: &mut HashSet<String>,
        ) -> bool {
            let Some(habit) = store.habit(current) else {
                return false;
            };
            for dep in &habit.dependencies {
                if dep == start {
                    path.push(dep.clone());
                    return true;
                }
                if visited.insert(dep.clone()) {
                    path.push(dep.clone());
                    if walk(store, dep, start, path, visited) {
                        return true;
                    }
                    path.pop();
                }
            }
            false
        }

        let mut path = vec![start.to_string()];
        let mut visited = HashSet::new();
        walk(self, start, start, &mut path, &mut visited).then_some(path)
    }
}

fn not_found(kind: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn load_document<T: DeserializeOwned>(gateway: &dyn DocumentStore, key: DocKey) -> Option<T> {
    let value = match gateway.get(key.as_str()) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = key.as_str(), error = %e, "failed to read document, using default");
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(key = key.as_str(), error = %e, "unreadable document, using default");
            None
        }
    }
}
