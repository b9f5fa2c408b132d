//! The `HabitManager` facade: every user action in one place.
//!
//! Each action mutates the in-memory [`EntityStore`], persists the touched
//! documents in a single gateway write and returns the resulting events with
//! a fresh dashboard summary. When the write fails the store is restored to
//! its state before the action, so memory never runs ahead of storage.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::backup::Backup;
use crate::engine::{self, CompletionOutcome, CompletionReport, PendingProof, PointsDelta};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::model::{Attachment, Goal, GoalDraft, Habit, HabitDraft, Mood, Task, TaskDraft};
use crate::stats::{self, DashboardSummary};
use crate::storage::{Config, DocumentStore, SqliteStore};
use crate::store::{DocKey, EntityStore};
use crate::templates::find_template;
use crate::timer::{Phase, PomodoroTimer};

/// Gateway key of the persisted focus timer.
pub const TIMER_KEY: &str = "timer";

/// What an action produced, plus the dashboard as it stands afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome<T = ()> {
    pub result: T,
    pub events: Vec<Event>,
    pub summary: DashboardSummary,
}

/// Result of a mutation closure run by [`HabitManager::transact`].
struct Applied<T> {
    value: T,
    events: Vec<Event>,
    persist: bool,
}

impl<T> Applied<T> {
    fn changed(value: T, events: Vec<Event>) -> Self {
        Self {
            value,
            events,
            persist: true,
        }
    }

    fn unchanged(value: T, events: Vec<Event>) -> Self {
        Self {
            value,
            events,
            persist: false,
        }
    }
}

pub struct HabitManager {
    gateway: Box<dyn DocumentStore>,
    config: Config,
    store: EntityStore,
    today: NaiveDate,
}

impl HabitManager {
    /// Load the store from `gateway` as of `today`.
    pub fn open(gateway: Box<dyn DocumentStore>, config: Config, today: NaiveDate) -> Self {
        let store = EntityStore::load(gateway.as_ref(), today, config.future_completions());
        Self {
            gateway,
            config,
            store,
            today,
        }
    }

    /// Open the on-disk database with the on-disk configuration.
    pub fn open_default(today: NaiveDate) -> Result<Self> {
        let config = Config::load_or_default();
        let gateway = SqliteStore::open()?;
        Ok(Self::open(Box::new(gateway), config, today))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn summary(&self) -> DashboardSummary {
        stats::dashboard(&self.store, self.today)
    }

    /// Move the clock, recomputing streaks against the new day.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.store
            .refresh_streaks(today, self.config.future_completions());
    }

    /// Encode a file for a goal or photo proof under the configured ceiling.
    pub fn attachment(&self, name: &str, mime_type: &str, bytes: &[u8]) -> Result<Attachment> {
        Attachment::from_bytes(name, mime_type, bytes, self.config.attachments.max_bytes)
    }

    // ── Habit completion ─────────────────────────────────────────────

    pub fn complete_habit(&mut self, habit_id: &str) -> Result<ActionOutcome<CompletionOutcome>> {
        let policy = self.config.future_completions();
        self.transact(&[DocKey::Habits, DocKey::User], |store, today| {
            let outcome = engine::complete_habit(store, habit_id, today, policy)?;
            let events = match &outcome {
                CompletionOutcome::Completed(report) => completion_events(report),
                CompletionOutcome::NeedsProof(pending) => vec![Event::ProofRequested {
                    habit_id: pending.habit_id.clone(),
                    date: pending.date,
                    at: Utc::now(),
                }],
            };
            Ok(if matches!(outcome, CompletionOutcome::Completed(_)) {
                Applied::changed(outcome, events)
            } else {
                Applied::unchanged(outcome, events)
            })
        })
    }

    /// Finish a completion suspended for photo proof.
    pub fn complete_with_proof(
        &mut self,
        pending: &PendingProof,
        photo: &Attachment,
    ) -> Result<ActionOutcome<CompletionReport>> {
        let size = photo.decode()?.len() as u64;
        let limit = self.config.attachments.max_bytes;
        if size > limit {
            return Err(CoreError::FileTooLarge { size, limit });
        }
        let policy = self.config.future_completions();
        self.transact(&[DocKey::Habits, DocKey::User], |store, _| {
            let report = engine::complete_with_proof(store, pending, photo.data.clone(), policy)?;
            let events = completion_events(&report);
            Ok(Applied::changed(report, events))
        })
    }

    // ── Goals and tasks ──────────────────────────────────────────────

    pub fn toggle_goal(&mut self, goal_id: &str) -> Result<ActionOutcome<PointsDelta>> {
        self.transact(&[DocKey::Goals, DocKey::User], |store, _| {
            let delta = engine::toggle_goal(store, goal_id)?;
            let mut events = vec![Event::GoalToggled {
                goal_id: delta.id.clone(),
                completed: delta.completed,
                delta: delta.delta,
                at: Utc::now(),
            }];
            events.extend(level_event(delta.level_up));
            Ok(Applied::changed(delta, events))
        })
    }

    pub fn toggle_task(&mut self, task_id: &str) -> Result<ActionOutcome<PointsDelta>> {
        self.transact(&[DocKey::Tasks, DocKey::User], |store, _| {
            let delta = engine::toggle_task(store, task_id)?;
            let mut events = vec![Event::TaskToggled {
                task_id: delta.id.clone(),
                completed: delta.completed,
                delta: delta.delta,
                at: Utc::now(),
            }];
            events.extend(level_event(delta.level_up));
            Ok(Applied::changed(delta, events))
        })
    }

    // ── Create / edit / delete ───────────────────────────────────────

    pub fn save_habit(&mut self, draft: HabitDraft) -> Result<ActionOutcome<Habit>> {
        let reject_cycles = self.config.habits.reject_dependency_cycles;
        self.transact(&[DocKey::Habits], |store, today| {
            let created = draft.id.as_deref().and_then(|id| store.habit(id)).is_none();
            let habit = store.save_habit(draft, today, reject_cycles)?.clone();
            let events = vec![Event::HabitSaved {
                habit_id: habit.id.clone(),
                created,
                at: Utc::now(),
            }];
            Ok(Applied::changed(habit, events))
        })
    }

    pub fn delete_habit(&mut self, habit_id: &str) -> Result<ActionOutcome<Habit>> {
        self.transact(&[DocKey::Habits], |store, _| {
            let habit = store.delete_habit(habit_id)?;
            let events = vec![Event::HabitDeleted {
                habit_id: habit.id.clone(),
                at: Utc::now(),
            }];
            Ok(Applied::changed(habit, events))
        })
    }

    pub fn save_goal(&mut self, draft: GoalDraft) -> Result<ActionOutcome<Goal>> {
        self.transact(&[DocKey::Goals], |store, today| {
            let created = draft.id.as_deref().and_then(|id| store.goal(id)).is_none();
            let goal = store.save_goal(draft, today)?.clone();
            let events = vec![Event::GoalSaved {
                goal_id: goal.id.clone(),
                created,
                at: Utc::now(),
            }];
            Ok(Applied::changed(goal, events))
        })
    }

    pub fn delete_goal(&mut self, goal_id: &str) -> Result<ActionOutcome<Goal>> {
        self.transact(&[DocKey::Goals], |store, _| {
            let goal = store.delete_goal(goal_id)?;
            let events = vec![Event::GoalDeleted {
                goal_id: goal.id.clone(),
                at: Utc::now(),
            }];
            Ok(Applied::changed(goal, events))
        })
    }

    pub fn save_task(&mut self, draft: TaskDraft) -> Result<ActionOutcome<Task>> {
        self.transact(&[DocKey::Tasks], |store, today| {
            let created = draft.id.as_deref().and_then(|id| store.task(id)).is_none();
            let task = store.save_task(draft, today)?.clone();
            let events = vec![Event::TaskSaved {
                task_id: task.id.clone(),
                created,
                at: Utc::now(),
            }];
            Ok(Applied::changed(task, events))
        })
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<ActionOutcome<Task>> {
        self.transact(&[DocKey::Tasks], |store, _| {
            let task = store.delete_task(task_id)?;
            let events = vec![Event::TaskDeleted {
                task_id: task.id.clone(),
                at: Utc::now(),
            }];
            Ok(Applied::changed(task, events))
        })
    }

    pub fn record_mood(&mut self, score: i64, now: DateTime<Utc>) -> Result<ActionOutcome<Mood>> {
        self.transact(&[DocKey::Moods], |store, today| {
            let mood = store.record_mood(score, today, now)?.clone();
            let events = vec![Event::MoodRecorded {
                date: mood.date,
                mood: mood.mood,
                at: now,
            }];
            Ok(Applied::changed(mood, events))
        })
    }

    /// Add every habit of a built-in template.
    pub fn apply_template(&mut self, template_id: &str) -> Result<ActionOutcome<Vec<Habit>>> {
        let template = find_template(template_id).ok_or_else(|| CoreError::NotFound {
            kind: "Template",
            id: template_id.to_string(),
        })?;
        let reject_cycles = self.config.habits.reject_dependency_cycles;
        self.transact(&[DocKey::Habits], |store, today| {
            let mut habits = Vec::with_capacity(template.habits.len());
            for draft in template.drafts() {
                habits.push(store.save_habit(draft, today, reject_cycles)?.clone());
            }
            let events = vec![Event::TemplateApplied {
                template: template.id.to_string(),
                habit_ids: habits.iter().map(|h| h.id.clone()).collect(),
                at: Utc::now(),
            }];
            Ok(Applied::changed(habits, events))
        })
    }

    // ── Whole-store operations ───────────────────────────────────────

    pub fn export(&self, exported_at: DateTime<Utc>) -> ActionOutcome<Backup> {
        ActionOutcome {
            result: Backup::from_store(&self.store, exported_at),
            events: Vec::new(),
            summary: self.summary(),
        }
    }

    /// Replace the store with a backup document. Nothing changes unless the
    /// whole document validates and the write succeeds.
    pub fn import(&mut self, doc: Value) -> Result<ActionOutcome> {
        let backup = Backup::from_value(doc)?;
        let policy = self.config.future_completions();
        self.transact(&DocKey::ALL, |store, today| {
            backup.apply_to(store);
            store.refresh_streaks(today, policy);
            let events = vec![Event::DataImported {
                habits: store.habits.len(),
                goals: store.goals.len(),
                tasks: store.tasks.len(),
                at: Utc::now(),
            }];
            Ok(Applied::changed((), events))
        })
    }

    /// Drop all data and start a new profile joined today.
    pub fn reset(&mut self) -> Result<ActionOutcome> {
        let outcome = self.transact(&DocKey::ALL, |store, today| {
            *store = EntityStore::fresh(today);
            Ok(Applied::changed((), vec![Event::DataReset { at: Utc::now() }]))
        })?;
        self.gateway.remove(TIMER_KEY)?;
        Ok(outcome)
    }

    /// Credit a finished focus session.
    pub fn award_focus_session(&mut self) -> Result<ActionOutcome> {
        let points = self.config.timer.focus_points;
        self.transact(&[DocKey::User], |store, _| {
            store.user.total_points = store.user.total_points.saturating_add(points);
            let mut events = vec![Event::FocusSessionAwarded {
                points,
                total_points: store.user.total_points,
                at: Utc::now(),
            }];
            events.extend(level_event(engine::update_level(&mut store.user)));
            Ok(Applied::changed((), events))
        })
    }

    // ── Focus timer ──────────────────────────────────────────────────

    /// The persisted timer, or a fresh one from config.
    pub fn load_timer(&self) -> PomodoroTimer {
        match self.gateway.get(TIMER_KEY) {
            Ok(Some(doc)) => serde_json::from_value(doc).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored timer unreadable, starting fresh");
                PomodoroTimer::from_config(&self.config.timer)
            }),
            Ok(None) => PomodoroTimer::from_config(&self.config.timer),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read timer");
                PomodoroTimer::from_config(&self.config.timer)
            }
        }
    }

    pub fn save_timer(&mut self, timer: &PomodoroTimer) -> Result<()> {
        let doc = serde_json::to_value(timer)?;
        self.gateway.set(TIMER_KEY, &doc)?;
        Ok(())
    }

    /// Settle a timer event: a finished work phase earns focus points.
    pub fn on_timer_event(&mut self, event: &Event) -> Result<Option<ActionOutcome>> {
        match event {
            Event::PhaseCompleted {
                phase: Phase::Work, ..
            } => self.award_focus_session().map(Some),
            _ => Ok(None),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Run `action` against the store and persist `keys`, restoring the
    /// previous store if either step fails.
    fn transact<T>(
        &mut self,
        keys: &[DocKey],
        action: impl FnOnce(&mut EntityStore, NaiveDate) -> Result<Applied<T>>,
    ) -> Result<ActionOutcome<T>> {
        let snapshot = self.store.clone();
        let applied = match action(&mut self.store, self.today) {
            Ok(applied) => applied,
            Err(e) => {
                self.store = snapshot;
                return Err(e);
            }
        };
        if applied.persist {
            if let Err(e) = self.store.persist(self.gateway.as_mut(), keys) {
                tracing::warn!(error = %e, "write failed, rolling back");
                self.store = snapshot;
                return Err(e.into());
            }
        }
        Ok(ActionOutcome {
            result: applied.value,
            events: applied.events,
            summary: self.summary(),
        })
    }
}

fn level_event(level_up: Option<u32>) -> Option<Event> {
    level_up.map(|level| Event::LevelUp {
        level,
        at: Utc::now(),
    })
}

fn completion_events(report: &CompletionReport) -> Vec<Event> {
    let at = Utc::now();
    let mut events = vec![Event::HabitCompleted {
        habit_id: report.habit_id.clone(),
        date: report.date,
        points: report.points_awarded,
        streak: report.streak,
        with_proof: report.with_proof,
        at,
    }];
    events.extend(report.unlocked.iter().map(|a| Event::AchievementUnlocked {
        id: a.id.to_string(),
        title: a.title.to_string(),
        points: a.points,
        at,
    }));
    events.extend(level_event(report.level_up));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HabitError, StorageError};
    use crate::storage::MemoryStore;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn manager() -> HabitManager {
        HabitManager::open(Box::new(MemoryStore::new()), Config::default(), d("2024-03-10"))
    }

    #[test]
    fn completion_persists_and_reports() {
        let mut mgr = manager();
        let id = mgr.save_habit(HabitDraft::named("Run")).unwrap().result.id;
        let out = mgr.complete_habit(&id).unwrap();
        assert!(matches!(out.result, CompletionOutcome::Completed(_)));
        // 10 for a medium habit, 10 for First Steps, 150 for Consistency King.
        assert_eq!(out.summary.total_points, 170);
        assert_eq!(out.summary.level, 2);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, Event::AchievementUnlocked { id, .. } if id == "first_habit")));
        assert_eq!(
            mgr.gateway.get("user").unwrap().unwrap()["totalPoints"],
            170
        );
    }

    #[test]
    fn photo_habit_suspends_without_writing() {
        let mut mgr = manager();
        let mut draft = HabitDraft::named("Gym");
        draft.requires_photo = true;
        let id = mgr.save_habit(draft).unwrap().result.id;
        let out = mgr.complete_habit(&id).unwrap();
        let CompletionOutcome::NeedsProof(pending) = out.result else {
            panic!("expected a proof request");
        };
        assert!(mgr.store().habit(&id).unwrap().completions.is_empty());
        assert!(mgr.gateway.get("user").unwrap().is_none());

        let photo = mgr.attachment("gym.jpg", "image/jpeg", b"jpeg").unwrap();
        let report = mgr.complete_with_proof(&pending, &photo).unwrap().result;
        assert_eq!(report.points_awarded, engine::PHOTO_PROOF_POINTS);
        assert!(mgr.store().habit(&id).unwrap().proof_photos.contains_key(&d("2024-03-10")));
    }

    #[test]
    fn oversized_proof_is_refused() {
        let mut cfg = Config::default();
        cfg.attachments.max_bytes = 3;
        let mut mgr = HabitManager::open(Box::new(MemoryStore::new()), cfg, d("2024-03-10"));
        let pending = PendingProof {
            habit_id: "x".into(),
            date: d("2024-03-10"),
        };
        let photo = Attachment::from_bytes("p.png", "image/png", b"12345", 100).unwrap();
        assert!(matches!(
            mgr.complete_with_proof(&pending, &photo),
            Err(CoreError::FileTooLarge { size: 5, limit: 3 })
        ));
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut mgr = HabitManager::open(Box::new(store), Config::default(), d("2024-03-10"));
        let err = mgr.save_habit(HabitDraft::named("Run")).unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::Write { .. })));
        assert!(mgr.store().habits.is_empty());
    }

    #[test]
    fn refused_completion_leaves_points_alone() {
        let mut mgr = manager();
        let id = mgr.save_habit(HabitDraft::named("Run")).unwrap().result.id;
        mgr.complete_habit(&id).unwrap();
        let before = mgr.store().user.total_points;
        assert!(matches!(
            mgr.complete_habit(&id),
            Err(CoreError::Habit(HabitError::AlreadyCompleted))
        ));
        assert_eq!(mgr.store().user.total_points, before);
    }

    #[test]
    fn template_adds_four_habits() {
        let mut mgr = manager();
        let out = mgr.apply_template("morning-routine").unwrap();
        assert_eq!(out.result.len(), 4);
        assert_eq!(mgr.store().habits.len(), 4);
        assert!(matches!(
            mgr.apply_template("nope"),
            Err(CoreError::NotFound { kind: "Template", .. })
        ));
    }

    #[test]
    fn focus_session_awards_points() {
        let mut mgr = manager();
        let ev = Event::PhaseCompleted {
            phase: Phase::Work,
            next: Phase::Break,
            at: Utc::now(),
        };
        let out = mgr.on_timer_event(&ev).unwrap().unwrap();
        assert_eq!(out.summary.total_points, 5);
        let ev = Event::PhaseCompleted {
            phase: Phase::Break,
            next: Phase::Work,
            at: Utc::now(),
        };
        assert!(mgr.on_timer_event(&ev).unwrap().is_none());
    }

    #[test]
    fn timer_round_trips_through_gateway() {
        let mut mgr = manager();
        let mut timer = mgr.load_timer();
        timer.start(1_000);
        mgr.save_timer(&timer).unwrap();
        assert_eq!(mgr.load_timer(), timer);
    }

    #[test]
    fn reset_starts_over() {
        let mut mgr = manager();
        mgr.save_habit(HabitDraft::named("Run")).unwrap();
        mgr.award_focus_session().unwrap();
        mgr.reset().unwrap();
        assert!(mgr.store().habits.is_empty());
        assert_eq!(mgr.store().user.total_points, 0);
        assert_eq!(mgr.store().user.join_date, d("2024-03-10"));
    }
}
