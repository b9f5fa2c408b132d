//! Point-awarding transitions: habit completion and goal/task toggles.
//!
//! These functions mutate the in-memory store only. Persisting the result
//! (and rolling back on a failed write) is the caller's job, see
//! [`crate::manager::HabitManager`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::achievements::{evaluate_achievements, Achievement};
use super::level::update_level;
use super::streak::FutureCompletions;
use crate::error::{CoreError, HabitError, Result};
use crate::model::TASK_POINTS;
use crate::store::EntityStore;

/// Flat award for a completion backed by photo proof, replacing the
/// difficulty points.
pub const PHOTO_PROOF_POINTS: i64 = 15;

/// A completion suspended until a photo is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingProof {
    pub habit_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub habit_id: String,
    pub date: NaiveDate,
    pub points_awarded: i64,
    pub streak: u32,
    pub with_proof: bool,
    pub unlocked: Vec<&'static Achievement>,
    pub level_up: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionOutcome {
    Completed(CompletionReport),
    NeedsProof(PendingProof),
}

/// Check whether `habit_id` may be completed on `today`.
///
/// Order matters: an already-completed habit reports `AlreadyCompleted`
/// even when its dependencies are unmet. Dependencies pointing at deleted
/// habits count as satisfied.
pub fn check_completable(store: &EntityStore, habit_id: &str, today: NaiveDate) -> Result<(), HabitError> {
    let habit = store
        .habit(habit_id)
        .ok_or_else(|| HabitError::NotFound(habit_id.to_string()))?;

    if habit.is_completed_on(today) {
        return Err(HabitError::AlreadyCompleted);
    }

    let pending: Vec<String> = habit
        .dependencies
        .iter()
        .filter(|dep| {
            store
                .habit(dep)
                .is_some_and(|dep_habit| !dep_habit.is_completed_on(today))
        })
        .cloned()
        .collect();
    if !pending.is_empty() {
        return Err(HabitError::DependencyUnmet { pending });
    }
    Ok(())
}

/// Complete a habit for `today`, or suspend when it requires photo proof.
pub fn complete_habit(
    store: &mut EntityStore,
    habit_id: &str,
    today: NaiveDate,
    policy: FutureCompletions,
) -> Result<CompletionOutcome, HabitError> {
    check_completable(store, habit_id, today)?;

    let habit = store
        .habit(habit_id)
        .ok_or_else(|| HabitError::NotFound(habit_id.to_string()))?;
    if habit.requires_photo {
        return Ok(CompletionOutcome::NeedsProof(PendingProof {
            habit_id: habit_id.to_string(),
            date: today,
        }));
    }
    let points = habit.difficulty.points();

    let report = apply_completion(store, habit_id, today, points, None, policy)?;
    Ok(CompletionOutcome::Completed(report))
}

/// Resume a suspended completion with its photo payload.
///
/// Preconditions are checked again since the store may have changed while
/// the proof was being captured.
pub fn complete_with_proof(
    store: &mut EntityStore,
    pending: &PendingProof,
    photo: String,
    policy: FutureCompletions,
) -> Result<CompletionReport, HabitError> {
    check_completable(store, &pending.habit_id, pending.date)?;
    apply_completion(
        store,
        &pending.habit_id,
        pending.date,
        PHOTO_PROOF_POINTS,
        Some(photo),
        policy,
    )
}

fn apply_completion(
    store: &mut EntityStore,
    habit_id: &str,
    date: NaiveDate,
    points: i64,
    photo: Option<String>,
    policy: FutureCompletions,
) -> Result<CompletionReport, HabitError> {
    let habit = store
        .habit_mut(habit_id)
        .ok_or_else(|| HabitError::NotFound(habit_id.to_string()))?;

    habit.record_completion(date);
    habit.refresh_streak(date, policy);
    habit.points = habit.points.saturating_add(points);
    let with_proof = photo.is_some();
    if let Some(photo) = photo {
        habit.proof_photos.insert(date, photo);
    }
    let streak = habit.streak;
    store.user.total_points = store.user.total_points.saturating_add(points);

    tracing::info!(habit = habit_id, %date, points, streak, "habit completed");

    let unlocked = evaluate_achievements(store, date, policy);
    let level_up = update_level(&mut store.user);

    Ok(CompletionReport {
        habit_id: habit_id.to_string(),
        date,
        points_awarded: points,
        streak,
        with_proof,
        unlocked,
        level_up,
    })
}

/// Result of flipping a goal or task.
#[derive(Debug, Clone, Serialize)]
pub struct PointsDelta {
    pub id: String,
    pub completed: bool,
    /// Signed change to the user's total.
    pub delta: i64,
    pub total_points: i64,
    pub level_up: Option<u32>,
}

/// Flip a goal's completion. Completing credits its points and may level
/// up; un-completing debits them without touching level or achievements.
pub fn toggle_goal(store: &mut EntityStore, goal_id: &str) -> Result<PointsDelta> {
    let goal = store
        .goals
        .iter_mut()
        .find(|g| g.id == goal_id)
        .ok_or_else(|| CoreError::NotFound {
            kind: "Goal",
            id: goal_id.to_string(),
        })?;
    goal.completed = !goal.completed;
    let (completed, points) = (goal.completed, goal.points);
    Ok(apply_toggle(store, goal_id, completed, points))
}

/// Flip a task's completion, worth a fixed [`TASK_POINTS`].
pub fn toggle_task(store: &mut EntityStore, task_id: &str) -> Result<PointsDelta> {
    let task = store
        .tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| CoreError::NotFound {
            kind: "Task",
            id: task_id.to_string(),
        })?;
    task.completed = !task.completed;
    let completed = task.completed;
    Ok(apply_toggle(store, task_id, completed, TASK_POINTS))
}

fn apply_toggle(store: &mut EntityStore, id: &str, completed: bool, points: i64) -> PointsDelta {
    let delta = if completed { points } else { -points };
    store.user.total_points = store.user.total_points.saturating_add(delta);
    let level_up = if completed {
        update_level(&mut store.user)
    } else {
        None
    };
    tracing::info!(id, completed, delta, "completion toggled");
    PointsDelta {
        id: id.to_string(),
        completed,
        delta,
        total_points: store.user.total_points,
        level_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Difficulty, Goal, GoalDraft, Habit, HabitDraft, Priority, Task, TaskDraft, User,
    };

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn habit(id: &str, difficulty: Difficulty) -> Habit {
        let mut draft = HabitDraft::named(id);
        draft.id = Some(id.to_string());
        draft.difficulty = difficulty;
        Habit::from_draft(draft, d("2024-01-01"))
    }

    fn store(habits: Vec<Habit>) -> EntityStore {
        let mut user = User::new(d("2024-01-01"));
        // Pre-unlock the habit-count achievements so point totals stay simple.
        user.achievements.push("first_habit".into());
        user.achievements.push("five_habits".into());
        user.achievements.push("consistency_king".into());
        EntityStore {
            habits,
            user,
            ..Default::default()
        }
    }

    #[test]
    fn medium_completion_adds_ten_points() {
        let today = d("2024-06-01");
        let mut s = store(vec![habit("h", Difficulty::Medium)]);
        let outcome = complete_habit(&mut s, "h", today, FutureCompletions::Count).unwrap();
        let CompletionOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(report.points_awarded, 10);
        assert_eq!(report.streak, 1);
        assert_eq!(s.user.total_points, 10);
        assert_eq!(s.habits[0].points, 10);
    }

    #[test]
    fn second_completion_same_day_is_rejected() {
        let today = d("2024-06-01");
        let mut s = store(vec![habit("h", Difficulty::Hard)]);
        complete_habit(&mut s, "h", today, FutureCompletions::Count).unwrap();
        let err = complete_habit(&mut s, "h", today, FutureCompletions::Count).unwrap_err();
        assert_eq!(err, HabitError::AlreadyCompleted);
        assert_eq!(s.user.total_points, 15);
        assert_eq!(s.habits[0].completions.len(), 1);
    }

    #[test]
    fn dependency_must_be_completed_first() {
        let today = d("2024-06-01");
        let base = habit("base", Difficulty::Easy);
        let mut follow = habit("follow", Difficulty::Easy);
        follow.dependencies = vec!["base".into(), "deleted".into()];
        let mut s = store(vec![base, follow]);

        let err = complete_habit(&mut s, "follow", today, FutureCompletions::Count).unwrap_err();
        assert_eq!(
            err,
            HabitError::DependencyUnmet {
                pending: vec!["base".into()]
            }
        );

        complete_habit(&mut s, "base", today, FutureCompletions::Count).unwrap();
        assert!(complete_habit(&mut s, "follow", today, FutureCompletions::Count).is_ok());
    }

    #[test]
    fn already_completed_wins_over_dependency() {
        let today = d("2024-06-01");
        let base = habit("base", Difficulty::Easy);
        let mut follow = habit("follow", Difficulty::Easy);
        follow.dependencies = vec!["base".into()];
        follow.record_completion(today);
        let mut s = store(vec![base, follow]);
        let err = complete_habit(&mut s, "follow", today, FutureCompletions::Count).unwrap_err();
        assert_eq!(err, HabitError::AlreadyCompleted);
    }

    #[test]
    fn photo_habit_suspends_then_awards_flat_points() {
        let today = d("2024-06-01");
        let mut h = habit("p", Difficulty::Easy);
        h.requires_photo = true;
        let mut s = store(vec![h]);

        let outcome = complete_habit(&mut s, "p", today, FutureCompletions::Count).unwrap();
        let CompletionOutcome::NeedsProof(pending) = outcome else {
            panic!("expected proof request");
        };
        assert!(s.habits[0].completions.is_empty());
        assert_eq!(s.user.total_points, 0);

        let report =
            complete_with_proof(&mut s, &pending, "data:image/png;base64,AA==".into(), FutureCompletions::Count)
                .unwrap();
        assert!(report.with_proof);
        assert_eq!(report.points_awarded, PHOTO_PROOF_POINTS);
        assert_eq!(s.user.total_points, 15);
        assert!(s.habits[0].proof_photos.contains_key(&today));

        let again = complete_with_proof(&mut s, &pending, String::new(), FutureCompletions::Count);
        assert_eq!(again.unwrap_err(), HabitError::AlreadyCompleted);
    }

    #[test]
    fn unknown_habit_is_not_found() {
        let mut s = store(Vec::new());
        let err = complete_habit(&mut s, "nope", d("2024-06-01"), FutureCompletions::Count).unwrap_err();
        assert_eq!(err, HabitError::NotFound("nope".into()));
    }

    #[test]
    fn goal_toggle_round_trip_restores_points() {
        let mut s = store(Vec::new());
        s.user.total_points = 95;
        let goal = Goal::from_draft(
            GoalDraft {
                id: Some("g".into()),
                title: "Ship".into(),
                ..Default::default()
            },
            d("2024-01-01"),
        );
        s.goals.push(goal);

        let on = toggle_goal(&mut s, "g").unwrap();
        assert_eq!(on.delta, 20);
        assert_eq!(on.level_up, Some(2));
        let off = toggle_goal(&mut s, "g").unwrap();
        assert_eq!(off.delta, -20);
        assert_eq!(s.user.total_points, 95);
        assert_eq!(s.user.level, 2);
    }

    #[test]
    fn imported_huge_total_saturates() {
        let mut s = store(Vec::new());
        s.user.total_points = i64::MAX - 5;
        s.goals.push(Goal::from_draft(
            GoalDraft {
                id: Some("g".into()),
                title: "Ship".into(),
                ..Default::default()
            },
            d("2024-01-01"),
        ));

        toggle_goal(&mut s, "g").unwrap();
        assert_eq!(s.user.total_points, i64::MAX);
        assert_eq!(s.user.level, u32::MAX);
    }

    #[test]
    fn task_untoggle_can_go_negative() {
        let mut s = store(Vec::new());
        let mut task = Task::from_draft(
            TaskDraft {
                id: Some("t".into()),
                title: "Pay rent".into(),
                description: String::new(),
                date: d("2024-06-01"),
                priority: Priority::High,
                category: "home".into(),
            },
            d("2024-06-01"),
        );
        task.completed = true;
        s.tasks.push(task);

        let delta = toggle_task(&mut s, "t").unwrap();
        assert!(!delta.completed);
        assert_eq!(s.user.total_points, -5);
        assert!(toggle_task(&mut s, "missing").is_err());
    }
}
