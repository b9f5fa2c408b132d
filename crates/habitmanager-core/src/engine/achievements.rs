//! One-time achievements unlocked by predicates over the stored state.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::streak::FutureCompletions;
use crate::store::EntityStore;

/// Unlock condition of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Criterion {
    HabitCountAtLeast(usize),
    AnyStreakAtLeast(u32),
    TotalCompletionsAtLeast(usize),
    /// Every habit completed on each of the last N days, today included.
    PerfectDays(u32),
    /// At least one habit, and every habit has a live streak.
    AllStreaksActive,
    /// Needs data the tracker does not record (time of day of a
    /// completion), so it is never unlocked automatically.
    Manual,
}

#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: i64,
    pub criterion: Criterion,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_habit",
        title: "First Steps",
        description: "Create your first habit",
        points: 10,
        criterion: Criterion::HabitCountAtLeast(1),
    },
    Achievement {
        id: "week_streak",
        title: "Week Warrior",
        description: "Maintain a 7-day streak",
        points: 50,
        criterion: Criterion::AnyStreakAtLeast(7),
    },
    Achievement {
        id: "month_streak",
        title: "Monthly Master",
        description: "Maintain a 30-day streak",
        points: 200,
        criterion: Criterion::AnyStreakAtLeast(30),
    },
    Achievement {
        id: "hundred_completions",
        title: "Century Club",
        description: "Complete 100 habits",
        points: 100,
        criterion: Criterion::TotalCompletionsAtLeast(100),
    },
    Achievement {
        id: "five_habits",
        title: "Multi-Tasker",
        description: "Create 5 different habits",
        points: 30,
        criterion: Criterion::HabitCountAtLeast(5),
    },
    Achievement {
        id: "perfect_week",
        title: "Perfect Week",
        description: "Complete all habits for 7 days straight",
        points: 100,
        criterion: Criterion::PerfectDays(7),
    },
    Achievement {
        id: "early_bird",
        title: "Early Bird",
        description: "Complete habits before 8 AM",
        points: 25,
        criterion: Criterion::Manual,
    },
    Achievement {
        id: "consistency_king",
        title: "Consistency King",
        description: "Maintain streaks for all habits",
        points: 150,
        criterion: Criterion::AllStreaksActive,
    },
];

impl Criterion {
    pub fn is_met(&self, store: &EntityStore, today: NaiveDate, policy: FutureCompletions) -> bool {
        let habits = &store.habits;
        match *self {
            Criterion::HabitCountAtLeast(n) => habits.len() >= n,
            Criterion::AnyStreakAtLeast(n) => habits
                .iter()
                .any(|h| h.current_streak(today, policy) >= n),
            Criterion::TotalCompletionsAtLeast(n) => store.total_completions() >= n,
            Criterion::PerfectDays(days) => {
                !habits.is_empty()
                    && (0..days as i64).all(|i| {
                        let date = today - Duration::days(i);
                        habits.iter().all(|h| h.is_completed_on(date))
                    })
            }
            Criterion::AllStreaksActive => {
                !habits.is_empty() && habits.iter().all(|h| h.current_streak(today, policy) > 0)
            }
            Criterion::Manual => false,
        }
    }
}

/// Unlock every achievement whose criterion now holds and which the user
/// does not have yet, crediting its points. Returns the new unlocks.
///
/// Already unlocked ids are never re-awarded.
pub fn evaluate_achievements(
    store: &mut EntityStore,
    today: NaiveDate,
    policy: FutureCompletions,
) -> Vec<&'static Achievement> {
    let unlocked: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| !store.user.has_achievement(a.id))
        .filter(|a| a.criterion.is_met(store, today, policy))
        .collect();

    for achievement in &unlocked {
        store.user.achievements.push(achievement.id.to_string());
        store.user.total_points = store.user.total_points.saturating_add(achievement.points);
        tracing::info!(
            id = achievement.id,
            points = achievement.points,
            "achievement unlocked"
        );
    }
    unlocked
}

/// Display row for the achievements board.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub unlocked: bool,
}

/// Every achievement with its unlocked flag. An achievement counts as
/// unlocked once recorded on the user, even if its criterion no longer holds.
pub fn achievement_board(store: &EntityStore) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|a| AchievementStatus {
            achievement: a.clone(),
            unlocked: store.user.has_achievement(a.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Habit, HabitDraft, User};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store_with(habits: Vec<Habit>) -> EntityStore {
        EntityStore {
            habits,
            user: User::new(d("2024-01-01")),
            ..Default::default()
        }
    }

    /// One habit with `n` completions on distinct days long before `today`.
    fn habit_with_old_completions(name: &str, n: i64, today: NaiveDate) -> Habit {
        let mut h = Habit::from_draft(HabitDraft::named(name), d("2020-01-01"));
        for i in 0..n {
            // Every other day so no streak forms.
            h.record_completion(today - Duration::days(400 + 2 * i));
        }
        h
    }

    #[test]
    fn century_club_unlocks_once() {
        let today = d("2024-06-01");
        let mut store = store_with(vec![habit_with_old_completions("a", 99, today)]);
        let first = evaluate_achievements(&mut store, today, FutureCompletions::Count);
        assert!(first.iter().all(|a| a.id != "hundred_completions"));

        store.habits[0].record_completion(today - Duration::days(10));
        let unlocked = evaluate_achievements(&mut store, today, FutureCompletions::Count);
        assert_eq!(
            unlocked.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec!["hundred_completions"]
        );

        for i in 0..50 {
            store.habits[0].record_completion(today - Duration::days(1000 + 2 * i));
        }
        let points_before = store.user.total_points;
        assert!(evaluate_achievements(&mut store, today, FutureCompletions::Count).is_empty());
        assert_eq!(store.user.total_points, points_before);
        assert_eq!(
            store
                .user
                .achievements
                .iter()
                .filter(|a| *a == "hundred_completions")
                .count(),
            1
        );
    }

    #[test]
    fn first_habit_awards_points() {
        let today = d("2024-06-01");
        let mut store = store_with(vec![Habit::from_draft(HabitDraft::named("x"), today)]);
        let unlocked = evaluate_achievements(&mut store, today, FutureCompletions::Count);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "first_habit");
        assert_eq!(store.user.total_points, 10);
    }

    #[test]
    fn perfect_week_needs_every_habit_every_day() {
        let today = d("2024-06-10");
        let mut a = Habit::from_draft(HabitDraft::named("a"), today);
        let mut b = Habit::from_draft(HabitDraft::named("b"), today);
        for i in 0..7 {
            a.record_completion(today - Duration::days(i));
            if i != 3 {
                b.record_completion(today - Duration::days(i));
            }
        }
        let mut store = store_with(vec![a, b]);
        assert!(!Criterion::PerfectDays(7).is_met(&store, today, FutureCompletions::Count));

        store.habits[1].record_completion(today - Duration::days(3));
        assert!(Criterion::PerfectDays(7).is_met(&store, today, FutureCompletions::Count));
        assert!(Criterion::AnyStreakAtLeast(7).is_met(&store, today, FutureCompletions::Count));
        assert!(Criterion::AllStreaksActive.is_met(&store, today, FutureCompletions::Count));
    }

    #[test]
    fn manual_and_empty_criteria_stay_locked() {
        let store = store_with(Vec::new());
        let today = d("2024-06-10");
        assert!(!Criterion::Manual.is_met(&store, today, FutureCompletions::Count));
        assert!(!Criterion::PerfectDays(7).is_met(&store, today, FutureCompletions::Count));
        assert!(!Criterion::AllStreaksActive.is_met(&store, today, FutureCompletions::Count));
    }

    #[test]
    fn board_reflects_recorded_unlocks() {
        let mut store = store_with(Vec::new());
        store.user.achievements.push("week_streak".into());
        let board = achievement_board(&store);
        assert_eq!(board.len(), ACHIEVEMENTS.len());
        let week = board.iter().find(|s| s.achievement.id == "week_streak").unwrap();
        assert!(week.unlocked);
    }
}
