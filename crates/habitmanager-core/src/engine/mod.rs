//! Derivation engine: streaks, points, levels and achievements.
//!
//! Everything here is a function of the [`EntityStore`](crate::store::EntityStore)
//! and an explicit `today`, so results are reproducible in tests.

pub mod achievements;
pub mod completion;
pub mod level;
pub mod streak;

pub use achievements::{achievement_board, evaluate_achievements, Achievement, AchievementStatus, Criterion, ACHIEVEMENTS};
pub use completion::{
    check_completable, complete_habit, complete_with_proof, toggle_goal, toggle_task,
    CompletionOutcome, CompletionReport, PendingProof, PointsDelta, PHOTO_PROOF_POINTS,
};
pub use level::{level_for_points, update_level};
pub use streak::{compute_streak, FutureCompletions};
