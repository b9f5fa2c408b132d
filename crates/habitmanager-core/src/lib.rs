//! # Habit Manager Core Library
//!
//! This library provides the core business logic for the Habit Manager
//! tracker. It follows a CLI-first philosophy: every operation is available
//! via the standalone `habitmanager-cli` binary, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Entity Store**: in-memory habits, goals, tasks, moods and the user
//!   profile, loaded from and saved to a storage gateway
//! - **Derivation Engine**: streaks, points, levels and achievements as pure
//!   functions over the store
//! - **Statistics**: chart-ready aggregates and dashboard insights
//! - **Storage**: SQLite-backed JSON documents and TOML configuration
//! - **Timer / Reminders**: thread-free state machines driven by the caller
//!
//! ## Key Components
//!
//! - [`HabitManager`]: facade running every user action atomically
//! - [`EntityStore`]: owner of all collections
//! - [`SqliteStore`]: document persistence
//! - [`Config`]: application configuration management

pub mod backup;
pub mod engine;
pub mod error;
pub mod events;
pub mod manager;
pub mod model;
pub mod quotes;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod store;
pub mod templates;
pub mod timer;

pub use backup::{Backup, BACKUP_VERSION};
pub use engine::{
    Achievement, AchievementStatus, CompletionOutcome, CompletionReport, FutureCompletions,
    PendingProof, PointsDelta, ACHIEVEMENTS,
};
pub use error::{
    ConfigError, CoreError, HabitError, ImportFormatError, StorageError, ValidationError,
};
pub use events::Event;
pub use manager::{ActionOutcome, HabitManager};
pub use model::{
    Attachment, Difficulty, Goal, GoalDraft, GoalFilter, GoalKind, Habit, HabitDraft,
    HabitFilter, Mood, Priority, Task, TaskDraft, TaskFilter, User,
};
pub use quotes::{daily_quote, Quote};
pub use reminders::{Reminder, ReminderScheduler};
pub use storage::{Config, DocumentStore, MemoryStore, SqliteStore};
pub use store::{DocKey, EntityStore};
pub use templates::{HabitTemplate, TEMPLATES};
pub use timer::{Phase, PomodoroTimer, TimerState};
