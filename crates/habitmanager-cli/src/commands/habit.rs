//! Habit management commands for CLI.

use clap::Subcommand;
use habitmanager_core::model::parse_hhmm;
use habitmanager_core::{
    CompletionOutcome, Difficulty, Habit, HabitDraft, HabitFilter, HabitManager, ValidationError,
    TEMPLATES,
};
use serde::Serialize;
use std::path::PathBuf;

use super::{file_name, mime_for, open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        #[arg(long, default_value = "health")]
        category: String,
        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "daily")]
        target: String,
        /// Daily reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
        /// Habit id that must be completed first (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
        /// Require a photo to complete
        #[arg(long)]
        requires_photo: bool,
    },
    /// Edit an existing habit; history is kept
    Edit {
        /// Habit ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        target: Option<String>,
        /// Reminder time (HH:MM), or "" to clear
        #[arg(long)]
        reminder: Option<String>,
        /// Replace the dependency list (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Option<Vec<String>>,
        #[arg(long)]
        requires_photo: Option<bool>,
    },
    /// List habits
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
    },
    /// Habits with today's completion status
    Today,
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
    /// Mark a habit done for today
    Complete {
        /// Habit ID
        id: String,
        /// Photo proof, for habits that require one
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// List built-in habit templates
    Templates,
    /// Add every habit of a template
    ApplyTemplate {
        /// Template ID (see `habit templates`)
        id: String,
    },
}

#[derive(Serialize)]
struct TodayEntry<'a> {
    #[serde(flatten)]
    habit: &'a Habit,
    completed_today: bool,
}

fn reminder_time(raw: &str) -> Result<Option<chrono::NaiveTime>, Box<dyn std::error::Error>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let time =
        parse_hhmm(raw).map_err(|_| ValidationError::InvalidReminderTime(raw.to_string()))?;
    Ok(Some(time))
}

fn draft_from(habit: &Habit) -> HabitDraft {
    HabitDraft {
        id: Some(habit.id.clone()),
        name: habit.name.clone(),
        category: habit.category.clone(),
        difficulty: habit.difficulty,
        description: habit.description.clone(),
        target: habit.target.clone(),
        reminder_time: habit.reminder_time,
        dependencies: habit.dependencies.clone(),
        requires_photo: habit.requires_photo,
    }
}

fn complete(mgr: &mut HabitManager, id: &str, photo: Option<PathBuf>) -> CmdResult {
    let outcome = mgr.complete_habit(id)?;
    let CompletionOutcome::NeedsProof(pending) = &outcome.result else {
        return print_json(&outcome);
    };
    let Some(path) = photo else {
        eprintln!("habit requires photo proof: rerun with --photo <FILE>");
        return print_json(&outcome);
    };
    let bytes = std::fs::read(&path)?;
    let attachment = mgr.attachment(&file_name(&path), mime_for(&path), &bytes)?;
    let done = mgr.complete_with_proof(pending, &attachment)?;
    print_json(&done)
}

pub fn run(action: HabitAction) -> CmdResult {
    let mut mgr = open_manager()?;

    match action {
        HabitAction::Add {
            name,
            category,
            difficulty,
            description,
            target,
            reminder,
            depends_on,
            requires_photo,
        } => {
            let draft = HabitDraft {
                id: None,
                name,
                category,
                difficulty: Difficulty::from(difficulty),
                description,
                target,
                reminder_time: reminder_time(reminder.as_deref().unwrap_or(""))?,
                dependencies: depends_on,
                requires_photo,
            };
            print_json(&mgr.save_habit(draft)?)?;
        }
        HabitAction::Edit {
            id,
            name,
            category,
            difficulty,
            description,
            target,
            reminder,
            depends_on,
            requires_photo,
        } => {
            let habit = mgr
                .store()
                .habit(&id)
                .ok_or_else(|| format!("Habit not found: {id}"))?;
            let mut draft = draft_from(habit);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(difficulty) = difficulty {
                draft.difficulty = Difficulty::from(difficulty);
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(target) = target {
                draft.target = target;
            }
            if let Some(raw) = reminder {
                draft.reminder_time = reminder_time(&raw)?;
            }
            if let Some(deps) = depends_on {
                draft.dependencies = deps;
            }
            if let Some(flag) = requires_photo {
                draft.requires_photo = flag;
            }
            print_json(&mgr.save_habit(draft)?)?;
        }
        HabitAction::List {
            category,
            difficulty,
            search,
        } => {
            let filter = HabitFilter {
                category,
                difficulty: difficulty.map(Difficulty::from),
                search,
            };
            print_json(&filter.apply(&mgr.store().habits))?;
        }
        HabitAction::Today => {
            let today = mgr.today();
            let entries: Vec<TodayEntry> = mgr
                .store()
                .habits
                .iter()
                .map(|habit| TodayEntry {
                    habit,
                    completed_today: habit.is_completed_on(today),
                })
                .collect();
            print_json(&entries)?;
        }
        HabitAction::Get { id } => {
            let habit = mgr
                .store()
                .habit(&id)
                .ok_or_else(|| format!("Habit not found: {id}"))?;
            print_json(habit)?;
        }
        HabitAction::Delete { id } => {
            print_json(&mgr.delete_habit(&id)?)?;
        }
        HabitAction::Complete { id, photo } => {
            complete(&mut mgr, &id, photo)?;
        }
        HabitAction::Templates => {
            print_json(TEMPLATES)?;
        }
        HabitAction::ApplyTemplate { id } => {
            print_json(&mgr.apply_template(&id)?)?;
        }
    }
    Ok(())
}
