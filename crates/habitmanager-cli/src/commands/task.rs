//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitmanager_core::model::task_calendar;
use habitmanager_core::{Priority, TaskDraft, TaskFilter};

use super::{open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List tasks
    List {
        /// all, today, week or month
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    /// Tasks of the current month on a Sunday-started grid
    Calendar,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip a task between done and open
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut mgr = open_manager()?;

    match action {
        TaskAction::Create {
            title,
            date,
            priority,
            category,
            description,
        } => {
            let draft = TaskDraft {
                id: None,
                title,
                description,
                date: date.unwrap_or(mgr.today()),
                priority,
                category,
            };
            print_json(&mgr.save_task(draft)?)?;
        }
        TaskAction::List { filter } => {
            print_json(&filter.apply(&mgr.store().tasks, mgr.today()))?;
        }
        TaskAction::Calendar => {
            print_json(&task_calendar(&mgr.store().tasks, mgr.today()))?;
        }
        TaskAction::Get { id } => {
            let task = mgr
                .store()
                .task(&id)
                .ok_or_else(|| format!("Task not found: {id}"))?;
            print_json(task)?;
        }
        TaskAction::Update {
            id,
            title,
            date,
            priority,
            category,
            description,
        } => {
            let task = mgr
                .store()
                .task(&id)
                .ok_or_else(|| format!("Task not found: {id}"))?
                .clone();
            let draft = TaskDraft {
                id: Some(task.id),
                title: title.unwrap_or(task.title),
                description: description.unwrap_or(task.description),
                date: date.unwrap_or(task.date),
                priority: priority.unwrap_or(task.priority),
                category: category.unwrap_or(task.category),
            };
            print_json(&mgr.save_task(draft)?)?;
        }
        TaskAction::Toggle { id } => {
            print_json(&mgr.toggle_task(&id)?)?;
        }
        TaskAction::Delete { id } => {
            print_json(&mgr.delete_task(&id)?)?;
        }
    }
    Ok(())
}
