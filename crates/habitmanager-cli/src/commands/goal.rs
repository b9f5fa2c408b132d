//! Goal management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitmanager_core::{Goal, GoalDraft, GoalFilter, GoalKind, HabitManager};
use std::path::PathBuf;

use super::{file_name, mime_for, open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal
    Add {
        /// Goal title
        title: String,
        /// habit, youtube or file
        #[arg(long, default_value = "habit")]
        kind: String,
        /// Video link for youtube goals
        #[arg(long)]
        url: Option<String>,
        /// Document to attach for file goals
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "")]
        description: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
    /// Edit a goal; completion state is kept
    Edit {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        no_deadline: bool,
    },
    /// List goals
    List {
        /// all, completed, pending or overdue
        #[arg(long, default_value = "all")]
        filter: GoalFilter,
    },
    /// Get goal details
    Get {
        /// Goal ID
        id: String,
    },
    /// Flip a goal between completed and pending
    Toggle {
        /// Goal ID
        id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
    /// Write a file goal's attachment to disk
    Download {
        /// Goal ID
        id: String,
        /// Output path (defaults to the attachment's name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn build_kind(
    mgr: &HabitManager,
    kind: &str,
    url: Option<String>,
    file: Option<PathBuf>,
) -> Result<GoalKind, Box<dyn std::error::Error>> {
    Ok(match kind {
        "habit" => GoalKind::Habit,
        "youtube" => GoalKind::Youtube {
            url: url.unwrap_or_default(),
        },
        "file" => {
            let file = match file {
                Some(path) => {
                    let bytes = std::fs::read(&path)?;
                    Some(mgr.attachment(&file_name(&path), mime_for(&path), &bytes)?)
                }
                None => None,
            };
            GoalKind::File { file }
        }
        other => return Err(format!("unknown goal kind: {other}").into()),
    })
}

fn find<'a>(mgr: &'a HabitManager, id: &str) -> Result<&'a Goal, Box<dyn std::error::Error>> {
    Ok(mgr
        .store()
        .goal(id)
        .ok_or_else(|| format!("Goal not found: {id}"))?)
}

pub fn run(action: GoalAction) -> CmdResult {
    let mut mgr = open_manager()?;

    match action {
        GoalAction::Add {
            title,
            kind,
            url,
            file,
            description,
            deadline,
        } => {
            let kind = build_kind(&mgr, &kind, url, file)?;
            let draft = GoalDraft {
                id: None,
                title,
                kind,
                description,
                deadline,
            };
            print_json(&mgr.save_goal(draft)?)?;
        }
        GoalAction::Edit {
            id,
            title,
            kind,
            url,
            file,
            description,
            deadline,
            no_deadline,
        } => {
            let goal = find(&mgr, &id)?.clone();
            let kind = match kind {
                Some(kind) => build_kind(&mgr, &kind, url, file)?,
                None => goal.kind,
            };
            let draft = GoalDraft {
                id: Some(goal.id),
                title: title.unwrap_or(goal.title),
                kind,
                description: description.unwrap_or(goal.description),
                deadline: if no_deadline {
                    None
                } else {
                    deadline.or(goal.deadline)
                },
            };
            print_json(&mgr.save_goal(draft)?)?;
        }
        GoalAction::List { filter } => {
            print_json(&filter.apply(&mgr.store().goals, mgr.today()))?;
        }
        GoalAction::Get { id } => {
            let goal = find(&mgr, &id)?;
            let mut doc = serde_json::to_value(goal)?;
            if let Some(video_id) = goal.video_id() {
                doc["videoId"] = video_id.into();
            }
            print_json(&doc)?;
        }
        GoalAction::Toggle { id } => {
            print_json(&mgr.toggle_goal(&id)?)?;
        }
        GoalAction::Delete { id } => {
            print_json(&mgr.delete_goal(&id)?)?;
        }
        GoalAction::Download { id, out } => {
            let goal = find(&mgr, &id)?;
            let GoalKind::File {
                file: Some(attachment),
            } = &goal.kind
            else {
                return Err(format!("goal {id} has no attachment").into());
            };
            let path = out.unwrap_or_else(|| PathBuf::from(&attachment.name));
            std::fs::write(&path, attachment.decode()?)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
