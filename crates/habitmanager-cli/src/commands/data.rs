use chrono::Utc;
use clap::Subcommand;
use habitmanager_core::backup::backup_file_name;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::{open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write a JSON backup of all data
    Export {
        /// Output file (default: habit-manager-backup-<date>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace all data with the contents of a backup file
    Import {
        /// Backup file produced by `data export`
        file: PathBuf,
    },
    /// Delete all habits, goals, tasks, moods and progress
    Reset {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CmdResult {
    let mut mgr = open_manager()?;

    match action {
        DataAction::Export { out } => {
            let outcome = mgr.export(Utc::now());
            let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(mgr.today())));
            std::fs::write(&path, serde_json::to_string_pretty(&outcome.result)?)?;
            print_json(&json!({
                "path": path.display().to_string(),
                "habits": outcome.result.habits.len(),
                "goals": outcome.result.goals.len(),
                "tasks": outcome.result.tasks.len(),
            }))?;
        }
        DataAction::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let doc: Value = serde_json::from_str(&raw)
                .map_err(|e| format!("{} is not valid JSON: {e}", file.display()))?;
            print_json(&mgr.import(doc)?)?;
        }
        DataAction::Reset { yes } => {
            if !yes {
                eprintln!("refusing to reset without --yes");
                std::process::exit(1);
            }
            print_json(&mgr.reset()?)?;
        }
    }
    Ok(())
}
