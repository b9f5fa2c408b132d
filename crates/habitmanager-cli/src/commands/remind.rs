//! Reminder polling.
//!
//! `check` evaluates the current minute once. `watch` keeps polling at the
//! configured interval and prints each reminder as it falls due.

use chrono::Local;
use clap::Subcommand;
use habitmanager_core::ReminderScheduler;
use std::time::Duration;

use super::{open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum RemindAction {
    /// Print reminders due this minute
    Check,
    /// Poll for reminders until interrupted
    Watch,
}

async fn watch(interval_secs: u64) -> CmdResult {
    let mut scheduler = ReminderScheduler::new();
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        // Reopen each round so completions from other invocations are seen.
        let mgr = open_manager()?;
        let now = Local::now().naive_local();
        for reminder in scheduler.due(&mgr.store().habits, now) {
            tracing::info!(habit = %reminder.habit_id, "reminder due");
            eprintln!("{}", reminder.message());
            print_json(&reminder.to_event())?;
        }
    }
}

pub fn run(action: RemindAction) -> CmdResult {
    let mgr = open_manager()?;
    if !mgr.config().reminders.enabled {
        eprintln!("reminders are disabled (reminders.enabled = false)");
        return Ok(());
    }

    match action {
        RemindAction::Check => {
            let now = Local::now().naive_local();
            let due = ReminderScheduler::new().due(&mgr.store().habits, now);
            print_json(&due)?;
        }
        RemindAction::Watch => {
            let interval_secs = mgr.config().reminders.check_interval_secs;
            drop(mgr);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(watch(interval_secs))?;
        }
    }
    Ok(())
}
