use chrono::Utc;
use clap::Subcommand;

use super::{open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record today's mood (1-5), replacing any earlier entry for today
    Record {
        /// 1 = awful, 5 = great
        score: i64,
    },
    /// Show today's mood, if recorded
    Today,
    /// Mood history, most recent last
    List {
        /// Show only the last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}

pub fn run(action: MoodAction) -> CmdResult {
    let mut mgr = open_manager()?;

    match action {
        MoodAction::Record { score } => {
            print_json(&mgr.record_mood(score, Utc::now())?)?;
        }
        MoodAction::Today => {
            print_json(&mgr.store().mood_on(mgr.today()))?;
        }
        MoodAction::List { last } => {
            let moods = &mgr.store().moods;
            let start = last.map_or(0, |n| moods.len().saturating_sub(n));
            print_json(&moods[start..])?;
        }
    }
    Ok(())
}
