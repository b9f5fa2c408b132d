use clap::Subcommand;
use habitmanager_core::daily_quote;
use habitmanager_core::stats::{self, Period};
use serde_json::json;

use super::{open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Dashboard summary
    Summary,
    /// Completions per day for the last year, with intensity levels
    Heatmap,
    /// Completions per day over a trailing window
    Series {
        /// week, month, quarter or year
        #[arg(long, default_value = "week")]
        period: Period,
    },
    /// Completion totals per category
    Categories,
    /// Habits ranked by current streak
    Streaks {
        /// How many habits to show (default from config)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Completion totals per month
    Monthly,
    /// Daily, weekly and monthly progress rings
    Progress,
    /// Mood and completion insights
    Insights,
    /// Today's inspirational quote
    Quote,
}

pub fn run(action: StatsAction) -> CmdResult {
    let mgr = open_manager()?;
    let store = mgr.store();
    let today = mgr.today();

    match action {
        StatsAction::Summary => {
            let summary = mgr.summary();
            let rate = stats::completion_rate(&store.habits, store.user.join_date, today);
            print_json(&json!({
                "summary": summary,
                "completionRate": rate,
            }))?;
        }
        StatsAction::Heatmap => {
            print_json(&stats::heatmap(&store.habits, today))?;
        }
        StatsAction::Series { period } => {
            print_json(&stats::completion_series(&store.habits, period, today))?;
        }
        StatsAction::Categories => {
            print_json(&stats::category_totals(&store.habits))?;
        }
        StatsAction::Streaks { top } => {
            let n = top.unwrap_or(mgr.config().stats.top_streaks);
            print_json(&stats::top_streaks(&store.habits, n))?;
        }
        StatsAction::Monthly => {
            print_json(&stats::monthly_totals(&store.habits))?;
        }
        StatsAction::Progress => {
            print_json(&stats::progress_rings(&store.habits, today))?;
        }
        StatsAction::Insights => {
            print_json(&stats::insights(store, today))?;
        }
        StatsAction::Quote => {
            print_json(&daily_quote(today))?;
        }
    }
    Ok(())
}
