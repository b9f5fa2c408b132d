//! Statistics module for the habit tracker
//!
//! Read-only projections recomputed on demand: completion aggregates and
//! chart series, plus the dashboard's progress rings and insights.

mod aggregates;
mod insights;

pub use aggregates::{
    category_totals, completion_rate, completion_rate_pct, completion_series, daily_counts,
    heatmap, longest_streak, monthly_totals, top_streaks, total_completions, HeatmapCell,
    MonthlyTotal, Period, SeriesPoint, StreakEntry, HEATMAP_DAYS, MONTHS_SHOWN,
};

pub use insights::{
    dashboard, insights, progress_rings, DashboardSummary, Insight, InsightKind, Insights,
    ProgressRings, MOOD_WINDOW,
};
