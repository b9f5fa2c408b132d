//! Chart-ready aggregates over habit completions.
//!
//! Everything here is a pure projection of the habit list, bucketed by the
//! calendar date stored on each completion.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::Habit;

/// Trailing window of the heatmap, in days before today.
pub const HEATMAP_DAYS: i64 = 365;

/// Most recent months kept by [`monthly_totals`].
pub const MONTHS_SHOWN: usize = 12;

/// Trailing window for completion series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
            Period::Year => 365,
        }
    }

    fn label_format(self) -> &'static str {
        match self {
            Period::Year => "%b",
            _ => "%b %d",
        }
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(ValidationError::InvalidValue {
                field: "period".into(),
                message: format!("expected week, month, quarter or year, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: usize,
    /// Intensity bucket 0..=4.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakEntry {
    pub id: String,
    pub name: String,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub label: String,
    pub count: usize,
}

pub fn longest_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(|h| h.streak).max().unwrap_or(0)
}

pub fn total_completions(habits: &[Habit]) -> usize {
    habits.iter().map(|h| h.completions.len()).sum()
}

/// Completions ÷ (habits × whole days since joining). Zero when either
/// factor is zero or the join date lies in the future.
pub fn completion_rate(habits: &[Habit], join_date: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - join_date).num_days();
    let possible = habits.len() as i64 * days;
    if possible <= 0 {
        return 0.0;
    }
    total_completions(habits) as f64 / possible as f64
}

/// [`completion_rate`] as a rounded percentage.
pub fn completion_rate_pct(habits: &[Habit], join_date: NaiveDate, today: NaiveDate) -> u32 {
    (completion_rate(habits, join_date, today) * 100.0).round() as u32
}

pub fn category_totals(habits: &[Habit]) -> BTreeMap<String, usize> {
    let mut totals = BTreeMap::new();
    for habit in habits {
        *totals.entry(habit.category.clone()).or_insert(0) += habit.completions.len();
    }
    totals
}

/// Number of habits completed on each date.
pub fn daily_counts(habits: &[Habit]) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for habit in habits {
        let mut dates = habit.completions.clone();
        dates.sort_unstable();
        dates.dedup();
        for date in dates {
            *counts.entry(date).or_insert(0) += 1;
        }
    }
    counts
}

fn heat_level(count: usize) -> u8 {
    count.div_ceil(2).min(4) as u8
}

/// One cell per day for `today - 365 ..= today`.
pub fn heatmap(habits: &[Habit], today: NaiveDate) -> Vec<HeatmapCell> {
    let counts = daily_counts(habits);
    trailing_days(today, HEATMAP_DAYS)
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            HeatmapCell {
                date,
                count,
                level: heat_level(count),
            }
        })
        .collect()
}

/// Per-day completion counts for `today - period.days() ..= today`.
pub fn completion_series(habits: &[Habit], period: Period, today: NaiveDate) -> Vec<SeriesPoint> {
    let counts = daily_counts(habits);
    let format = period.label_format();
    trailing_days(today, period.days())
        .map(|date| SeriesPoint {
            date,
            label: date.format(format).to_string(),
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Highest streaks first; ties keep list order.
pub fn top_streaks(habits: &[Habit], n: usize) -> Vec<StreakEntry> {
    let mut ranked: Vec<&Habit> = habits.iter().collect();
    ranked.sort_by(|a, b| b.streak.cmp(&a.streak));
    ranked
        .into_iter()
        .take(n)
        .map(|h| StreakEntry {
            id: h.id.clone(),
            name: h.name.clone(),
            streak: h.streak,
        })
        .collect()
}

/// Completions per calendar month, oldest first, limited to the most recent
/// [`MONTHS_SHOWN`] months that have any.
pub fn monthly_totals(habits: &[Habit]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<String, (NaiveDate, usize)> = BTreeMap::new();
    for habit in habits {
        for date in &habit.completions {
            let key = date.format("%Y-%m").to_string();
            months.entry(key).or_insert((*date, 0)).1 += 1;
        }
    }
    let skip = months.len().saturating_sub(MONTHS_SHOWN);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, (sample, count))| MonthlyTotal {
            month,
            label: sample.format("%b %Y").to_string(),
            count,
        })
        .collect()
}

fn trailing_days(today: NaiveDate, days: i64) -> impl Iterator<Item = NaiveDate> {
    (0..=days).rev().map(move |back| today - Duration::days(back))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HabitDraft;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn habit(name: &str, category: &str, dates: &[&str]) -> Habit {
        let mut draft = HabitDraft::named(name);
        draft.category = category.into();
        let mut h = Habit::from_draft(draft, d("2024-01-01"));
        h.completions = dates.iter().map(|s| d(s)).collect();
        h
    }

    #[test]
    fn rate_is_zero_without_habits_or_days() {
        let today = d("2024-03-10");
        assert_eq!(completion_rate(&[], d("2024-03-01"), today), 0.0);
        let habits = vec![habit("a", "health", &["2024-03-10"])];
        assert_eq!(completion_rate(&habits, today, today), 0.0);
        assert_eq!(completion_rate(&habits, d("2024-04-01"), today), 0.0);
    }

    #[test]
    fn rate_divides_by_habits_times_days() {
        let habits = vec![
            habit("a", "health", &["2024-03-08", "2024-03-09"]),
            habit("b", "health", &["2024-03-09"]),
        ];
        // 3 completions over 2 habits × 4 days.
        let rate = completion_rate(&habits, d("2024-03-06"), d("2024-03-10"));
        assert!((rate - 0.375).abs() < f64::EPSILON);
        assert_eq!(completion_rate_pct(&habits, d("2024-03-06"), d("2024-03-10")), 38);
    }

    #[test]
    fn category_totals_sum_completions() {
        let habits = vec![
            habit("a", "health", &["2024-03-08", "2024-03-09"]),
            habit("b", "learning", &["2024-03-09"]),
            habit("c", "health", &[]),
        ];
        let totals = category_totals(&habits);
        assert_eq!(totals["health"], 2);
        assert_eq!(totals["learning"], 1);
    }

    #[test]
    fn heatmap_covers_window_with_levels() {
        let today = d("2024-03-10");
        let habits: Vec<Habit> = (0..5)
            .map(|i| habit(&format!("h{i}"), "x", &["2024-03-10"]))
            .chain(std::iter::once(habit("y", "x", &["2024-03-09"])))
            .collect();
        let cells = heatmap(&habits, today);
        assert_eq!(cells.len(), 366);
        assert_eq!(cells.first().unwrap().date, d("2023-03-11"));
        let last = cells.last().unwrap();
        assert_eq!((last.date, last.count, last.level), (today, 5, 3));
        assert_eq!(cells[cells.len() - 2].level, 1);
        assert_eq!(cells[0].level, 0);
    }

    #[test]
    fn heat_level_caps_at_four() {
        assert_eq!(heat_level(0), 0);
        assert_eq!(heat_level(1), 1);
        assert_eq!(heat_level(2), 1);
        assert_eq!(heat_level(8), 4);
        assert_eq!(heat_level(20), 4);
    }

    #[test]
    fn week_series_has_eight_labelled_points() {
        let habits = vec![habit("a", "x", &["2024-03-10", "2024-03-04"])];
        let series = completion_series(&habits, Period::Week, d("2024-03-10"));
        assert_eq!(series.len(), 8);
        assert_eq!(series[0].label, "Mar 03");
        assert_eq!(series[1].count, 1);
        assert_eq!(series[7].count, 1);
    }

    #[test]
    fn year_series_uses_month_labels() {
        let series = completion_series(&[], Period::Year, d("2024-03-10"));
        assert_eq!(series.len(), 366);
        assert_eq!(series.last().unwrap().label, "Mar");
    }

    #[test]
    fn period_parses() {
        assert_eq!("quarter".parse::<Period>().unwrap().days(), 90);
        assert!("decade".parse::<Period>().is_err());
    }

    #[test]
    fn top_streaks_is_stable_on_ties() {
        let mut habits = vec![habit("a", "x", &[]), habit("b", "x", &[]), habit("c", "x", &[])];
        habits[0].streak = 2;
        habits[1].streak = 5;
        habits[2].streak = 2;
        let top: Vec<String> = top_streaks(&habits, 10).into_iter().map(|e| e.name).collect();
        assert_eq!(top, vec!["b", "a", "c"]);
        assert_eq!(top_streaks(&habits, 1).len(), 1);
        assert_eq!(longest_streak(&habits), 5);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn monthly_totals_keep_last_twelve() {
        let dates: Vec<String> = (1..=12)
            .map(|m| format!("2023-{m:02}-15"))
            .chain(["2024-01-02".to_string(), "2024-01-20".to_string()])
            .collect();
        let refs: Vec<&str> = dates.iter().map(String::as_str).collect();
        let totals = monthly_totals(&[habit("a", "x", &refs)]);
        assert_eq!(totals.len(), 12);
        assert_eq!(totals[0].month, "2023-02");
        let last = totals.last().unwrap();
        assert_eq!((last.month.as_str(), last.count), ("2024-01", 2));
        assert_eq!(last.label, "Jan 2024");
    }
}
