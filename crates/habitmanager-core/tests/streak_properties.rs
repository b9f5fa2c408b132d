use chrono::{Duration, NaiveDate};
use habitmanager_core::engine::compute_streak;
use habitmanager_core::FutureCompletions;
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

proptest! {
    #[test]
    fn gap_cuts_the_run(before_gap in 1usize..30, after_gap in 1usize..30, gap in 2i64..10) {
        let today = base();
        let mut completions: Vec<NaiveDate> =
            (0..before_gap).map(|i| today - Duration::days(i as i64)).collect();
        let resume = today - Duration::days(before_gap as i64 - 1 + gap);
        completions.extend((0..after_gap).map(|i| resume - Duration::days(i as i64)));
        prop_assert_eq!(
            compute_streak(&completions, today, FutureCompletions::Count),
            before_gap as u32
        );
    }

    #[test]
    fn duplicates_do_not_inflate(n in 1usize..50) {
        let today = base();
        let mut completions: Vec<NaiveDate> =
            (0..n).map(|i| today - Duration::days(i as i64)).collect();
        let copy = completions.clone();
        completions.extend(copy);
        prop_assert_eq!(compute_streak(&completions, today, FutureCompletions::Count), n as u32);
    }
}
