use crate::model::User;

pub const POINTS_PER_LEVEL: i64 = 100;

/// Level implied by a point total: one level per 100 points, starting at 1.
/// Floor division, so negative totals map below 1.
pub fn level_for_points(total_points: i64) -> i64 {
    total_points.div_euclid(POINTS_PER_LEVEL) + 1
}

/// Raise `user.level` to match its points. Never lowers it.
///
/// Returns the new level when it went up.
pub fn update_level(user: &mut User) -> Option<u32> {
    let computed = level_for_points(user.total_points);
    if computed > user.level as i64 {
        user.level = u32::try_from(computed).unwrap_or(u32::MAX);
        tracing::info!(level = user.level, "level up");
        Some(user.level)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user(level: u32, points: i64) -> User {
        let mut u = User::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        u.level = level;
        u.total_points = points;
        u
    }

    #[test]
    fn levels_follow_hundreds() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(250), 3);
        assert_eq!(level_for_points(-5), 0);
    }

    #[test]
    fn level_up_is_reported_once() {
        let mut u = user(1, 120);
        assert_eq!(update_level(&mut u), Some(2));
        assert_eq!(update_level(&mut u), None);
        assert_eq!(u.level, 2);
    }

    #[test]
    fn level_never_decreases() {
        let mut u = user(3, 250);
        assert_eq!(update_level(&mut u), None);
        u.total_points = 50;
        assert_eq!(update_level(&mut u), None);
        assert_eq!(u.level, 3);
        u.total_points = -40;
        assert_eq!(update_level(&mut u), None);
        assert_eq!(u.level, 3);
    }

    #[test]
    fn huge_totals_cap_the_level() {
        let mut u = user(1, i64::MAX);
        assert_eq!(update_level(&mut u), Some(u32::MAX));
        assert_eq!(update_level(&mut u), None);
    }
}
