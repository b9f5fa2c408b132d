use habitmanager_core::engine::level::{level_for_points, POINTS_PER_LEVEL};
use serde_json::json;

use super::{open_manager, print_json, CmdResult};

pub fn run() -> CmdResult {
    let mgr = open_manager()?;
    let user = &mgr.store().user;
    let to_next = POINTS_PER_LEVEL - user.total_points.rem_euclid(POINTS_PER_LEVEL);
    print_json(&json!({
        "user": user,
        "pointsLevel": level_for_points(user.total_points),
        "pointsToNextLevel": to_next,
        "summary": mgr.summary(),
    }))
}
