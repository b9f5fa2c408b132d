use habitmanager_core::engine::achievement_board;

use super::{open_manager, print_json, CmdResult};

pub fn run() -> CmdResult {
    let mgr = open_manager()?;
    print_json(&achievement_board(mgr.store()))
}
