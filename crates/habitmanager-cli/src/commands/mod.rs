pub mod achievements;
pub mod config;
pub mod data;
pub mod goal;
pub mod habit;
pub mod mood;
pub mod profile;
pub mod remind;
pub mod stats;
pub mod task;
pub mod timer;

use habitmanager_core::model::local_today;
use habitmanager_core::HabitManager;
use serde::Serialize;
use std::path::Path;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_manager() -> Result<HabitManager, Box<dyn std::error::Error>> {
    Ok(HabitManager::open_default(local_today())?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Best-effort MIME type from a file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}
