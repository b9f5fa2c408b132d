mod engine;

pub use engine::{now_ms, Phase, PomodoroTimer, TimerState};
