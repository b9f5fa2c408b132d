//! Focus timer implementation.
//!
//! The timer is a second-granularity state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` once per
//! second, or `catch_up()` with the wall clock after a gap.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running
//!           |
//!           +-- tick at 0:00 --> Idle (next phase loaded)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PomodoroTimer::new(25, 5);
//! timer.start(now_ms);
//! // Once per second:
//! timer.tick(); // Returns Some(Event::PhaseCompleted) when the phase runs out
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::TimerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Work/break countdown.
///
/// Serializable so the CLI can persist it between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroTimer {
    phase: Phase,
    state: TimerState,
    remaining_secs: u32,
    work_secs: u32,
    break_secs: u32,
    /// Wall clock (ms since epoch) of the last whole second accounted for.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::from_config(&TimerConfig::default())
    }
}

impl PomodoroTimer {
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let work_secs = work_minutes.saturating_mul(60);
        Self {
            phase: Phase::Work,
            state: TimerState::Idle,
            remaining_secs: work_secs,
            work_secs,
            break_secs: break_minutes.saturating_mul(60),
            last_tick_epoch_ms: None,
        }
    }

    pub fn from_config(cfg: &TimerConfig) -> Self {
        Self::new(cfg.work_minutes, cfg.break_minutes)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.duration_of(self.phase)
    }

    /// `MM:SS` countdown text.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: self.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. No-op while already running.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick_epoch_ms = Some(now_ms);
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// No-op unless running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and reload the work phase.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.phase = Phase::Work;
        self.remaining_secs = self.work_secs;
        self.last_tick_epoch_ms = None;
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance one second. A tick at 0:00 completes the phase.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        if let Some(last) = self.last_tick_epoch_ms.as_mut() {
            *last += 1000;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            return None;
        }
        Some(self.complete_phase())
    }

    /// Replay the whole seconds elapsed since the last accounted tick.
    ///
    /// Stops early when a phase completes, since the timer halts there.
    pub fn catch_up(&mut self, now_ms: u64) -> Option<Event> {
        let last = self.last_tick_epoch_ms?;
        if !self.is_running() {
            return None;
        }
        let elapsed = now_ms.saturating_sub(last) / 1000;
        for _ in 0..elapsed {
            if let Some(ev) = self.tick() {
                return Some(ev);
            }
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        let finished = self.phase;
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        self.phase = finished.next();
        self.remaining_secs = self.duration_of(self.phase);
        tracing::info!(phase = ?finished, "timer phase completed");
        Event::PhaseCompleted {
            phase: finished,
            next: self.phase,
            at: Utc::now(),
        }
    }

    fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_out(timer: &mut PomodoroTimer) -> Option<Event> {
        for _ in 0..=timer.remaining_secs() {
            if let Some(ev) = timer.tick() {
                return Some(ev);
            }
        }
        None
    }

    #[test]
    fn start_pause_start() {
        let mut timer = PomodoroTimer::new(25, 5);
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.start(0).is_some());
        assert!(timer.start(0).is_none());
        assert!(timer.pause().is_some());
        assert!(timer.pause().is_none());
        assert_eq!(timer.state(), TimerState::Paused);
        assert!(timer.start(0).is_some());
        assert!(timer.is_running());
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut timer = PomodoroTimer::default();
        assert!(timer.pause().is_none());
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn tick_counts_down_and_ignores_idle() {
        let mut timer = PomodoroTimer::new(1, 1);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 60);
        timer.start(0);
        timer.tick();
        assert_eq!(timer.remaining_secs(), 59);
        assert_eq!(timer.display(), "00:59");
    }

    #[test]
    fn work_phase_completion_loads_break() {
        let mut timer = PomodoroTimer::new(1, 2);
        timer.start(0);
        let ev = run_out(&mut timer).unwrap();
        assert!(matches!(
            ev,
            Event::PhaseCompleted {
                phase: Phase::Work,
                next: Phase::Break,
                ..
            }
        ));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.remaining_secs(), 120);
    }

    #[test]
    fn break_completion_returns_to_work() {
        let mut timer = PomodoroTimer::new(1, 1);
        timer.start(0);
        run_out(&mut timer);
        timer.start(0);
        run_out(&mut timer);
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn reset_restores_work_duration() {
        let mut timer = PomodoroTimer::new(1, 1);
        timer.start(0);
        run_out(&mut timer);
        timer.reset();
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.display(), "01:00");
    }

    #[test]
    fn catch_up_replays_elapsed_seconds() {
        let mut timer = PomodoroTimer::new(1, 1);
        timer.start(10_000);
        assert!(timer.catch_up(40_500).is_none());
        assert_eq!(timer.remaining_secs(), 30);
        // The half second carries over.
        assert!(timer.catch_up(41_000).is_none());
        assert_eq!(timer.remaining_secs(), 29);
    }

    #[test]
    fn catch_up_stops_at_phase_end() {
        let mut timer = PomodoroTimer::new(1, 1);
        timer.start(0);
        let ev = timer.catch_up(10 * 60 * 1000);
        assert!(matches!(ev, Some(Event::PhaseCompleted { .. })));
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn persisted_timer_round_trips() {
        let mut timer = PomodoroTimer::new(25, 5);
        timer.start(1_000);
        let json = serde_json::to_string(&timer).unwrap();
        let back: PomodoroTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timer);
    }
}
