//! Focus timer commands.
//!
//! The timer is persisted between invocations. Every command first replays
//! the wall-clock time elapsed since the last call, so a running timer keeps
//! counting down while no process is attached.

use clap::Subcommand;
use habitmanager_core::timer::now_ms;
use habitmanager_core::{Event, HabitManager, PomodoroTimer};
use std::time::Duration;

use super::{open_manager, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Stop and reload the work phase
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground until the phase ends
    Watch,
}

/// Print an event and credit a finished work phase.
fn settle(mgr: &mut HabitManager, event: &Event) -> CmdResult {
    print_json(event)?;
    if let Some(outcome) = mgr.on_timer_event(event)? {
        print_json(&outcome)?;
    }
    Ok(())
}

fn catch_up(mgr: &mut HabitManager, timer: &mut PomodoroTimer) -> CmdResult {
    if let Some(event) = timer.catch_up(now_ms()) {
        settle(mgr, &event)?;
    }
    Ok(())
}

async fn watch(mgr: &mut HabitManager, timer: &mut PomodoroTimer) -> CmdResult {
    if let Some(event) = timer.start(now_ms()) {
        print_json(&event)?;
    }
    mgr.save_timer(timer)?;

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        if let Some(event) = timer.tick() {
            settle(mgr, &event)?;
            return Ok(());
        }
        eprint!("\r{}", timer.display());
    }
}

pub fn run(action: TimerAction) -> CmdResult {
    let mut mgr = open_manager()?;
    let mut timer = mgr.load_timer();
    catch_up(&mut mgr, &mut timer)?;

    match action {
        TimerAction::Start => match timer.start(now_ms()) {
            Some(event) => print_json(&event)?,
            None => print_json(&timer.snapshot())?,
        },
        TimerAction::Pause => match timer.pause() {
            Some(event) => print_json(&event)?,
            None => print_json(&timer.snapshot())?,
        },
        TimerAction::Reset => {
            print_json(&timer.reset())?;
        }
        TimerAction::Status => {
            print_json(&timer.snapshot())?;
        }
        TimerAction::Watch => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(watch(&mut mgr, &mut timer))?;
        }
    }

    mgr.save_timer(&timer)?;
    Ok(())
}
