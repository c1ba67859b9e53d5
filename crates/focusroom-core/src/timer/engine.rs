//! Phase timer implementation.
//!
//! The timer is a tick-driven state machine. It owns no thread or interval:
//! the caller invokes `tick()` once per elapsed second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! {Focus, ShortBreak, LongBreak} x {running, paused}
//!
//! Focus --complete--> ShortBreak | LongBreak (every Nth completion)
//! Focus --skip------> ShortBreak
//! Break --complete/skip--> Focus
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(&settings);
//! timer.start(&settings, clock.now());
//! // Once per second:
//! if let Some(end) = timer.tick(&settings, clock.now()) { /* log end.entry */ }
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::session_log::{InFlightEntry, Outcome, SessionLogEntry};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub running: bool,
}

/// Result of a phase ending, either naturally or by skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEnd {
    /// The finalized attempt, ready to append to the log.
    pub entry: SessionLogEntry,
    pub outcome: Outcome,
    pub next: Phase,
    /// Whether the next phase started running on its own.
    pub auto_started: bool,
}

/// Countdown plus cycle counter for the active phase.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    state: TimerState,
    /// Focus phases completed naturally since this timer was created.
    cycle_count: u32,
    in_flight: Option<InFlightEntry>,
}

impl PhaseTimer {
    /// Paused at the start of a focus phase.
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: TimerState {
                phase: Phase::Focus,
                seconds_remaining: settings.phase_secs(Phase::Focus),
                running: false,
            },
            cycle_count: 0,
            in_flight: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.state.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn in_flight(&self) -> Option<&InFlightEntry> {
        self.in_flight.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` if the timer was already running.
    ///
    /// A resumed phase keeps its original in-flight entry.
    pub fn start(&mut self, settings: &Settings, now: DateTime<Local>) -> bool {
        if self.state.running {
            return false;
        }
        self.state.running = true;
        if self.in_flight.is_none() {
            self.open_entry(settings, now);
        }
        true
    }

    /// Returns `false` if the timer was not running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.state.running, false)
    }

    /// Consume one second. Returns the phase end when the countdown hits zero.
    pub fn tick(&mut self, settings: &Settings, now: DateTime<Local>) -> Option<PhaseEnd> {
        if !self.state.running {
            return None;
        }
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining > 0 {
            return None;
        }

        let finished = self.state.phase;
        if finished == Phase::Focus {
            self.cycle_count += 1;
        }
        let next = finished.after_completion(self.cycle_count, settings.long_break_every);
        Some(self.finish(Outcome::Completed, next, settings, now))
    }

    /// Back to the full duration of the current phase, paused. The
    /// in-flight entry is dropped without being logged and handed back.
    pub fn reset_current(&mut self, settings: &Settings) -> Option<InFlightEntry> {
        self.state.running = false;
        self.state.seconds_remaining = settings.phase_secs(self.state.phase);
        self.in_flight.take()
    }

    /// End the current phase as skipped. A phase that was never started is
    /// still logged, starting now.
    pub fn skip(&mut self, settings: &Settings, now: DateTime<Local>) -> PhaseEnd {
        if self.in_flight.is_none() {
            self.open_entry(settings, now);
        }
        let next = self.state.phase.after_skip();
        self.finish(Outcome::Skipped, next, settings, now)
    }

    /// Manual phase selection; behaves like a reset into `target`.
    pub fn switch_phase(&mut self, target: Phase, settings: &Settings) -> Option<InFlightEntry> {
        self.state.phase = target;
        self.reset_current(settings)
    }

    /// Re-read the current phase duration after a settings change. Only an
    /// idle phase (paused, nothing in flight) is affected.
    pub fn refresh_duration(&mut self, settings: &Settings) -> bool {
        if self.state.running || self.in_flight.is_some() {
            return false;
        }
        self.state.seconds_remaining = settings.phase_secs(self.state.phase);
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn open_entry(&mut self, settings: &Settings, now: DateTime<Local>) {
        let phase = self.state.phase;
        self.in_flight = Some(InFlightEntry::open(phase, settings.phase_minutes(phase), now));
    }

    fn finish(
        &mut self,
        outcome: Outcome,
        next: Phase,
        settings: &Settings,
        now: DateTime<Local>,
    ) -> PhaseEnd {
        let entry = match self.in_flight.take() {
            Some(entry) => entry,
            None => InFlightEntry::open(
                self.state.phase,
                settings.phase_minutes(self.state.phase),
                now,
            ),
        }
        .finalize(outcome, now);

        self.state.phase = next;
        self.state.seconds_remaining = settings.phase_secs(next);
        self.state.running = settings.auto_start_next;
        if self.state.running {
            self.open_entry(settings, now);
        }

        PhaseEnd {
            entry,
            outcome,
            next,
            auto_started: self.state.running,
        }
    }
}
