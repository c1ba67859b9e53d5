use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::timer::Phase;

/// Every state change in the focus session produces an Event.
/// The UI renders from snapshots and reacts to the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Daily counters were reset for a new calendar day.
    DailyRollover {
        date: NaiveDate,
    },
    PhaseStarted {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        phase: Phase,
        next: Phase,
        minutes_completed: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    PhaseSkipped {
        phase: Phase,
        next: Phase,
        skips_today: u32,
        at: DateTime<Utc>,
    },
    PhaseReset {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    PhaseSwitched {
        from: Phase,
        to: Phase,
        at: DateTime<Utc>,
    },
    StreakAdvanced {
        streak: u32,
        best_streak: u32,
    },
    /// Too many skips today; no more streak credit until tomorrow.
    StreakLocked {
        skips_today: u32,
    },
    SettingsChanged {
        settings: Settings,
    },
    StateSnapshot {
        phase: Phase,
        seconds_remaining: u32,
        running: bool,
        cycle_count: u32,
        streak: u32,
        best_streak: u32,
        focus_minutes_today: u32,
        completed_focus_today: u32,
        skips_today: u32,
        streak_locked_today: bool,
        at: DateTime<Utc>,
    },
}
