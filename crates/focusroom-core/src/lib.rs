//! # Focusroom Core Library
//!
//! This library provides the focus-session logic behind the Focusroom study
//! timer: a Pomodoro-style phase timer, a daily streak with an anti-cheat
//! guard, an append-only session log and the statistics derived from it.
//! The `focusroom-cli` binary is a thin UI over the same library.
//!
//! ## Architecture
//!
//! - **Phase Timer**: a tick-driven state machine over Focus / Short Break /
//!   Long Break; the caller invokes `tick()` once per second
//! - **Streak Tracker**: consecutive-day streak, lazily rolled over per day,
//!   locked for the day after too many skips
//! - **Session Log**: capped, append-only record of every phase attempt
//! - **Storage**: a small key-value store (SQLite or in-memory) plus a TOML
//!   config file
//!
//! ## Key Components
//!
//! - [`FocusSession`]: the session controller that owns all of the above
//! - [`ticker::spawn`]: drives a session from a single tokio task
//! - [`PhaseTimer`]: phase/countdown state machine
//! - [`StreakState`]: streak and daily counters

pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod session_log;
pub mod settings;
pub mod sinks;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod task;
pub mod ticker;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use session::{FocusSession, LoadedState};
pub use session_log::{InFlightEntry, Outcome, SessionLog, SessionLogEntry};
pub use settings::Settings;
pub use sinks::{Cue, FeedbackSink, LogSink, NullSink};
pub use stats::{DaySummary, HourlyHistogram};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use streak::{StreakState, StreakUpdate};
pub use task::{Task, TaskList, TaskStatus};
pub use timer::{Phase, PhaseTimer, TimerState};
