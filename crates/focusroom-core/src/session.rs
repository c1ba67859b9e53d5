//! Focus session controller.
//!
//! [`FocusSession`] is the single owner of everything the focus screen
//! shows: settings, the phase timer, the session log, streak counters and
//! the task list. The UI calls its operations and renders what it returns.
//!
//! Every mutating operation follows the same order:
//!
//! 1. apply the daily rollover for "now",
//! 2. apply the triggering event,
//! 3. persist whatever changed (best effort).
//!
//! Persistence failures are logged and otherwise ignored; the in-memory
//! state stays authoritative for the lifetime of the session.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::{date_key, Clock, SystemClock};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::session_log::{Outcome, SessionLog};
use crate::settings::Settings;
use crate::sinks::{Cue, FeedbackSink, PHASE_END_VIBRATION};
use crate::stats::{self, DaySummary, HourlyHistogram};
use crate::storage::{Config, Database, KvStore, SETTINGS_KEY, STATS_KEY, TASKS_KEY};
use crate::streak::{StreakState, StreakUpdate};
use crate::task::{Task, TaskList, TaskStatus};
use crate::timer::{Phase, PhaseEnd, PhaseTimer, TimerState};

/// Seconds at the end of a phase that get an audible countdown.
const COUNTDOWN_CUE_SECS: u32 = 10;

/// Persisted form of the streak and log.
#[derive(Debug, Default, Deserialize)]
struct StatsRecord {
    #[serde(default)]
    streak: StreakState,
    #[serde(default)]
    log: SessionLog,
    #[serde(default)]
    last_phase: Option<Phase>,
}

#[derive(Serialize)]
struct StatsRecordRef<'a> {
    streak: &'a StreakState,
    log: &'a SessionLog,
    last_phase: Phase,
}

/// Everything restored from storage when a session starts.
///
/// Only the current phase survives a reload; the countdown itself always
/// starts over from the phase's full duration.
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub settings: Settings,
    pub streak: StreakState,
    pub log: SessionLog,
    pub last_phase: Option<Phase>,
    pub tasks: TaskList,
}

impl LoadedState {
    /// Read the three keys, falling back to defaults for anything missing or
    /// unreadable.
    pub fn load(store: &dyn KvStore) -> Self {
        let settings = load_json::<Settings>(store, SETTINGS_KEY)
            .unwrap_or_default()
            .clamped();
        let stats = load_json::<StatsRecord>(store, STATS_KEY).unwrap_or_default();
        let tasks = load_json::<TaskList>(store, TASKS_KEY).unwrap_or_default();
        Self {
            settings,
            streak: stats.streak,
            log: stats.log,
            last_phase: stats.last_phase,
            tasks,
        }
    }
}

/// The focus screen's state machine: timer, log, streak and tasks behind one API.
pub struct FocusSession<C: Clock = SystemClock> {
    clock: C,
    store: Box<dyn KvStore>,
    sink: Box<dyn FeedbackSink>,
    settings: Settings,
    timer: PhaseTimer,
    log: SessionLog,
    streak: StreakState,
    tasks: TaskList,
}

impl<C: Clock> FocusSession<C> {
    /// Load state from `store` and build a paused session.
    pub fn init(
        clock: C,
        store: impl KvStore + 'static,
        sink: impl FeedbackSink + 'static,
        history_cap: usize,
    ) -> Self {
        let mut state = LoadedState::load(&store);
        state.log.set_cap(history_cap);
        Self::from_state(clock, Box::new(store), Box::new(sink), state)
    }

    /// Open the session persisted in the data directory, keeping as much
    /// history as `config.toml` allows.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or the database
    /// cannot be opened.
    pub fn open(clock: C, sink: impl FeedbackSink + 'static) -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        tracing::debug!(history_cap = config.history.cap, "opening persisted session");
        Ok(Self::init(clock, db, sink, config.history.cap))
    }

    pub fn from_state(
        clock: C,
        store: Box<dyn KvStore>,
        sink: Box<dyn FeedbackSink>,
        state: LoadedState,
    ) -> Self {
        let settings = state.settings.clamped();
        let mut timer = PhaseTimer::new(&settings);
        if let Some(phase) = state.last_phase {
            timer.switch_phase(phase, &settings);
        }
        let mut session = Self {
            clock,
            store,
            sink,
            settings,
            timer,
            log: state.log,
            streak: state.streak,
            tasks: state.tasks,
        };
        let today = date_key(session.clock.now());
        if session.streak.apply_daily_rollover(today) {
            tracing::debug!(%today, "daily counters reset on load");
        }
        session
    }

    /// Stop the countdown and write everything out. The in-flight entry, if
    /// any, is dropped with the session.
    pub fn teardown(&mut self) -> Vec<Event> {
        let events = self.pause();
        self.save_settings();
        self.save_stats();
        self.save_tasks();
        tracing::debug!("focus session torn down");
        events
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn cycle_count(&self) -> u32 {
        self.timer.cycle_count()
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn today(&self) -> NaiveDate {
        date_key(self.clock.now())
    }

    pub fn today_focus_minutes(&self) -> u32 {
        stats::daily_focus_minutes(&self.log, self.today())
    }

    pub fn week_series(&self) -> Vec<DaySummary> {
        stats::last_7_days_series(&self.log, self.today())
    }

    pub fn hourly_histogram(&self) -> HourlyHistogram {
        stats::hourly_histogram(&self.log)
    }

    /// Read-only view of the session. Stale daily counters (no event yet
    /// today) are shown as already rolled over.
    pub fn snapshot(&self) -> Event {
        let now = self.clock.now();
        let today = date_key(now);
        let mut daily = self.streak.clone();
        daily.apply_daily_rollover(today);
        let timer = self.timer.state();
        Event::StateSnapshot {
            phase: timer.phase,
            seconds_remaining: timer.seconds_remaining,
            running: timer.running,
            cycle_count: self.timer.cycle_count(),
            streak: self.streak.current_streak(today),
            best_streak: self.streak.best_streak,
            focus_minutes_today: daily.focus_minutes_today,
            completed_focus_today: daily.completed_focus_today,
            skips_today: daily.skips_today,
            streak_locked_today: daily.streak_locked_today,
            at: now.with_timezone(&Utc),
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        let (now, mut events) = self.begin();
        if self.timer.start(&self.settings, now) {
            let state = self.timer.state();
            tracing::debug!(phase = ?state.phase, seconds = state.seconds_remaining, "phase started");
            self.sink.play(Cue::PhaseStart);
            events.push(Event::PhaseStarted {
                phase: state.phase,
                seconds_remaining: state.seconds_remaining,
                at: now.with_timezone(&Utc),
            });
        }
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let (now, mut events) = self.begin();
        if self.timer.pause() {
            let state = self.timer.state();
            tracing::debug!(phase = ?state.phase, seconds = state.seconds_remaining, "timer paused");
            events.push(Event::TimerPaused {
                phase: state.phase,
                seconds_remaining: state.seconds_remaining,
                at: now.with_timezone(&Utc),
            });
        }
        events
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        let (now, mut events) = self.begin();
        match self.timer.tick(&self.settings, now) {
            Some(end) => {
                let phase = end.entry.phase;
                self.sink.play(Cue::PhaseEnd);
                self.sink.notify(
                    &format!("{phase} complete"),
                    &format!("Up next: {}", end.next),
                );
                self.sink.vibrate(&PHASE_END_VIBRATION);
                self.record_end(end, now, &mut events);
            }
            None => {
                let remaining = self.timer.seconds_remaining();
                if self.timer.is_running() && remaining <= COUNTDOWN_CUE_SECS {
                    self.sink.play(Cue::CountdownTick);
                }
            }
        }
        events
    }

    /// Restart the current phase from its full duration, paused. Nothing is
    /// logged for the abandoned attempt.
    pub fn reset_current(&mut self) -> Vec<Event> {
        let (now, mut events) = self.begin();
        if let Some(dropped) = self.timer.reset_current(&self.settings) {
            tracing::debug!(id = %dropped.id, phase = ?dropped.phase, "in-flight entry discarded");
        }
        let state = self.timer.state();
        events.push(Event::PhaseReset {
            phase: state.phase,
            seconds_remaining: state.seconds_remaining,
            at: now.with_timezone(&Utc),
        });
        events
    }

    pub fn skip(&mut self) -> Vec<Event> {
        let (now, mut events) = self.begin();
        let end = self.timer.skip(&self.settings, now);
        self.record_end(end, now, &mut events);
        events
    }

    pub fn switch_phase(&mut self, target: Phase) -> Vec<Event> {
        let (now, mut events) = self.begin();
        let from = self.timer.phase();
        if let Some(dropped) = self.timer.switch_phase(target, &self.settings) {
            tracing::debug!(id = %dropped.id, phase = ?dropped.phase, "in-flight entry discarded");
        }
        events.push(Event::PhaseSwitched {
            from,
            to: target,
            at: now.with_timezone(&Utc),
        });
        self.save_stats();
        events
    }

    /// Replace the settings (clamped). A paused, untouched phase picks up
    /// its new duration immediately; otherwise the change applies from the
    /// next phase.
    pub fn update_settings(&mut self, settings: Settings) -> Vec<Event> {
        let (_, mut events) = self.begin();
        let settings = settings.clamped();
        if settings == self.settings {
            return events;
        }
        self.settings = settings;
        self.timer.refresh_duration(&self.settings);
        self.save_settings();
        tracing::info!(?settings, "settings updated");
        events.push(Event::SettingsChanged { settings });
        events
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, text: &str) -> Result<Task, ValidationError> {
        self.begin();
        let task = self.tasks.add(text)?.clone();
        self.save_tasks();
        Ok(task)
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<Task, ValidationError> {
        self.begin();
        let task = self.tasks.set_status(id, status)?.clone();
        self.save_tasks();
        Ok(task)
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task, ValidationError> {
        self.begin();
        let task = self.tasks.remove(id)?;
        self.save_tasks();
        Ok(task)
    }

    pub fn clear_done_tasks(&mut self) -> usize {
        self.begin();
        let removed = self.tasks.clear_done();
        if removed > 0 {
            self.save_tasks();
        }
        removed
    }

    pub fn carry_over_tasks(&mut self) -> usize {
        self.begin();
        let changed = self.tasks.carry_over_unfinished();
        if changed > 0 {
            self.save_tasks();
        }
        changed
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Read the clock once and roll the daily counters over if the day
    /// changed since the last event.
    fn begin(&mut self) -> (DateTime<Local>, Vec<Event>) {
        let now = self.clock.now();
        let today = date_key(now);
        let mut events = Vec::new();
        if self.streak.apply_daily_rollover(today) {
            tracing::info!(%today, "daily counters rolled over");
            events.push(Event::DailyRollover { date: today });
            self.save_stats();
        }
        (now, events)
    }

    fn record_end(&mut self, end: PhaseEnd, now: DateTime<Local>, events: &mut Vec<Event>) {
        let PhaseEnd {
            entry,
            outcome,
            next,
            auto_started,
        } = end;
        let today = date_key(now);
        let at = now.with_timezone(&Utc);
        let phase = entry.phase;

        match outcome {
            Outcome::Completed => {
                tracing::info!(?phase, ?next, minutes = entry.minutes_completed, "phase completed");
                events.push(Event::PhaseCompleted {
                    phase,
                    next,
                    minutes_completed: entry.minutes_completed,
                    auto_started,
                    at,
                });
                if phase == Phase::Focus {
                    match self.streak.on_focus_completed(today, entry.minutes_completed) {
                        StreakUpdate::Advanced {
                            streak,
                            best_streak,
                        } => {
                            tracing::info!(streak, best_streak, "streak advanced");
                            events.push(Event::StreakAdvanced {
                                streak,
                                best_streak,
                            });
                        }
                        StreakUpdate::Locked => {
                            tracing::debug!("streak locked today; completion not counted")
                        }
                        StreakUpdate::AlreadyCounted => {}
                    }
                }
            }
            Outcome::Skipped => {
                let locked = self.streak.on_skip(today);
                let skips_today = self.streak.skips_today;
                tracing::info!(?phase, ?next, skips_today, "phase skipped");
                events.push(Event::PhaseSkipped {
                    phase,
                    next,
                    skips_today,
                    at,
                });
                if locked {
                    tracing::warn!(skips_today, "too many skips; streak locked for today");
                    events.push(Event::StreakLocked { skips_today });
                }
            }
        }

        self.log.append(entry);

        if auto_started {
            let state = self.timer.state();
            self.sink.play(Cue::PhaseStart);
            events.push(Event::PhaseStarted {
                phase: state.phase,
                seconds_remaining: state.seconds_remaining,
                at,
            });
        }
        self.save_stats();
    }

    fn save_settings(&self) {
        save_json(self.store.as_ref(), SETTINGS_KEY, &self.settings);
    }

    fn save_stats(&self) {
        let record = StatsRecordRef {
            streak: &self.streak,
            log: &self.log,
            last_phase: self.timer.phase(),
        };
        save_json(self.store.as_ref(), STATS_KEY, &record);
    }

    fn save_tasks(&self) {
        save_json(self.store.as_ref(), TASKS_KEY, &self.tasks);
    }
}

fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    match store.load(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value unreadable; using defaults");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load; using defaults");
            None
        }
    }
}

fn save_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to serialize state");
            return;
        }
    };
    if let Err(e) = store.save(key, &json) {
        tracing::warn!(key, error = %e, "failed to persist state; continuing in memory");
    }
}
