//! Periodic driver for a [`FocusSession`].
//!
//! [`spawn`] moves the session into a single tokio task. That task owns the
//! only interval that calls `tick()` and also receives UI commands over a
//! channel, so commands and ticks are applied one at a time, in the order
//! they arrive. The interval is only polled while the timer is running and
//! is re-armed whenever the timer starts, which makes pausing a real stop.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::clock::Clock;
use crate::events::Event;
use crate::session::FocusSession;
use crate::settings::Settings;
use crate::timer::Phase;

#[derive(Debug)]
pub enum Command {
    Start,
    Pause,
    Skip,
    ResetCurrent,
    SwitchPhase(Phase),
    UpdateSettings(Settings),
    Snapshot(oneshot::Sender<Event>),
    Shutdown,
}

/// Cloneable handle for sending commands to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Returns `false` once the session task has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub async fn snapshot(&self) -> Option<Event> {
        let (tx, rx) = oneshot::channel();
        if !self.send(Command::Snapshot(tx)) {
            return None;
        }
        rx.await.ok()
    }

    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }
}

/// Running session task.
pub struct Ticker<C: Clock> {
    pub handle: SessionHandle,
    /// Every event the session produces, in order.
    pub events: mpsc::UnboundedReceiver<Event>,
    /// Resolves to the torn-down session after [`Command::Shutdown`] or once
    /// every handle is dropped.
    pub join: JoinHandle<FocusSession<C>>,
}

/// Drive `session` on the current tokio runtime, ticking every `period`.
pub fn spawn<C: Clock + 'static>(session: FocusSession<C>, period: Duration) -> Ticker<C> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let join = tokio::spawn(run(session, period, command_rx, event_tx));
    Ticker {
        handle: SessionHandle {
            commands: command_tx,
        },
        events: event_rx,
        join,
    }
}

async fn run<C: Clock>(
    mut session: FocusSession<C>,
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<Event>,
) -> FocusSession<C> {
    let period = period.max(Duration::from_millis(1));
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::debug!(?period, "session ticker started");

    let emit = |produced: Vec<Event>| {
        for event in produced {
            // Nobody listening is fine; the session keeps running.
            let _ = events.send(event);
        }
    };

    loop {
        let was_running = session.is_running();
        tokio::select! {
            biased;
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Start => emit(session.start()),
                    Command::Pause => emit(session.pause()),
                    Command::Skip => emit(session.skip()),
                    Command::ResetCurrent => emit(session.reset_current()),
                    Command::SwitchPhase(phase) => emit(session.switch_phase(phase)),
                    Command::UpdateSettings(settings) => emit(session.update_settings(settings)),
                    Command::Snapshot(reply) => {
                        let _ = reply.send(session.snapshot());
                    }
                    Command::Shutdown => break,
                }
            }
            _ = interval.tick(), if was_running => {
                emit(session.tick());
            }
        }
        if !was_running && session.is_running() {
            interval.reset();
        }
    }

    emit(session.teardown());
    tracing::debug!("session ticker stopped");
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sinks::LogSink;
    use crate::storage::MemoryStore;
    use chrono::{Local, TimeZone};

    fn session() -> FocusSession<ManualClock> {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap());
        FocusSession::init(clock, MemoryStore::new(), LogSink, 1200)
    }

    fn remaining(event: Option<Event>) -> u32 {
        match event {
            Some(Event::StateSnapshot {
                seconds_remaining, ..
            }) => seconds_remaining,
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_only_while_running() {
        let ticker = spawn(session(), Duration::from_secs(1));
        let handle = ticker.handle.clone();

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(remaining(handle.snapshot().await), 25 * 60);

        handle.send(Command::Start);
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(remaining(handle.snapshot().await), 25 * 60 - 3);

        handle.send(Command::Pause);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(remaining(handle.snapshot().await), 25 * 60 - 3);

        handle.shutdown();
        let session = ticker.join.await.unwrap();
        assert!(!session.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn commands_and_ticks_arrive_in_order() {
        let mut ticker = spawn(session(), Duration::from_secs(1));
        let handle = ticker.handle.clone();
        handle.send(Command::SwitchPhase(Phase::ShortBreak));
        handle.send(Command::Start);
        time::sleep(Duration::from_millis(5 * 60 * 1000 + 500)).await;
        handle.shutdown();
        let session = ticker.join.await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = ticker.events.try_recv() {
            kinds.push(match event {
                Event::PhaseSwitched { .. } => "switched",
                Event::PhaseStarted { .. } => "started",
                Event::PhaseCompleted { .. } => "completed",
                _ => "other",
            });
        }
        assert_eq!(kinds, vec!["switched", "started", "completed"]);
        assert_eq!(session.timer_state().phase, Phase::Focus);
        assert_eq!(session.log().len(), 1);
    }
}
