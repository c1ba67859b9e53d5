//! Append-only record of every phase attempt.
//!
//! A phase opens an [`InFlightEntry`] when it starts. When it ends naturally
//! or is skipped the entry is finalized into an immutable
//! [`SessionLogEntry`] and appended to the [`SessionLog`]. Resetting or
//! switching phases drops the in-flight entry without logging it.

use std::collections::VecDeque;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::date_key;
use crate::timer::Phase;

/// Default number of entries kept before the oldest are evicted.
pub const DEFAULT_LOG_CAP: usize = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Skipped,
}

/// A phase attempt that has started but not yet ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlightEntry {
    pub id: String,
    pub phase: Phase,
    pub started_at: DateTime<Local>,
    pub minutes_planned: u32,
}

impl InFlightEntry {
    pub fn open(phase: Phase, minutes_planned: u32, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            phase,
            started_at: now,
            minutes_planned,
        }
    }

    /// Freeze the attempt. Skipped phases earn no minutes, however close to
    /// the end they were.
    pub fn finalize(self, outcome: Outcome, now: DateTime<Local>) -> SessionLogEntry {
        let completed = outcome == Outcome::Completed;
        SessionLogEntry {
            id: self.id,
            date_key: date_key(now),
            started_at: self.started_at.timestamp_millis(),
            ended_at: now.timestamp_millis(),
            phase: self.phase,
            minutes_planned: self.minutes_planned,
            minutes_completed: if completed { self.minutes_planned } else { 0 },
            completed,
            skipped: !completed,
        }
    }
}

/// One finalized phase attempt. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub id: String,
    pub date_key: NaiveDate,
    pub started_at: i64,
    pub ended_at: i64,
    pub phase: Phase,
    pub minutes_planned: u32,
    pub minutes_completed: u32,
    pub completed: bool,
    pub skipped: bool,
}

impl SessionLogEntry {
    pub fn is_completed_focus(&self) -> bool {
        self.phase == Phase::Focus && self.completed
    }
}

/// FIFO-capped history of finalized entries.
///
/// Entries are only ever handed out by shared reference; the log grows by
/// [`SessionLog::append`] and shrinks only by evicting its oldest entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    #[serde(default)]
    entries: VecDeque<SessionLogEntry>,
    #[serde(default = "default_cap")]
    cap: usize,
}

fn default_cap() -> usize {
    DEFAULT_LOG_CAP
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::with_cap(DEFAULT_LOG_CAP)
    }
}

impl SessionLog {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the cap, evicting the oldest entries if the log is now too long.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        self.evict();
    }

    pub fn append(&mut self, entry: SessionLogEntry) {
        self.entries.push_back(entry);
        self.evict();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &SessionLogEntry> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&SessionLogEntry> {
        self.entries.back()
    }

    fn evict(&mut self) {
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }
}
