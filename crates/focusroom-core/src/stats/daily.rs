use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session_log::{SessionLog, SessionLogEntry};

/// Focus totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub minutes: u32,
    pub session_count: u32,
}

/// Minutes of completed focus attributed to `date`.
pub fn daily_focus_minutes(log: &SessionLog, date: NaiveDate) -> u32 {
    log.entries()
        .filter(|e| e.date_key == date && e.is_completed_focus())
        .map(|e| e.minutes_completed)
        .sum()
}

/// Seven summaries for `today - 6 ..= today`, oldest first, zero-filled.
pub fn last_7_days_series(log: &SessionLog, today: NaiveDate) -> Vec<DaySummary> {
    let mut series: Vec<DaySummary> = (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DaySummary {
            date,
            minutes: 0,
            session_count: 0,
        })
        .collect();

    for entry in log.entries().filter(|e| e.is_completed_focus()) {
        if let Some(day) = series.iter_mut().find(|d| d.date == entry.date_key) {
            day.minutes += entry.minutes_completed;
            day.session_count += 1;
        }
    }
    series
}

/// Share of the day's attempts (any phase) that ran to completion.
/// `None` when nothing was attempted.
pub fn completion_rate(log: &SessionLog, date: NaiveDate) -> Option<f64> {
    let (attempted, completed) = log
        .entries()
        .filter(|e| e.date_key == date)
        .fold((0u32, 0u32), |(a, c), e| (a + 1, c + u32::from(e.completed)));
    if attempted == 0 {
        return None;
    }
    Some(f64::from(completed) / f64::from(attempted))
}

/// Newest first.
pub fn recent_entries(log: &SessionLog, limit: usize) -> Vec<&SessionLogEntry> {
    log.entries().rev().take(limit).collect()
}
