//! Statistics derived from the session log.
//!
//! Everything here is a pure function over a [`SessionLog`](crate::session_log::SessionLog):
//! daily focus totals, the seven-day series shown on the dashboard, an
//! hour-of-day histogram and a few small helpers.

mod daily;
mod hourly;

pub use daily::{completion_rate, daily_focus_minutes, last_7_days_series, recent_entries, DaySummary};
pub use hourly::{hourly_histogram, peak_hour, HourlyHistogram};
