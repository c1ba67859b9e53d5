use chrono::{Local, TimeZone, Timelike};

use crate::session_log::SessionLog;

/// Completed focus sessions per local hour of day.
pub type HourlyHistogram = [u32; 24];

/// Buckets completed focus entries by the local hour they started in.
pub fn hourly_histogram(log: &SessionLog) -> HourlyHistogram {
    let mut buckets = [0u32; 24];
    for entry in log.entries().filter(|e| e.is_completed_focus()) {
        if let Some(started) = Local.timestamp_millis_opt(entry.started_at).single() {
            buckets[started.hour() as usize] += 1;
        }
    }
    buckets
}

/// Busiest hour, earliest on ties. `None` for an empty histogram.
pub fn peak_hour(histogram: &HourlyHistogram) -> Option<u32> {
    let max = *histogram.iter().max()?;
    if max == 0 {
        return None;
    }
    histogram.iter().position(|&n| n == max).map(|h| h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_log::{InFlightEntry, Outcome};
    use crate::timer::Phase;

    #[test]
    fn buckets_by_start_hour() {
        let mut log = SessionLog::default();
        for (h, phase, outcome) in [
            (9, Phase::Focus, Outcome::Completed),
            (9, Phase::Focus, Outcome::Completed),
            (14, Phase::Focus, Outcome::Completed),
            (14, Phase::Focus, Outcome::Skipped),
            (15, Phase::LongBreak, Outcome::Completed),
        ] {
            let start = Local.with_ymd_and_hms(2026, 3, 10, h, 40, 0).unwrap();
            let end = start + chrono::Duration::minutes(25);
            log.append(InFlightEntry::open(phase, 25, start).finalize(outcome, end));
        }
        let histogram = hourly_histogram(&log);
        assert_eq!(histogram[9], 2);
        assert_eq!(histogram[14], 1);
        assert_eq!(histogram[10], 0);
        assert_eq!(histogram[15], 0);
        assert_eq!(histogram.iter().sum::<u32>(), 3);
        assert_eq!(peak_hour(&histogram), Some(9));
    }

    #[test]
    fn empty_log_has_no_peak() {
        assert_eq!(peak_hour(&hourly_histogram(&SessionLog::default())), None);
    }
}
