//! Daily focus streak with an anti-cheat guard.
//!
//! A streak is the number of consecutive local calendar days with at least
//! one naturally completed focus phase. Skipping too often in a single day
//! locks streak accrual for the rest of that day.
//!
//! Daily counters are rolled over lazily: every event handler first calls
//! [`StreakState::apply_daily_rollover`], so there is no background job
//! watching the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Skips per day at which the streak locks.
pub const SKIP_LOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakState {
    pub streak: u32,
    pub best_streak: u32,
    pub last_streak_date: Option<NaiveDate>,

    /// Day the daily counters below belong to.
    pub daily_key: Option<NaiveDate>,
    pub focus_minutes_today: u32,
    pub completed_focus_today: u32,
    pub skips_today: u32,
    pub streak_locked_today: bool,

    pub total_completed_focus_sessions: u64,
    pub total_focus_minutes: u64,
}

/// What a focus completion did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    Advanced { streak: u32, best_streak: u32 },
    /// A streak day was already earned today.
    AlreadyCounted,
    Locked,
}

impl StreakState {
    /// Reset the daily counters if `today` is a new day. Returns whether a
    /// reset happened. Calling it again on the same day is a no-op.
    pub fn apply_daily_rollover(&mut self, today: NaiveDate) -> bool {
        if self.daily_key == Some(today) {
            return false;
        }
        self.daily_key = Some(today);
        self.focus_minutes_today = 0;
        self.completed_focus_today = 0;
        self.skips_today = 0;
        self.streak_locked_today = false;
        true
    }

    pub fn on_focus_completed(&mut self, today: NaiveDate, focus_minutes: u32) -> StreakUpdate {
        self.apply_daily_rollover(today);

        self.focus_minutes_today += focus_minutes;
        self.completed_focus_today += 1;
        self.total_completed_focus_sessions += 1;
        self.total_focus_minutes += u64::from(focus_minutes);

        if self.streak_locked_today {
            return StreakUpdate::Locked;
        }
        if self.last_streak_date == Some(today) {
            return StreakUpdate::AlreadyCounted;
        }

        let yesterday = today.pred_opt();
        self.streak = if self.last_streak_date.is_some() && self.last_streak_date == yesterday {
            self.streak + 1
        } else {
            1
        };
        self.last_streak_date = Some(today);
        self.best_streak = self.best_streak.max(self.streak);

        StreakUpdate::Advanced {
            streak: self.streak,
            best_streak: self.best_streak,
        }
    }

    /// Count a skip. Returns `true` when this skip locked the streak.
    ///
    /// The lock only blocks later increments today; a streak day already
    /// earned today is kept.
    pub fn on_skip(&mut self, today: NaiveDate) -> bool {
        self.apply_daily_rollover(today);

        self.skips_today += 1;
        if self.skips_today >= SKIP_LOCK_THRESHOLD && !self.streak_locked_today {
            self.streak_locked_today = true;
            return true;
        }
        false
    }

    /// Streak as it should be displayed on `today`: a streak whose last day
    /// is older than yesterday is already broken. Does not mutate.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        match self.last_streak_date {
            Some(last) if last == today || Some(last) == today.pred_opt() => self.streak,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_completion_starts_streak() {
        let mut s = StreakState::default();
        assert_eq!(
            s.on_focus_completed(day(10), 25),
            StreakUpdate::Advanced { streak: 1, best_streak: 1 }
        );
        assert_eq!(s.focus_minutes_today, 25);
        assert_eq!(s.completed_focus_today, 1);
        assert_eq!(s.total_focus_minutes, 25);
    }

    #[test]
    fn increments_once_per_day() {
        let mut s = StreakState::default();
        s.on_focus_completed(day(10), 25);
        assert_eq!(s.on_focus_completed(day(10), 25), StreakUpdate::AlreadyCounted);
        assert_eq!(s.streak, 1);
        assert_eq!(s.completed_focus_today, 2);
        assert_eq!(s.focus_minutes_today, 50);
    }

    #[test]
    fn consecutive_days_extend_gap_resets() {
        let mut s = StreakState::default();
        s.on_focus_completed(day(10), 25);
        s.on_focus_completed(day(11), 25);
        assert_eq!(s.streak, 2);
        s.on_focus_completed(day(14), 25);
        assert_eq!(s.streak, 1);
        assert_eq!(s.best_streak, 2);
    }

    #[test]
    fn five_skips_lock_the_day() {
        let mut s = StreakState {
            streak: 3,
            best_streak: 3,
            last_streak_date: Some(day(9)),
            ..StreakState::default()
        };
        for _ in 0..4 {
            assert!(!s.on_skip(day(10)));
        }
        assert!(s.on_skip(day(10)));
        assert!(s.streak_locked_today);
        assert!(!s.on_skip(day(10)));
        assert_eq!(s.skips_today, 6);

        assert_eq!(s.on_focus_completed(day(10), 25), StreakUpdate::Locked);
        assert_eq!(s.streak, 3);
        assert_eq!(s.best_streak, 3);
        assert_eq!(s.completed_focus_today, 1);
    }

    #[test]
    fn completion_before_lock_is_kept() {
        let mut s = StreakState::default();
        s.on_focus_completed(day(10), 25);
        for _ in 0..5 {
            s.on_skip(day(10));
        }
        assert!(s.streak_locked_today);
        assert_eq!(s.streak, 1);
        assert_eq!(s.last_streak_date, Some(day(10)));
    }

    #[test]
    fn lock_lifts_next_day() {
        let mut s = StreakState::default();
        s.on_focus_completed(day(9), 25);
        for _ in 0..5 {
            s.on_skip(day(10));
        }
        assert_eq!(
            s.on_focus_completed(day(11), 25),
            StreakUpdate::Advanced { streak: 1, best_streak: 1 }
        );
        assert!(!s.streak_locked_today);
    }

    #[test]
    fn rollover_happens_once() {
        let mut s = StreakState::default();
        s.on_skip(day(10));
        s.on_focus_completed(day(10), 25);
        assert!(s.apply_daily_rollover(day(11)));
        assert_eq!(
            (s.focus_minutes_today, s.completed_focus_today, s.skips_today, s.streak_locked_today),
            (0, 0, 0, false)
        );
        s.on_skip(day(11));
        assert!(!s.apply_daily_rollover(day(11)));
        assert_eq!(s.skips_today, 1);
        assert_eq!(s.total_completed_focus_sessions, 1);
    }

    #[test]
    fn displayed_streak_drops_after_gap() {
        let mut s = StreakState::default();
        s.on_focus_completed(day(10), 25);
        assert_eq!(s.current_streak(day(10)), 1);
        assert_eq!(s.current_streak(day(11)), 1);
        assert_eq!(s.current_streak(day(12)), 0);
        assert_eq!(s.streak, 1);
    }
}
