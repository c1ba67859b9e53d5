//! Timer settings.
//!
//! Out-of-range input is never rejected; every value is clamped to the
//! nearest bound instead.

use serde::{Deserialize, Serialize};

use crate::timer::Phase;

pub const FOCUS_MINUTES_RANGE: (u32, u32) = (10, 90);
pub const SHORT_BREAK_MINUTES_RANGE: (u32, u32) = (2, 30);
pub const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (5, 60);
pub const LONG_BREAK_EVERY_RANGE: (u32, u32) = (2, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
    #[serde(default)]
    pub auto_start_next: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_every() -> u32 {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_every: default_long_break_every(),
            auto_start_next: false,
        }
    }
}

fn clamp(value: u32, (lo, hi): (u32, u32)) -> u32 {
    value.clamp(lo, hi)
}

impl Settings {
    /// Copy with every numeric field forced into its allowed range.
    pub fn clamped(self) -> Self {
        Self {
            focus_minutes: clamp(self.focus_minutes, FOCUS_MINUTES_RANGE),
            short_break_minutes: clamp(self.short_break_minutes, SHORT_BREAK_MINUTES_RANGE),
            long_break_minutes: clamp(self.long_break_minutes, LONG_BREAK_MINUTES_RANGE),
            long_break_every: clamp(self.long_break_every, LONG_BREAK_EVERY_RANGE),
            auto_start_next: self.auto_start_next,
        }
    }

    pub fn phase_minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        }
    }

    /// Full duration of a phase in seconds, never zero.
    pub fn phase_secs(&self, phase: Phase) -> u32 {
        self.phase_minutes(phase).saturating_mul(60).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.focus_minutes, 25);
        assert_eq!(s.short_break_minutes, 5);
        assert_eq!(s.long_break_minutes, 15);
        assert_eq!(s.long_break_every, 4);
        assert!(!s.auto_start_next);
    }

    #[test]
    fn clamps_to_nearest_bound() {
        let s = Settings {
            focus_minutes: 3,
            short_break_minutes: 99,
            long_break_minutes: 0,
            long_break_every: 20,
            auto_start_next: true,
        }
        .clamped();
        assert_eq!(s.focus_minutes, 10);
        assert_eq!(s.short_break_minutes, 30);
        assert_eq!(s.long_break_minutes, 5);
        assert_eq!(s.long_break_every, 8);
        assert!(s.auto_start_next);
    }

    #[test]
    fn phase_secs_never_zero() {
        let s = Settings {
            focus_minutes: 0,
            ..Settings::default()
        };
        assert_eq!(s.phase_secs(Phase::Focus), 1);
        assert_eq!(Settings::default().phase_secs(Phase::ShortBreak), 300);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"focus_minutes": 50}"#).unwrap();
        assert_eq!(s.focus_minutes, 50);
        assert_eq!(s.long_break_every, 4);
    }
}
