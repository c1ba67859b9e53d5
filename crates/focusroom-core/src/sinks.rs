//! Fire-and-forget feedback: notifications, vibration and audio cues.
//!
//! Sinks are cosmetic. The session controller never waits on them and never
//! looks at what they do, so a sink that fails (no permission, no audio
//! device) simply does nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    PhaseStart,
    PhaseEnd,
    /// One of the last ten seconds of a phase.
    CountdownTick,
}

/// Vibration pattern used when a phase ends, in milliseconds (on, off, on).
pub const PHASE_END_VIBRATION: [u64; 3] = [200, 100, 200];

pub trait FeedbackSink: Send {
    fn notify(&self, _title: &str, _body: &str) {}
    fn vibrate(&self, _pattern: &[u64]) {}
    fn play(&self, _cue: Cue) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {}

/// Writes feedback to the `tracing` log instead of a device.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "notification");
    }

    fn vibrate(&self, pattern: &[u64]) {
        tracing::debug!(?pattern, "vibrate");
    }

    fn play(&self, cue: Cue) {
        tracing::trace!(?cue, "audio cue");
    }
}
