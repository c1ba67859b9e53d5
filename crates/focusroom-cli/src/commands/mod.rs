pub mod config;
pub mod settings;
pub mod stats;
pub mod task;
pub mod timer;

use focusroom_core::{Cue, FeedbackSink, FocusSession, SystemClock};

/// Terminal feedback: a bell when a phase ends, the notification on stderr.
pub struct TerminalSink;

impl FeedbackSink for TerminalSink {
    fn notify(&self, title: &str, body: &str) {
        eprintln!("\u{7}{title} -- {body}");
    }

    fn play(&self, cue: Cue) {
        tracing::trace!(?cue, "cue");
    }
}

/// Open the persisted focus session from the default data directory.
pub fn open_session() -> Result<FocusSession<SystemClock>, Box<dyn std::error::Error>> {
    Ok(FocusSession::open(SystemClock, TerminalSink)?)
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
