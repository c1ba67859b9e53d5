mod engine;
mod phase;

pub use engine::{PhaseEnd, PhaseTimer, TimerState};
pub use phase::Phase;
