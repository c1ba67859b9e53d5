use clap::Subcommand;
use focusroom_core::stats;
use serde_json::json;

use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's counters
    Today,
    /// Focus minutes for the last seven days
    Week,
    /// Completed focus sessions by hour of day
    Hours,
    /// Current and best streak
    Streak,
    /// Most recent session log entries
    Log {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session()?;
    let today = session.today();
    let streak = session.streak();

    match action {
        StatsAction::Today => print_json(&json!({
            "date": today,
            "focus_minutes": session.today_focus_minutes(),
            "completed_focus": streak.completed_focus_today,
            "skips": streak.skips_today,
            "streak_locked": streak.streak_locked_today,
            "completion_rate": stats::completion_rate(session.log(), today),
        })),
        StatsAction::Week => print_json(&session.week_series()),
        StatsAction::Hours => {
            let histogram = session.hourly_histogram();
            print_json(&json!({
                "hours": histogram,
                "peak_hour": stats::peak_hour(&histogram),
            }))
        }
        StatsAction::Streak => print_json(&json!({
            "streak": streak.current_streak(today),
            "best_streak": streak.best_streak,
            "last_streak_date": streak.last_streak_date,
            "locked_today": streak.streak_locked_today,
            "total_completed_focus_sessions": streak.total_completed_focus_sessions,
            "total_focus_minutes": streak.total_focus_minutes,
        })),
        StatsAction::Log { limit } => print_json(&stats::recent_entries(session.log(), limit)),
    }
}
