use clap::Subcommand;

use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the timer settings
    Show,
    /// Change timer settings; out-of-range values are clamped
    Set {
        /// Focus minutes (10-90)
        #[arg(long)]
        focus: Option<u32>,
        /// Short break minutes (2-30)
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break minutes (5-60)
        #[arg(long)]
        long_break: Option<u32>,
        /// Focus phases per long break (2-8)
        #[arg(long)]
        long_break_every: Option<u32>,
        /// Start the next phase automatically
        #[arg(long)]
        auto_start: Option<bool>,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        SettingsAction::Show => print_json(session.settings()),
        SettingsAction::Set {
            focus,
            short_break,
            long_break,
            long_break_every,
            auto_start,
        } => {
            let mut settings = *session.settings();
            if let Some(v) = focus {
                settings.focus_minutes = v;
            }
            if let Some(v) = short_break {
                settings.short_break_minutes = v;
            }
            if let Some(v) = long_break {
                settings.long_break_minutes = v;
            }
            if let Some(v) = long_break_every {
                settings.long_break_every = v;
            }
            if let Some(v) = auto_start {
                settings.auto_start_next = v;
            }
            session.update_settings(settings);
            print_json(session.settings())
        }
    }
}
