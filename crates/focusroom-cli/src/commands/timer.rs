use std::time::Duration;

use clap::Subcommand;
use focusroom_core::ticker::{self, Command, SessionHandle};
use focusroom_core::{Config, Phase};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, reading commands from stdin
    Run,
    /// Print current timer state as JSON
    Status,
    /// Skip the current phase (counts toward today's skip limit)
    Skip,
    /// Switch to a phase without logging anything
    Switch {
        /// focus, short_break or long_break
        phase: String,
    },
}

const HELP: &str = "commands: s=start p=pause k=skip r=reset f=focus b=short break l=long break ?=status q=quit";

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run => run_foreground(),
        TimerAction::Status => {
            let session = open_session()?;
            print_json(&session.snapshot())
        }
        TimerAction::Skip => {
            let mut session = open_session()?;
            let events = session.skip();
            session.teardown();
            print_json(&events)
        }
        TimerAction::Switch { phase } => {
            let phase: Phase = phase.parse()?;
            let mut session = open_session()?;
            let events = session.switch_phase(phase);
            session.teardown();
            print_json(&events)
        }
    }
}

fn run_foreground() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let session = open_session()?;
    let period = Duration::from_millis(config.ticker.interval_ms);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut ticker = ticker::spawn(session, period);
        eprintln!("{HELP}");
        ticker.handle.send(Command::Start);
        let input = tokio::spawn(read_commands(ticker.handle.clone()));

        while let Some(event) = ticker.events.recv().await {
            println!("{}", serde_json::to_string(&event)?);
        }

        input.abort();
        ticker.join.await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

async fn read_commands(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let command = match line.trim() {
            "s" | "start" => Command::Start,
            "p" | "pause" => Command::Pause,
            "k" | "skip" => Command::Skip,
            "r" | "reset" => Command::ResetCurrent,
            "f" | "focus" => Command::SwitchPhase(Phase::Focus),
            "b" | "short" => Command::SwitchPhase(Phase::ShortBreak),
            "l" | "long" => Command::SwitchPhase(Phase::LongBreak),
            "?" | "status" => {
                if let Some(snapshot) = handle.snapshot().await {
                    if let Ok(json) = serde_json::to_string(&snapshot) {
                        println!("{json}");
                    }
                }
                continue;
            }
            "q" | "quit" => break,
            "" => continue,
            other => {
                eprintln!("unknown command '{other}'; {HELP}");
                continue;
            }
        };
        if !handle.send(command) {
            return;
        }
    }
    handle.shutdown();
}
