//! Task list commands for CLI.

use clap::Subcommand;
use focusroom_core::TaskStatus;

use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task (at most three open at a time)
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List,
    /// Mark a task done
    Done {
        /// Task ID or unique prefix
        id: String,
    },
    /// Reopen a task
    Todo {
        /// Task ID or unique prefix
        id: String,
    },
    /// Carry a task over to the next focus phase; all open tasks if no ID
    Carry {
        /// Task ID or unique prefix
        id: Option<String>,
    },
    /// Delete a task
    Remove {
        /// Task ID or unique prefix
        id: String,
    },
    /// Delete all done tasks
    Clear,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        TaskAction::Add { text } => {
            let task = session.add_task(&text)?;
            eprintln!("Task added: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List => print_json(session.tasks().tasks())?,
        TaskAction::Done { id } => print_json(&session.set_task_status(&id, TaskStatus::Done)?)?,
        TaskAction::Todo { id } => print_json(&session.set_task_status(&id, TaskStatus::Todo)?)?,
        TaskAction::Carry { id: Some(id) } => {
            print_json(&session.set_task_status(&id, TaskStatus::Carry)?)?
        }
        TaskAction::Carry { id: None } => {
            let changed = session.carry_over_tasks();
            eprintln!("{changed} task(s) carried over");
        }
        TaskAction::Remove { id } => print_json(&session.remove_task(&id)?)?,
        TaskAction::Clear => {
            let removed = session.clear_done_tasks();
            eprintln!("{removed} done task(s) removed");
        }
    }
    Ok(())
}
