//! Short per-session todo list shown next to the timer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum number of tasks that are not done.
pub const MAX_ACTIVE_TASKS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Done,
    /// Unfinished, carried into the next focus phase.
    Carry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status != TaskStatus::Done
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_active()).count()
    }

    pub fn add(&mut self, text: &str) -> Result<&Task, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        self.ensure_room()?;
        self.tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            status: TaskStatus::Todo,
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Reopening a done task counts against the active limit.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<&Task, ValidationError> {
        let index = self.position(id)?;
        if !self.tasks[index].is_active() && status != TaskStatus::Done {
            self.ensure_room()?;
        }
        self.tasks[index].status = status;
        Ok(&self.tasks[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<Task, ValidationError> {
        let index = self.position(id)?;
        Ok(self.tasks.remove(index))
    }

    /// Drop done tasks. Returns how many were removed.
    pub fn clear_done(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        before - self.tasks.len()
    }

    /// Mark every open task as carried over. Returns how many changed.
    pub fn carry_over_unfinished(&mut self) -> usize {
        let mut changed = 0;
        for task in self.tasks.iter_mut().filter(|t| t.status == TaskStatus::Todo) {
            task.status = TaskStatus::Carry;
            changed += 1;
        }
        changed
    }

    fn ensure_room(&self) -> Result<(), ValidationError> {
        if self.active_count() >= MAX_ACTIVE_TASKS {
            return Err(ValidationError::TaskLimitReached {
                limit: MAX_ACTIVE_TASKS,
            });
        }
        Ok(())
    }

    /// Accepts a full id or a unique prefix of one.
    fn position(&self, id: &str) -> Result<usize, ValidationError> {
        if let Some(i) = self.tasks.iter().position(|t| t.id == id) {
            return Ok(i);
        }
        let mut matches = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !id.is_empty() && t.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some((i, _)), None) => Ok(i),
            _ => Err(ValidationError::TaskNotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_active_tasks() {
        let mut list = TaskList::default();
        for text in ["read ch. 3", "flashcards", "problem set"] {
            list.add(text).unwrap();
        }
        assert_eq!(
            list.add("one more"),
            Err(ValidationError::TaskLimitReached { limit: MAX_ACTIVE_TASKS })
        );

        let id = list.tasks()[0].id.clone();
        list.set_status(&id, TaskStatus::Done).unwrap();
        assert_eq!(list.active_count(), 2);
        list.add("one more").unwrap();
        assert_eq!(list.tasks().len(), 4);

        assert!(matches!(
            list.set_status(&id, TaskStatus::Todo),
            Err(ValidationError::TaskLimitReached { .. })
        ));
    }

    #[test]
    fn rejects_blank_text() {
        let mut list = TaskList::default();
        assert_eq!(list.add("   "), Err(ValidationError::EmptyTaskText));
    }

    #[test]
    fn carry_and_clear() {
        let mut list = TaskList::default();
        let a = list.add("a").unwrap().id.clone();
        list.add("b").unwrap();
        list.set_status(&a, TaskStatus::Done).unwrap();
        assert_eq!(list.carry_over_unfinished(), 1);
        assert_eq!(list.tasks()[1].status, TaskStatus::Carry);
        assert_eq!(list.clear_done(), 1);
        assert_eq!(list.tasks().len(), 1);
    }

    #[test]
    fn lookup_by_prefix() {
        let mut list = TaskList::default();
        let id = list.add("a").unwrap().id.clone();
        let removed = list.remove(&id[..8]).unwrap();
        assert_eq!(removed.id, id);
        assert!(matches!(list.remove(&id), Err(ValidationError::TaskNotFound(_))));
    }
}
