//! To-do list store.

use serde::Serialize;

use super::{IdCounter, Rejection};

/// A to-do item with an optional free-text location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    /// Empty when no location was chosen.
    pub location: String,
}

/// Ordered task collection, most recent first.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdCounter,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task at the front of the list.
    ///
    /// Both inputs are trimmed. Blank `text` is rejected and consumes no id.
    pub fn add(&mut self, text: &str, location: &str) -> Result<Task, Rejection> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Rejection::EmptyText);
        }
        let task = Task {
            id: self.ids.issue(),
            text: text.to_string(),
            location: location.trim().to_string(),
        };
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Remove the task with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
