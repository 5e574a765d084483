//! Domain models for tasks.
//!
//! `Task` mirrors the wire representation returned by the Tasklane API;
//! `NewTask` and `TaskUpdate` are the request payloads for creation and
//! update. The API has no dedicated completion endpoint - completing a
//! task is an update with `is_completed` set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task belonging to the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task is overdue when its due date has passed and it is still open.
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => !self.is_completed && Utc::now() > due,
            None => false,
        }
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub content: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            description: String::new(),
            due_date: None,
        }
    }
}

/// Payload for updating a task.
///
/// The API replaces the full field set on every update, so an update is
/// built from the current task state and then modified.
#[derive(Debug, Clone, Serialize)]
pub struct TaskUpdate {
    pub content: String,
    pub description: String,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    pub fn from_task(task: &Task) -> Self {
        Self {
            content: task.content.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
            due_date: task.due_date,
        }
    }
}
