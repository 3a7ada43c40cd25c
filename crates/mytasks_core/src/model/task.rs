//! Task domain model.
//!
//! # Responsibility
//! - Define one entry of a per-user task list.
//! - Normalize and validate titles at construction.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reused.
//! - `title` is trimmed and never empty.
//! - A task does not know its owner. Callers holding an unscoped `Task` must
//!   re-derive ownership through the owner's task collection.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Validation failures raised by task constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "the title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Entry in a task list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    done: bool,
}

impl Task {
    /// Creates a not-yet-done task with a freshly generated id.
    pub fn new(title: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), title, false)
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used by storage read paths and by edits of existing tasks.
    pub fn with_id(id: TaskId, title: &str, done: bool) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: title.to_string(),
            done,
        })
    }

    /// Returns a copy with the same id and new content.
    pub fn copy_with(&self, title: &str, done: bool) -> Result<Self, TaskValidationError> {
        Self::with_id(self.id, title, done)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[derive(Deserialize)]
struct RawTask {
    id: TaskId,
    title: String,
    done: bool,
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawTask::deserialize(deserializer)?;
        Task::with_id(raw.id, &raw.title, raw.done).map_err(serde::de::Error::custom)
    }
}
