//! Task-list use-cases for an authenticated principal.
//!
//! # Responsibility
//! - List and create tasks in the principal's own collection.
//! - Gate edits and removals through the ownership guard.
//!
//! # Invariants
//! - Creation always attaches the task to the calling principal.
//! - Edit validates the new title before any store read.
//! - A refused ownership check returns `Forbidden` without touching the store
//!   and without revealing whether the id exists elsewhere.

use crate::auth::credentials::Principal;
use crate::auth::ownership::OwnershipGuard;
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

pub struct TaskService<T: TaskRepository + Clone> {
    tasks: T,
    guard: OwnershipGuard<T>,
}

impl<T: TaskRepository + Clone> TaskService<T> {
    pub fn new(tasks: T) -> Self {
        let guard = OwnershipGuard::new(tasks.clone());
        Self { tasks, guard }
    }

    pub fn guard(&self) -> &OwnershipGuard<T> {
        &self.guard
    }

    /// Returns the caller's tasks only.
    pub fn list_tasks(&self, principal: &Principal) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.find_by_user_name(principal.name())?)
    }

    /// Creates a not-done task owned by the caller and returns it.
    pub fn create_task(&self, principal: &Principal, title: &str) -> ServiceResult<Task> {
        let task = Task::new(title)?;
        self.tasks.add(principal.name(), &task)?;
        info!("event=task_create module=service status=ok task_id={}", task.id());
        Ok(task)
    }

    /// Replaces title and done flag of one of the caller's tasks.
    pub fn edit_task(
        &self,
        principal: &Principal,
        id: TaskId,
        title: &str,
        done: bool,
    ) -> ServiceResult<Task> {
        let task = Task::with_id(id, title, done)?;
        self.ensure_owner(principal, id)?;
        self.tasks.update(&task)?;
        info!("event=task_edit module=service status=ok task_id={id}");
        Ok(task)
    }

    /// Removes one of the caller's tasks.
    pub fn remove_task(&self, principal: &Principal, id: TaskId) -> ServiceResult<()> {
        self.ensure_owner(principal, id)?;
        self.tasks.remove_by_id(id)?;
        info!("event=task_remove module=service status=ok task_id={id}");
        Ok(())
    }

    fn ensure_owner(&self, principal: &Principal, id: TaskId) -> ServiceResult<()> {
        if self.guard.is_owner(principal.name(), id)? {
            return Ok(());
        }
        warn!("event=task_mutation module=service status=forbidden task_id={id}");
        Err(ServiceError::Forbidden(
            "the task is not in the caller's list".to_string(),
        ))
    }
}
