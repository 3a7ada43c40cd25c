//! Per-request task ownership check.
//!
//! # Invariants
//! - Ownership is read from the principal's own task collection on every
//!   call. Nothing is cached, so a result is never stale.
//! - The answer is only "owned" or "not owned"; a task owned by someone else
//!   and a task that does not exist look the same.

use crate::model::task::TaskId;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use log::debug;

/// Gates task updates and removals.
pub struct OwnershipGuard<T: TaskRepository> {
    tasks: T,
}

impl<T: TaskRepository> OwnershipGuard<T> {
    pub fn new(tasks: T) -> Self {
        Self { tasks }
    }

    /// Whether `task_id` is in the collection owned by `principal_name`.
    ///
    /// Cost is one store read plus a linear scan of that user's tasks.
    pub fn is_owner(&self, principal_name: &str, task_id: TaskId) -> RepoResult<bool> {
        let owned = self
            .tasks
            .find_by_user_name(principal_name)?
            .iter()
            .any(|task| task.id() == task_id);

        debug!("event=ownership_check module=auth owned={owned}");
        Ok(owned)
    }
}
