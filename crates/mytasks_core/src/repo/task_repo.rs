//! Task store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist tasks together with their owner association.
//! - Answer "tasks of user X" queries, the only ownership source of truth.
//!
//! # Invariants
//! - The owner of a task is written once, by `add`, and never exposed on
//!   the returned `Task` values.
//! - `update` never changes the owner and never creates a row.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::SharedConnection;
use crate::model::task::{Task, TaskId};
use crate::repo::{map_write_error, RepoError, RepoResult};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Durable store of tasks and their owner association.
pub trait TaskRepository: Send + Sync {
    /// Returns the tasks owned by `user_name` in insertion order.
    fn find_by_user_name(&self, user_name: &str) -> RepoResult<Vec<Task>>;
    /// Stores a new task owned by `user_name`.
    fn add(&self, user_name: &str, task: &Task) -> RepoResult<()>;
    /// Replaces title and done flag of an existing task.
    fn update(&self, task: &Task) -> RepoResult<()>;
    fn remove_by_id(&self, id: TaskId) -> RepoResult<()>;
}

impl<T: TaskRepository + ?Sized> TaskRepository for Arc<T> {
    fn find_by_user_name(&self, user_name: &str) -> RepoResult<Vec<Task>> {
        (**self).find_by_user_name(user_name)
    }

    fn add(&self, user_name: &str, task: &Task) -> RepoResult<()> {
        (**self).add(user_name, task)
    }

    fn update(&self, task: &Task) -> RepoResult<()> {
        (**self).update(task)
    }

    fn remove_by_id(&self, id: TaskId) -> RepoResult<()> {
        (**self).remove_by_id(id)
    }
}

/// SQLite-backed task store.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    conn: SharedConnection,
}

impl SqliteTaskRepository {
    /// Constructs a store from a migrated connection.
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository {
    fn find_by_user_name(&self, user_name: &str) -> RepoResult<Vec<Task>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, done
             FROM tasks
             WHERE user_name = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([user_name])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn add(&self, user_name: &str, task: &Task) -> RepoResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (id, user_name, title, done) VALUES (?1, ?2, ?3, ?4);",
            params![
                task.id().to_string(),
                user_name,
                task.title(),
                bool_to_int(task.is_done()),
            ],
        )
        .map_err(|err| {
            map_write_error(err, || {
                format!(
                    "task {} cannot be added for user `{user_name}` (duplicate id or unknown user)",
                    task.id()
                )
            })
        })?;

        Ok(())
    }

    fn update(&self, task: &Task) -> RepoResult<()> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE tasks SET title = ?2, done = ?3 WHERE id = ?1;",
            params![
                task.id().to_string(),
                task.title(),
                bool_to_int(task.is_done())
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.id()));
        }

        Ok(())
    }

    fn remove_by_id(&self, id: TaskId) -> RepoResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tasks.id"))
    })?;

    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in tasks.done"
            )));
        }
    };

    let title: String = row.get("title")?;
    Task::with_id(id, &title, done)
        .map_err(|err| RepoError::InvalidData(format!("task {id}: {err}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
