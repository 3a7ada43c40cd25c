//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable user/task store contracts consumed by the core.
//! - Isolate SQLite query details from service/authorization code.
//! - Provide the caching decorator in front of the user store.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`,
//!   `ProtectedUser`) in addition to DB transport errors.
//! - Store failures are surfaced unchanged; nothing here retries.

use crate::db::DbError;
use crate::model::task::TaskId;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cached_user_repo;
pub mod task_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for user/task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Update targeted a user that does not exist.
    UserNotFound(String),
    /// Update targeted a task that does not exist.
    TaskNotFound(TaskId),
    /// Write violated a uniqueness or ownership constraint.
    Conflict(String),
    /// Removal of the administrative account was attempted.
    ProtectedUser(String),
    /// Persisted row failed domain validation.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(name) => write!(f, "user not found: {name}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Conflict(message) => write!(f, "conflicting write: {message}"),
            Self::ProtectedUser(name) => write!(f, "cannot remove the administrative user `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps constraint violations to `Conflict`, everything else to `Db`.
pub(crate) fn map_write_error(err: rusqlite::Error, context: impl FnOnce() -> String) -> RepoError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        return RepoError::Conflict(context());
    }
    RepoError::from(err)
}
