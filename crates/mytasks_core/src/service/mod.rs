//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate authorization gates and repository calls into the
//!   user-administration and task-list use-cases.
//! - Translate lower-level failures into one caller-facing error taxonomy.
//!
//! # Invariants
//! - Validation happens before any store interaction.
//! - A refused authorization never reaches a mutating store call.

use crate::auth::credentials::AuthError;
use crate::model::task::{TaskId, TaskValidationError};
use crate::model::user::UserValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod task_service;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse error category callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Validation,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Store,
}

/// Caller-facing error for user and task use-cases.
#[derive(Debug)]
pub enum ServiceError {
    InvalidTask(TaskValidationError),
    InvalidUser(UserValidationError),
    Unauthenticated,
    /// Missing role, foreign task, or protected account.
    Forbidden(String),
    UserNotFound(String),
    TaskNotFound(TaskId),
    Conflict(String),
    Store(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::InvalidTask(_) | Self::InvalidUser(_) => ServiceErrorKind::Validation,
            Self::Unauthenticated => ServiceErrorKind::Unauthenticated,
            Self::Forbidden(_) => ServiceErrorKind::Forbidden,
            Self::UserNotFound(_) | Self::TaskNotFound(_) => ServiceErrorKind::NotFound,
            Self::Conflict(_) => ServiceErrorKind::Conflict,
            Self::Store(_) => ServiceErrorKind::Store,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::InvalidUser(err) => write!(f, "{err}"),
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Forbidden(reason) => write!(f, "forbidden: {reason}"),
            Self::UserNotFound(name) => write!(f, "user not found: {name}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask(err) => Some(err),
            Self::InvalidUser(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

impl From<UserValidationError> for ServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidUser(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProtectedUser(name) => {
                Self::Forbidden(format!("the administrative user `{name}` cannot be removed"))
            }
            RepoError::UserNotFound(name) => Self::UserNotFound(name),
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Store(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::NotAuthenticated => Self::Unauthenticated,
            AuthError::Store(err) => Self::Store(err),
        }
    }
}
