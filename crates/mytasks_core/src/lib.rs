//! Core domain logic for MyTasks.
//! This crate is the single source of truth for identity, ownership and
//! task-list invariants.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::credentials::{AuthError, CredentialVerifier, Principal, Role};
pub use auth::ownership::OwnershipGuard;
pub use bootstrap::{ensure_admin_user, App, BootstrapError, UserDirectory};
pub use config::{ConfigError, CoreConfig, ADMIN_NAME};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use model::user::{User, UserValidationError};
pub use repo::cached_user_repo::CachedUserRepository;
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::task_service::TaskService;
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceErrorKind, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
