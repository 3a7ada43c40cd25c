//! Process wiring for the core.
//!
//! # Responsibility
//! - Compose durable stores, the cached user directory, the credential
//!   verifier, the ownership guard and the use-case services.
//! - Guarantee the administrative account exists before serving callers.
//!
//! # Invariants
//! - Exactly one cached directory exists per `App`; the verifier and the
//!   administration service share it.
//! - Bootstrap never overwrites an existing administrative password.

use crate::auth::credentials::{CredentialVerifier, Principal};
use crate::auth::ownership::OwnershipGuard;
use crate::config::{ConfigError, CoreConfig, ADMIN_NAME};
use crate::db::{open_shared_db, open_shared_db_in_memory, DbError, SharedConnection};
use crate::model::user::{User, UserValidationError};
use crate::repo::cached_user_repo::CachedUserRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoError;
use crate::service::task_service::TaskService;
use crate::service::user_service::UserService;
use crate::service::ServiceResult;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Cached user directory over the SQLite user store.
pub type UserDirectory = CachedUserRepository<SqliteUserRepository>;

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Db(DbError),
    Repo(RepoError),
    InvalidAdmin(UserValidationError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Db(err) => write!(f, "database bootstrap failed: {err}"),
            Self::Repo(err) => write!(f, "user bootstrap failed: {err}"),
            Self::InvalidAdmin(err) => write!(f, "invalid administrative account: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidAdmin(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for BootstrapError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for BootstrapError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Creates the administrative account when it is missing.
///
/// Returns `true` when the account was created by this call.
pub fn ensure_admin_user<R: UserRepository>(
    users: &R,
    password: &str,
) -> Result<bool, BootstrapError> {
    if users.find_by_name(ADMIN_NAME)?.is_some() {
        return Ok(false);
    }

    let admin = User::new(ADMIN_NAME, password).map_err(BootstrapError::InvalidAdmin)?;
    match users.add(&admin) {
        Ok(()) => {
            info!("event=admin_bootstrap module=bootstrap status=created");
            Ok(true)
        }
        // Another process created it in between.
        Err(RepoError::Conflict(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Fully wired core.
pub struct App {
    directory: Arc<UserDirectory>,
    verifier: CredentialVerifier<Arc<UserDirectory>>,
    users: UserService<Arc<UserDirectory>>,
    tasks: TaskService<SqliteTaskRepository>,
}

impl App {
    /// Opens the configured database file and wires the core on top of it.
    pub fn open(config: &CoreConfig) -> Result<Self, BootstrapError> {
        config.validate()?;
        let conn = open_shared_db(&config.db_path)?;
        Self::from_connection(conn, &config.admin_password)
    }

    /// Wires the core over a fresh in-memory database.
    pub fn in_memory(admin_password: &str) -> Result<Self, BootstrapError> {
        let conn = open_shared_db_in_memory()?;
        Self::from_connection(conn, admin_password)
    }

    /// Wires the core over an already migrated connection.
    pub fn from_connection(
        conn: SharedConnection,
        admin_password: &str,
    ) -> Result<Self, BootstrapError> {
        let directory = Arc::new(CachedUserRepository::new(SqliteUserRepository::new(
            Arc::clone(&conn),
        )));
        ensure_admin_user(&directory, admin_password)?;

        Ok(Self {
            verifier: CredentialVerifier::new(Arc::clone(&directory)),
            users: UserService::new(Arc::clone(&directory)),
            tasks: TaskService::new(SqliteTaskRepository::new(conn)),
            directory,
        })
    }

    pub fn authenticate(&self, name: &str, secret: &str) -> ServiceResult<Principal> {
        Ok(self.verifier.authenticate(name, secret)?)
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn verifier(&self) -> &CredentialVerifier<Arc<UserDirectory>> {
        &self.verifier
    }

    pub fn ownership(&self) -> &OwnershipGuard<SqliteTaskRepository> {
        self.tasks.guard()
    }

    pub fn users(&self) -> &UserService<Arc<UserDirectory>> {
        &self.users
    }

    pub fn tasks(&self) -> &TaskService<SqliteTaskRepository> {
        &self.tasks
    }
}
