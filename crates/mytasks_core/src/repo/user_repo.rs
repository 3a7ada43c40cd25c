//! User store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `users` table keyed by name.
//!
//! # Invariants
//! - The administrative account is never removed; the check runs before
//!   any SQL is issued.
//! - `update` never creates a row. A missing user is `UserNotFound`.
//! - `remove_by_name` of a missing user is a no-op.

use crate::config::ADMIN_NAME;
use crate::db::SharedConnection;
use crate::model::user::User;
use crate::repo::{map_write_error, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

/// Durable (or decorated) store of user accounts.
pub trait UserRepository: Send + Sync {
    /// Returns every user ordered by name.
    fn find_all(&self) -> RepoResult<Vec<User>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>>;
    fn add(&self, user: &User) -> RepoResult<()>;
    /// Replaces the password of an existing user.
    fn update(&self, user: &User) -> RepoResult<()>;
    fn remove_by_name(&self, name: &str) -> RepoResult<()>;
}

impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        (**self).find_all()
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        (**self).find_by_name(name)
    }

    fn add(&self, user: &User) -> RepoResult<()> {
        (**self).add(user)
    }

    fn update(&self, user: &User) -> RepoResult<()> {
        (**self).update(user)
    }

    fn remove_by_name(&self, name: &str) -> RepoResult<()> {
        (**self).remove_by_name(name)
    }
}

/// Fails with `ProtectedUser` when `name` is the administrative account.
pub fn ensure_removable(name: &str) -> RepoResult<()> {
    if name == ADMIN_NAME {
        return Err(RepoError::ProtectedUser(name.to_string()));
    }
    Ok(())
}

/// SQLite-backed user store.
#[derive(Clone)]
pub struct SqliteUserRepository {
    conn: SharedConnection,
}

impl SqliteUserRepository {
    /// Constructs a store from a migrated connection.
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name, password FROM users ORDER BY name;")?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        let conn = self.conn.lock();
        let found = conn
            .query_row(
                "SELECT name, password FROM users WHERE name = ?1;",
                [name],
                |row| Ok((row.get::<_, String>("name")?, row.get::<_, String>("password")?)),
            )
            .optional()?;

        match found {
            Some((name, password)) => Ok(Some(to_user(name, password)?)),
            None => Ok(None),
        }
    }

    fn add(&self, user: &User) -> RepoResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (name, password) VALUES (?1, ?2);",
            params![user.name(), user.password()],
        )
        .map_err(|err| map_write_error(err, || format!("user `{}` already exists", user.name())))?;

        Ok(())
    }

    fn update(&self, user: &User) -> RepoResult<()> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE users SET password = ?2 WHERE name = ?1;",
            params![user.name(), user.password()],
        )?;

        if changed == 0 {
            return Err(RepoError::UserNotFound(user.name().to_string()));
        }

        Ok(())
    }

    fn remove_by_name(&self, name: &str) -> RepoResult<()> {
        ensure_removable(name)?;

        let conn = self.conn.lock();
        conn.execute("DELETE FROM users WHERE name = ?1;", [name])?;
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    to_user(row.get("name")?, row.get("password")?)
}

fn to_user(name: String, password: String) -> RepoResult<User> {
    User::new(name, password)
        .map_err(|err| RepoError::InvalidData(format!("invalid row in users: {err}")))
}
