//! User account model.
//!
//! # Invariants
//! - `name` is non-empty and unique across the user store.
//! - `password` is non-empty and compared byte-for-byte. It is kept in plain
//!   form and must never appear in logs or `Debug` output.

use crate::config::ADMIN_NAME;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyPassword,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "the user name cannot be empty"),
            Self::EmptyPassword => write!(f, "the password cannot be empty"),
        }
    }
}

impl Error for UserValidationError {}

/// Account able to authenticate and own tasks.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    password: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let password = password.into();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self { name, password })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether this is the reserved administrative account.
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_NAME
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}
