//! Stateless credential verification.
//!
//! # Invariants
//! - Unknown name and wrong secret produce the same `NotAuthenticated`
//!   value; callers cannot tell which one happened.
//! - The administrator role is granted to `ADMIN_NAME` and nobody else.
//! - Secrets are compared byte-for-byte and never logged.

use crate::config::ADMIN_NAME;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{debug, error};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Role granted to an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Administrator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
        }
    }
}

/// Authenticated identity, valid for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    name: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    /// Builds the principal for `name`, deriving roles from identity alone.
    fn for_name(name: &str) -> Self {
        let mut roles = BTreeSet::new();
        if name == ADMIN_NAME {
            roles.insert(Role::Administrator);
        }
        Self {
            name: name.to_string(),
            roles,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Administrator)
    }
}

#[derive(Debug)]
pub enum AuthError {
    /// Name unknown or secret mismatch.
    NotAuthenticated,
    /// The user store could not answer.
    Store(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::Store(err) => write!(f, "credential store failure: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAuthenticated => None,
            Self::Store(err) => Some(err),
        }
    }
}

/// Checks (name, secret) pairs against a user directory.
pub struct CredentialVerifier<R: UserRepository> {
    users: R,
}

impl<R: UserRepository> CredentialVerifier<R> {
    /// `users` is normally the cached directory shared with admin services.
    pub fn new(users: R) -> Self {
        Self { users }
    }

    pub fn authenticate(&self, name: &str, secret: &str) -> Result<Principal, AuthError> {
        let user = match self.users.find_by_name(name) {
            Ok(user) => user,
            Err(err) => {
                error!("event=authenticate module=auth status=error error={err}");
                return Err(AuthError::Store(err));
            }
        };

        let matches = user.is_some_and(|user| user.password().as_bytes() == secret.as_bytes());
        if !matches {
            debug!("event=authenticate module=auth status=denied");
            return Err(AuthError::NotAuthenticated);
        }

        let principal = Principal::for_name(name);
        debug!(
            "event=authenticate module=auth status=ok admin={}",
            principal.is_admin()
        );
        Ok(principal)
    }
}
