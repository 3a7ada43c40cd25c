//! User administration use-cases.
//!
//! # Responsibility
//! - List, create, re-password and remove accounts on behalf of an
//!   administrator.
//!
//! # Invariants
//! - Every operation requires the administrator role.
//! - Account values are validated before the directory is called.

use crate::auth::credentials::Principal;
use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// Account administration over a user directory.
pub struct UserService<R: UserRepository> {
    users: R,
}

impl<R: UserRepository> UserService<R> {
    /// `users` is normally the cached directory.
    pub fn new(users: R) -> Self {
        Self { users }
    }

    /// Returns all account names, sorted.
    pub fn list_user_names(&self, principal: &Principal) -> ServiceResult<Vec<String>> {
        require_admin(principal)?;
        let names = self
            .users
            .find_all()?
            .into_iter()
            .map(|user| user.name().to_string())
            .collect();
        Ok(names)
    }

    pub fn add_user(&self, principal: &Principal, name: &str, password: &str) -> ServiceResult<()> {
        require_admin(principal)?;
        let user = User::new(name, password)?;
        self.users.add(&user)?;
        info!("event=user_admin module=service action=add status=ok");
        Ok(())
    }

    /// Replaces the password of an existing account.
    pub fn update_user(
        &self,
        principal: &Principal,
        name: &str,
        password: &str,
    ) -> ServiceResult<()> {
        require_admin(principal)?;
        let user = User::new(name, password)?;
        self.users.update(&user)?;
        info!("event=user_admin module=service action=update status=ok");
        Ok(())
    }

    pub fn remove_user(&self, principal: &Principal, name: &str) -> ServiceResult<()> {
        require_admin(principal)?;
        self.users.remove_by_name(name)?;
        info!("event=user_admin module=service action=remove status=ok");
        Ok(())
    }
}

fn require_admin(principal: &Principal) -> ServiceResult<()> {
    if principal.is_admin() {
        return Ok(());
    }
    warn!("event=user_admin module=service status=forbidden");
    Err(ServiceError::Forbidden(
        "user administration requires the administrator role".to_string(),
    ))
}
