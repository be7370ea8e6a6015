use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::credentials::verify_password;
use super::domain::{Role, SessionToken};
use crate::portal::error::PortalError;
use crate::portal::store::{SessionStore, Store};

/// Outcome of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: SessionToken,
    pub role: Role,
}

/// Login and logout against the user directory. Every rejection is the same
/// `InvalidCredentials`: an unknown email, a wrong password, and a
/// deactivated account are indistinguishable from the outside.
pub struct AuthService<S, N> {
    store: Arc<S>,
    sessions: Arc<N>,
}

impl<S, N> AuthService<S, N>
where
    S: Store,
    N: SessionStore,
{
    pub fn new(store: Arc<S>, sessions: Arc<N>) -> Self {
        Self { store, sessions }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginSession, PortalError> {
        let Some(user) = self.store.user_by_email(email)? else {
            return Err(PortalError::InvalidCredentials);
        };
        if !user.active || !verify_password(password, &user.password_hash) {
            return Err(PortalError::InvalidCredentials);
        }

        let token = self.sessions.open(user.id)?;
        info!(user = %user.id, role = user.role.label(), "session opened");
        Ok(LoginSession {
            token,
            role: user.role,
        })
    }

    pub fn logout(&self, token: &SessionToken) -> Result<(), PortalError> {
        self.sessions.invalidate(token)?;
        Ok(())
    }
}
