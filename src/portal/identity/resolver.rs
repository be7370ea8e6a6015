use std::sync::Arc;

use super::domain::{Identity, SessionToken};
use crate::portal::store::{SessionStore, Store, StoreError};

/// Turns a session reference into the acting identity. Absence is a normal
/// outcome, never an error: no token, an expired session, or a missing or
/// deactivated user all resolve to anonymous. The latter two also invalidate
/// the session so the same cookie cannot re-resolve a stale identity.
pub struct IdentityResolver<S, N> {
    store: Arc<S>,
    sessions: Arc<N>,
}

impl<S, N> IdentityResolver<S, N>
where
    S: Store,
    N: SessionStore,
{
    pub fn new(store: Arc<S>, sessions: Arc<N>) -> Self {
        Self { store, sessions }
    }

    pub fn resolve(&self, token: Option<&SessionToken>) -> Result<Option<Identity>, StoreError> {
        let Some(token) = token else {
            return Ok(None);
        };
        let Some(user_id) = self.sessions.user_for(token)? else {
            return Ok(None);
        };

        match self.store.user(user_id)? {
            Some(user) if user.active => Ok(Some(Identity::from_user(&user))),
            _ => {
                self.sessions.invalidate(token)?;
                Ok(None)
            }
        }
    }
}
