use std::fmt;
use std::str::FromStr;

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::portal::directory::domain::{CandidateId, ClinicId, User, UserId};

/// The three actor roles sharing the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Client,
    Candidate,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Client => "CLIENT",
            Role::Candidate => "CANDIDATE",
        }
    }
}

/// Opaque reference to a server-side session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn issue() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}

/// The resolved actor for the duration of one request: who they are and the
/// single relation their role scopes them to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub user: UserId,
    pub role: Role,
    pub clinic: Option<ClinicId>,
    pub candidate: Option<CandidateId>,
}

impl Identity {
    pub fn from_user(user: &User) -> Self {
        Self {
            user: user.id,
            role: user.role,
            clinic: user.clinic,
            candidate: user.candidate,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

/// Pull the session token out of `Authorization: Bearer <token>`. Anything
/// malformed resolves to anonymous rather than an error.
pub fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|raw| raw.trim().parse().ok())
}
