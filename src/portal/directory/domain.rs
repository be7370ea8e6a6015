use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::portal::identity::domain::Role;

/// Identifier wrapper for portal logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Identifier wrapper for hiring clinics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClinicId(pub Uuid);

/// Identifier wrapper for job candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

impl_id!(UserId);
impl_id!(ClinicId);
impl_id!(CandidateId);

/// A credential holder. Exactly one of `clinic`/`candidate` is set for the
/// CLIENT and CANDIDATE roles; both stay unset for OWNER. Users are
/// deactivated by clearing `active`, never deleted. Not serializable: the
/// password hash stays inside the store boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub clinic: Option<ClinicId>,
    pub candidate: Option<CandidateId>,
    pub created_at: DateTime<Utc>,
}

/// A hiring organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: ClinicId,
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Whether a candidate is currently open to placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    Active,
    Inactive,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Active => "ACTIVE",
            CandidateStatus::Inactive => "INACTIVE",
        }
    }
}

/// A job seeker. `placed_clinic`/`placed_at` record the most recent journey
/// that reached the placed stage; they are written by the placement effect
/// and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: String,
    pub job_wishes: String,
    pub desired_rate: String,
    pub availability: Option<String>,
    pub status: CandidateStatus,
    pub notes: Option<String>,
    pub placed_clinic: Option<ClinicId>,
    pub placed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Intake payload for a new clinic.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClinic {
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub contact_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full overwrite of a clinic's editable fields. The registration number is
/// part of the edit surface; uniqueness is still enforced by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ClinicUpdate {
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub contact_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Intake payload for a new candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub location: String,
    pub job_wishes: String,
    pub desired_rate: String,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full overwrite of a candidate's editable fields, status included.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub location: String,
    pub job_wishes: String,
    pub desired_rate: String,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: CandidateStatus,
}

/// What a provisioned login is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginGrant {
    Clinic(ClinicId),
    Candidate(CandidateId),
}

impl LoginGrant {
    pub const fn role(self) -> Role {
        match self {
            LoginGrant::Clinic(_) => Role::Client,
            LoginGrant::Candidate(_) => Role::Candidate,
        }
    }
}

/// Request to create a login for a clinic contact or a candidate. A missing
/// password is generated server-side.
#[derive(Debug, Clone)]
pub struct NewLogin {
    pub email: String,
    pub password: Option<String>,
    pub grant: LoginGrant,
}

/// Result of login provisioning. `password` is the plain credential handed
/// to the owner exactly once; only the hash is stored.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedLogin {
    pub user: UserId,
    pub email: String,
    pub password: String,
}
