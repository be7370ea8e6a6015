//! Clinics, candidates, and the portal logins attached to them.

pub mod domain;
pub mod router;
pub mod service;


pub use domain::{
    Candidate, CandidateId, CandidateStatus, CandidateUpdate, Clinic, ClinicId, ClinicUpdate,
    LoginGrant, NewCandidate, NewClinic, NewLogin, ProvisionedLogin, User, UserId,
};
pub use router::directory_router;
pub use service::{CandidateDetail, ClinicDetail, DirectoryService};
