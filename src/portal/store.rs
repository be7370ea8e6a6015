//! Collaborator contracts the portal services are written against, so every
//! service can be exercised in isolation with the in-memory implementations
//! from [`crate::infra`].

use super::directory::domain::{Candidate, CandidateId, Clinic, ClinicId, User, UserId};
use super::documents::domain::{
    CandidateDocument, CandidateDocumentId, ClinicDocument, ClinicDocumentId,
};
use super::identity::domain::SessionToken;
use super::journeys::domain::{Journey, JourneyId};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The one lookup document access control cannot decide from the identity
/// alone: does any pipeline journey connect this clinic and this candidate?
/// Kept as its own capability so the access guard can be tested against a
/// fake without dragging in the whole store.
pub trait JourneyDirectory: Send + Sync {
    fn journey_exists(&self, clinic: ClinicId, candidate: CandidateId)
        -> Result<bool, StoreError>;
}

/// Persistent records behind the portal. Point lookups return `Ok(None)` for
/// absent ids; updates of absent records fail with [`StoreError::NotFound`];
/// inserts violating a uniqueness rule (user email, candidate email, clinic
/// registration number) fail with [`StoreError::Conflict`]. Listings return
/// newest first.
pub trait Store: JourneyDirectory + Send + Sync {
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn insert_user(&self, user: User) -> Result<(), StoreError>;
    fn update_user(&self, user: User) -> Result<(), StoreError>;

    fn clinic(&self, id: ClinicId) -> Result<Option<Clinic>, StoreError>;
    fn insert_clinic(&self, clinic: Clinic) -> Result<(), StoreError>;
    fn update_clinic(&self, clinic: Clinic) -> Result<(), StoreError>;
    fn clinics(&self) -> Result<Vec<Clinic>, StoreError>;

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StoreError>;
    fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError>;
    fn update_candidate(&self, candidate: Candidate) -> Result<(), StoreError>;
    fn candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    fn journey(&self, id: JourneyId) -> Result<Option<Journey>, StoreError>;
    fn insert_journey(&self, journey: Journey) -> Result<(), StoreError>;
    fn update_journey(&self, journey: Journey) -> Result<(), StoreError>;
    fn journeys(&self) -> Result<Vec<Journey>, StoreError>;
    fn journeys_for_clinic(&self, clinic: ClinicId) -> Result<Vec<Journey>, StoreError>;
    fn journeys_for_candidate(&self, candidate: CandidateId) -> Result<Vec<Journey>, StoreError>;

    fn clinic_document(&self, id: ClinicDocumentId) -> Result<Option<ClinicDocument>, StoreError>;
    fn candidate_document(
        &self,
        id: CandidateDocumentId,
    ) -> Result<Option<CandidateDocument>, StoreError>;
    fn insert_clinic_document(&self, document: ClinicDocument) -> Result<(), StoreError>;
    fn insert_candidate_document(&self, document: CandidateDocument) -> Result<(), StoreError>;
    fn clinic_documents(&self, clinic: ClinicId) -> Result<Vec<ClinicDocument>, StoreError>;
    fn candidate_documents(
        &self,
        candidate: CandidateId,
    ) -> Result<Vec<CandidateDocument>, StoreError>;
}

/// Server-side session state. Tokens are opaque to callers; invalidation of
/// an unknown token is a no-op.
pub trait SessionStore: Send + Sync {
    fn open(&self, user: UserId) -> Result<SessionToken, StoreError>;
    fn user_for(&self, token: &SessionToken) -> Result<Option<UserId>, StoreError>;
    fn invalidate(&self, token: &SessionToken) -> Result<(), StoreError>;
}

/// Raw document bytes keyed by storage locator.
pub trait FileStore: Send + Sync {
    fn put(&self, locator: &str, bytes: &[u8]) -> std::io::Result<()>;
    fn get(&self, locator: &str) -> std::io::Result<Option<Vec<u8>>>;
}
