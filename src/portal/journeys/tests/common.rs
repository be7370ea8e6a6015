use std::sync::Arc;

use chrono::Utc;

use crate::infra::{MemoryFiles, MemorySessions, MemoryStore};
use crate::portal::directory::domain::{
    Candidate, CandidateId, CandidateStatus, Clinic, ClinicId, User, UserId,
};
use crate::portal::identity::domain::{Role, SessionToken};
use crate::portal::journeys::JourneyService;
use crate::portal::state::PortalState;
use crate::portal::store::{SessionStore, Store};

pub(super) struct Harness {
    pub(super) store: Arc<MemoryStore>,
    pub(super) sessions: Arc<MemorySessions>,
    pub(super) state: PortalState<MemoryStore, MemorySessions, MemoryFiles>,
    pub(super) clinic: ClinicId,
    pub(super) candidate: CandidateId,
    pub(super) owner: UserId,
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let sessions = Arc::new(MemorySessions::default());
    let files = Arc::new(MemoryFiles::default());

    let clinic = sample_clinic("10000001");
    let candidate = sample_candidate("noor@example.test");
    let owner = sample_user("owner@portal.test", Role::Owner, None, None);
    store.insert_clinic(clinic.clone()).expect("clinic inserted");
    store
        .insert_candidate(candidate.clone())
        .expect("candidate inserted");
    store.insert_user(owner.clone()).expect("owner inserted");

    let state = PortalState::new(store.clone(), sessions.clone(), files);
    Harness {
        store,
        sessions,
        state,
        clinic: clinic.id,
        candidate: candidate.id,
        owner: owner.id,
    }
}

pub(super) fn service(harness: &Harness) -> JourneyService<MemoryStore> {
    JourneyService::new(harness.store.clone())
}

pub(super) fn open_session(harness: &Harness, user: UserId) -> SessionToken {
    harness.sessions.open(user).expect("session opens")
}

pub(super) fn sample_clinic(registration_number: &str) -> Clinic {
    Clinic {
        id: ClinicId::new(),
        name: format!("Clinic {registration_number}"),
        registration_number: registration_number.to_string(),
        address: "1 Test Lane".to_string(),
        contact_name: "Test Contact".to_string(),
        contact_email: "contact@clinic.test".to_string(),
        contact_phone: None,
        notes: None,
        created_at: Utc::now(),
    }
}

pub(super) fn sample_candidate(email: &str) -> Candidate {
    Candidate {
        id: CandidateId::new(),
        first_name: "Noor".to_string(),
        last_name: "Jansen".to_string(),
        email: email.to_string(),
        phone: None,
        location: "Springfield".to_string(),
        job_wishes: "Dental assistant".to_string(),
        desired_rate: "$35/hour".to_string(),
        availability: None,
        status: CandidateStatus::Active,
        notes: None,
        placed_clinic: None,
        placed_at: None,
        created_at: Utc::now(),
    }
}

pub(super) fn sample_user(
    email: &str,
    role: Role,
    clinic: Option<ClinicId>,
    candidate: Option<CandidateId>,
) -> User {
    User {
        id: UserId::new(),
        email: email.to_string(),
        // Session-based tests never check the password.
        password_hash: "$argon2id$unused".to_string(),
        role,
        active: true,
        clinic,
        candidate,
        created_at: Utc::now(),
    }
}
