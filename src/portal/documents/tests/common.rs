use std::sync::Arc;

use chrono::Utc;

use crate::infra::{MemoryFiles, MemorySessions, MemoryStore};
use crate::portal::directory::domain::{
    Candidate, CandidateId, CandidateStatus, Clinic, ClinicId, User, UserId,
};
use crate::portal::documents::domain::{CandidateDocument, ClinicDocument, DocumentUpload};
use crate::portal::documents::DocumentService;
use crate::portal::identity::domain::{Identity, Role, SessionToken};
use crate::portal::journeys::domain::{Journey, JourneyId, JourneyStage};
use crate::portal::state::PortalState;
use crate::portal::store::{SessionStore, Store};

pub(super) struct Harness {
    pub(super) store: Arc<MemoryStore>,
    pub(super) sessions: Arc<MemorySessions>,
    pub(super) files: Arc<MemoryFiles>,
    pub(super) state: PortalState<MemoryStore, MemorySessions, MemoryFiles>,
    pub(super) clinic: ClinicId,
    pub(super) other_clinic: ClinicId,
    pub(super) candidate: CandidateId,
    pub(super) other_candidate: CandidateId,
    pub(super) owner: User,
    pub(super) client: User,
    pub(super) other_client: User,
    pub(super) candidate_user: User,
}

impl Harness {
    pub(super) fn documents(&self) -> DocumentService<MemoryStore, MemoryFiles> {
        DocumentService::new(self.store.clone(), self.files.clone())
    }

    pub(super) fn identity(&self, user: &User) -> Identity {
        Identity::from_user(user)
    }

    pub(super) fn session(&self, user: &User) -> SessionToken {
        self.sessions.open(user.id).expect("session opens")
    }

    /// Link `clinic` and `candidate` with a journey at the given stage.
    pub(super) fn add_journey(&self, clinic: ClinicId, candidate: CandidateId, stage: JourneyStage) {
        self.store
            .insert_journey(Journey {
                id: JourneyId::new(),
                clinic,
                candidate,
                stage,
                scheduled_at: None,
                notes: None,
                created_by: self.owner.id,
                created_at: Utc::now(),
            })
            .expect("journey inserted");
    }

    pub(super) fn upload_clinic_document(&self, clinic: ClinicId, name: &str) -> ClinicDocument {
        self.documents()
            .upload_clinic_document(
                Some(&self.identity(&self.owner)),
                clinic,
                upload(name, None),
            )
            .expect("clinic document uploaded")
    }

    pub(super) fn upload_candidate_document(
        &self,
        candidate: CandidateId,
        name: &str,
        kind: Option<&str>,
    ) -> CandidateDocument {
        self.documents()
            .upload_candidate_document(
                Some(&self.identity(&self.owner)),
                candidate,
                upload(name, kind),
            )
            .expect("candidate document uploaded")
    }
}

pub(super) fn upload(name: &str, kind: Option<&str>) -> DocumentUpload {
    DocumentUpload {
        original_name: name.to_string(),
        media_type: "application/pdf".to_string(),
        kind: kind.map(str::to_string),
        bytes: b"%PDF-1.4 sample".to_vec(),
    }
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let sessions = Arc::new(MemorySessions::default());
    let files = Arc::new(MemoryFiles::default());

    let clinic = clinic_fixture("30000001");
    let other_clinic = clinic_fixture("30000002");
    let candidate = candidate_fixture("k1@example.test");
    let other_candidate = candidate_fixture("k2@example.test");
    store.insert_clinic(clinic.clone()).expect("clinic inserted");
    store
        .insert_clinic(other_clinic.clone())
        .expect("clinic inserted");
    store
        .insert_candidate(candidate.clone())
        .expect("candidate inserted");
    store
        .insert_candidate(other_candidate.clone())
        .expect("candidate inserted");

    let owner = user_fixture("owner@portal.test", Role::Owner, None, None);
    let client = user_fixture("c1@clinic.test", Role::Client, Some(clinic.id), None);
    let other_client = user_fixture("c2@clinic.test", Role::Client, Some(other_clinic.id), None);
    let candidate_user = user_fixture(
        "k1@portal.test",
        Role::Candidate,
        None,
        Some(candidate.id),
    );
    for user in [&owner, &client, &other_client, &candidate_user] {
        store.insert_user(user.clone()).expect("user inserted");
    }

    let state = PortalState::new(store.clone(), sessions.clone(), files.clone());
    Harness {
        store,
        sessions,
        files,
        state,
        clinic: clinic.id,
        other_clinic: other_clinic.id,
        candidate: candidate.id,
        other_candidate: other_candidate.id,
        owner,
        client,
        other_client,
        candidate_user,
    }
}

fn clinic_fixture(registration_number: &str) -> Clinic {
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

fn candidate_fixture(email: &str) -> Candidate {
    Candidate {
        id: CandidateId::new(),
        first_name: "Kim".to_string(),
        last_name: "Visser".to_string(),
        email: email.to_string(),
        phone: None,
        location: "Springfield".to_string(),
        job_wishes: "Dental hygienist".to_string(),
        desired_rate: "$38/hour".to_string(),
        availability: None,
        status: CandidateStatus::Active,
        notes: None,
        placed_clinic: None,
        placed_at: None,
        created_at: Utc::now(),
    }
}

fn user_fixture(
    email: &str,
    role: Role,
    clinic: Option<ClinicId>,
    candidate: Option<CandidateId>,
) -> User {
    User {
        id: UserId::new(),
        email: email.to_string(),
        password_hash: "$argon2id$unused".to_string(),
        role,
        active: true,
        clinic,
        candidate,
        created_at: Utc::now(),
    }
}
