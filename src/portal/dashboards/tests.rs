use std::sync::Arc;

use chrono::Utc;

use crate::infra::{MemoryFiles, MemoryStore};
use crate::portal::dashboards::DashboardService;
use crate::portal::directory::domain::{
    Candidate, CandidateId, CandidateStatus, Clinic, ClinicId, User, UserId,
};
use crate::portal::documents::domain::DocumentUpload;
use crate::portal::documents::DocumentService;
use crate::portal::error::PortalError;
use crate::portal::identity::domain::{Identity, Role};
use crate::portal::journeys::domain::{Journey, JourneyId, JourneyStage};
use crate::portal::store::Store;

struct Fixture {
    store: Arc<MemoryStore>,
    clinic: Clinic,
    other_clinic: Clinic,
    candidate: Candidate,
    owner: User,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::default());

    let clinic = clinic_record("50000001");
    let other_clinic = clinic_record("50000002");
    let candidate = candidate_record("kim@example.test");
    let owner = user_record("owner@portal.test", Role::Owner, None, None);

    store.insert_clinic(clinic.clone()).expect("clinic");
    store
        .insert_clinic(other_clinic.clone())
        .expect("other clinic");
    store.insert_candidate(candidate.clone()).expect("candidate");
    store.insert_user(owner.clone()).expect("owner");

    Fixture {
        store,
        clinic,
        other_clinic,
        candidate,
        owner,
    }
}

fn clinic_record(registration_number: &str) -> Clinic {
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

fn candidate_record(email: &str) -> Candidate {
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

fn user_record(
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

fn journey(fixture: &Fixture, clinic: ClinicId, stage: JourneyStage) {
    fixture
        .store
        .insert_journey(Journey {
            id: JourneyId::new(),
            clinic,
            candidate: fixture.candidate.id,
            stage,
            scheduled_at: None,
            notes: None,
            created_by: fixture.owner.id,
            created_at: Utc::now(),
        })
        .expect("journey inserted");
}

#[test]
fn owner_overview_counts_every_aggregate() {
    let fixture = fixture();
    journey(&fixture, fixture.clinic.id, JourneyStage::FirstInterview);

    let dashboards = DashboardService::new(fixture.store.clone());
    let overview = dashboards.owner_overview().expect("overview builds");
    assert_eq!(overview.clinics, 2);
    assert_eq!(overview.candidates, 1);
    assert_eq!(overview.journeys, 1);
}

#[test]
fn client_home_is_scoped_to_the_clients_clinic() {
    let fixture = fixture();
    journey(&fixture, fixture.clinic.id, JourneyStage::FirstInterview);
    journey(&fixture, fixture.other_clinic.id, JourneyStage::TrialDay);

    let files = Arc::new(MemoryFiles::default());
    let documents = DocumentService::new(fixture.store.clone(), files);
    let owner_identity = Identity::from_user(&fixture.owner);
    documents
        .upload_candidate_document(
            Some(&owner_identity),
            fixture.candidate.id,
            DocumentUpload {
                original_name: "cv.pdf".to_string(),
                media_type: "application/pdf".to_string(),
                kind: None,
                bytes: b"cv".to_vec(),
            },
        )
        .expect("cv uploaded");
    documents
        .upload_candidate_document(
            Some(&owner_identity),
            fixture.candidate.id,
            DocumentUpload {
                original_name: "certificate.pdf".to_string(),
                media_type: "application/pdf".to_string(),
                kind: Some("CERTIFICATE".to_string()),
                bytes: b"cert".to_vec(),
            },
        )
        .expect("certificate uploaded");

    let client = user_record(
        "client@clinic.test",
        Role::Client,
        Some(fixture.clinic.id),
        None,
    );
    let dashboards = DashboardService::new(fixture.store.clone());
    let home = dashboards
        .client_home(&Identity::from_user(&client))
        .expect("client home builds");

    assert_eq!(home.clinic_id, fixture.clinic.id);
    assert_eq!(home.journeys.len(), 1);
    let entry = &home.journeys[0];
    assert_eq!(entry.stage, "FIRST_INTERVIEW");
    assert_eq!(entry.candidate.id, fixture.candidate.id);
    // Only CV documents surface on the client side.
    assert_eq!(entry.candidate.cv_documents.len(), 1);
    assert_eq!(entry.candidate.cv_documents[0].name, "cv.pdf");
}

#[test]
fn client_without_a_clinic_relation_is_refused() {
    let fixture = fixture();
    let mut client = user_record("client@clinic.test", Role::Client, None, None);
    client.clinic = None;

    let dashboards = DashboardService::new(fixture.store.clone());
    assert!(matches!(
        dashboards.client_home(&Identity::from_user(&client)),
        Err(PortalError::Forbidden)
    ));
}

#[test]
fn candidate_home_shows_journeys_and_placement() {
    let fixture = fixture();
    journey(&fixture, fixture.clinic.id, JourneyStage::Placed);

    let mut placed = fixture.candidate.clone();
    placed.placed_clinic = Some(fixture.clinic.id);
    placed.placed_at = Some(Utc::now());
    fixture
        .store
        .update_candidate(placed)
        .expect("placement stored");

    let candidate_user = user_record(
        "kim@portal.test",
        Role::Candidate,
        None,
        Some(fixture.candidate.id),
    );
    let dashboards = DashboardService::new(fixture.store.clone());
    let home = dashboards
        .candidate_home(&Identity::from_user(&candidate_user))
        .expect("candidate home builds");

    assert_eq!(home.candidate_id, fixture.candidate.id);
    assert_eq!(home.placed_clinic_name, Some(fixture.clinic.name.clone()));
    assert!(home.placed_at.is_some());
    assert_eq!(home.journeys.len(), 1);
    assert_eq!(home.journeys[0].stage, "PLACED");
    assert_eq!(home.journeys[0].clinic_name, fixture.clinic.name);
}
