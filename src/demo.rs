//! Demo fixtures: one clinic, one candidate, a login per role, and an open
//! journey, so the portal can be explored without a provisioning round.

use std::sync::Arc;

use chrono::{Duration, Utc};
use talent_portal::error::AppError;
use talent_portal::infra::MemoryStore;
use talent_portal::portal::directory::domain::{
    Candidate, CandidateId, CandidateStatus, Clinic, ClinicId, User, UserId,
};
use talent_portal::portal::identity::credentials::hash_password;
use talent_portal::portal::identity::domain::Role;
use talent_portal::portal::journeys::domain::{Journey, JourneyId, JourneyStage};
use talent_portal::portal::journeys::{JourneyService, NewJourney, StageUpdate};
use talent_portal::portal::store::Store;
use talent_portal::portal::PortalError;

pub(crate) const DEMO_PASSWORD: &str = "Portal!12345";
pub(crate) const DEMO_OWNER_EMAIL: &str = "owner@portal.local";
pub(crate) const DEMO_CLIENT_EMAIL: &str = "client@clinic.local";
pub(crate) const DEMO_CANDIDATE_EMAIL: &str = "candidate@portal.local";

pub(crate) struct DemoFixtures {
    pub(crate) clinic: ClinicId,
    pub(crate) candidate: CandidateId,
    pub(crate) owner_user: UserId,
}

/// Populate a fresh store with the demo graph. Every login uses
/// [`DEMO_PASSWORD`].
pub(crate) fn seed(store: &MemoryStore) -> Result<DemoFixtures, PortalError> {
    let now = Utc::now();

    let clinic = Clinic {
        id: ClinicId::new(),
        name: "Riverside Dental Clinic".to_string(),
        registration_number: "12345678".to_string(),
        address: "1 Main Street, Springfield".to_string(),
        contact_name: "Sanne Willis".to_string(),
        contact_email: "contact@riverside-dental.local".to_string(),
        contact_phone: Some("+1 555 0100".to_string()),
        notes: Some("Demo clinic fixture.".to_string()),
        created_at: now,
    };
    store.insert_clinic(clinic.clone())?;

    let candidate = Candidate {
        id: CandidateId::new(),
        first_name: "Noor".to_string(),
        last_name: "Jansen".to_string(),
        email: DEMO_CANDIDATE_EMAIL.to_string(),
        phone: Some("+1 555 0101".to_string()),
        location: "Springfield and surroundings".to_string(),
        job_wishes: "Dental assistant, 32 hours, modern practice preferred.".to_string(),
        desired_rate: "$3,200/month or $35/hour".to_string(),
        availability: Some("Tuesdays and Thursdays, other days on request.".to_string()),
        status: CandidateStatus::Active,
        notes: Some("Prefers a short commute.".to_string()),
        placed_clinic: None,
        placed_at: None,
        created_at: now,
    };
    store.insert_candidate(candidate.clone())?;

    let owner = demo_user(DEMO_OWNER_EMAIL, Role::Owner, None, None)?;
    let owner_id = owner.id;
    store.insert_user(owner)?;
    store.insert_user(demo_user(
        DEMO_CLIENT_EMAIL,
        Role::Client,
        Some(clinic.id),
        None,
    )?)?;
    store.insert_user(demo_user(
        DEMO_CANDIDATE_EMAIL,
        Role::Candidate,
        None,
        Some(candidate.id),
    )?)?;

    store.insert_journey(Journey {
        id: JourneyId::new(),
        clinic: clinic.id,
        candidate: candidate.id,
        stage: JourneyStage::FirstInterview,
        scheduled_at: Some(now + Duration::days(3)),
        notes: Some("First introduction planned via video call.".to_string()),
        created_by: owner_id,
        created_at: now,
    })?;

    Ok(DemoFixtures {
        clinic: clinic.id,
        candidate: candidate.id,
        owner_user: owner_id,
    })
}

fn demo_user(
    email: &str,
    role: Role,
    clinic: Option<ClinicId>,
    candidate: Option<CandidateId>,
) -> Result<User, PortalError> {
    Ok(User {
        id: UserId::new(),
        email: email.to_string(),
        password_hash: hash_password(DEMO_PASSWORD)?,
        role,
        active: true,
        clinic,
        candidate,
        created_at: Utc::now(),
    })
}

/// Offline walkthrough: seed the fixtures, run a journey from trial day to
/// placed, and show the placement landing on the candidate.
pub(crate) fn run() -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::default());
    let fixtures = seed(&store)?;

    println!("Talent portal demo");
    println!("Logins (password {DEMO_PASSWORD}):");
    println!("- owner     {DEMO_OWNER_EMAIL}");
    println!("- client    {DEMO_CLIENT_EMAIL}");
    println!("- candidate {DEMO_CANDIDATE_EMAIL}");

    let journeys = JourneyService::new(store.clone());
    let journey = journeys.create(
        NewJourney {
            clinic: fixtures.clinic,
            candidate: fixtures.candidate,
            stage: Some(JourneyStage::TrialDay.label().to_string()),
            scheduled_at: None,
            notes: Some("Trial day agreed during the demo run.".to_string()),
        },
        fixtures.owner_user,
    )?;
    println!("\nCreated journey {} at stage {}", journey.id, journey.stage);

    let placed = journeys.update(
        journey.id,
        StageUpdate {
            stage: JourneyStage::Placed.label().to_string(),
            scheduled_at: None,
            notes: Some("Offer accepted.".to_string()),
        },
    )?;
    println!("Updated journey {} to stage {}", placed.id, placed.stage);

    let candidate = store
        .candidate(fixtures.candidate)
        .map_err(PortalError::from)?
        .ok_or(PortalError::NotFound)?;
    match (candidate.placed_clinic, candidate.placed_at) {
        (Some(clinic), Some(at)) => {
            println!("Candidate placed at clinic {clinic} on {at}");
        }
        _ => println!("Candidate has no placement recorded"),
    }

    Ok(())
}
