use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::domain::{
    Candidate, CandidateId, CandidateStatus, CandidateUpdate, Clinic, ClinicId, ClinicUpdate,
    LoginGrant, NewCandidate, NewClinic, NewLogin, ProvisionedLogin, User, UserId,
};
use crate::portal::documents::domain::{CandidateDocument, ClinicDocument};
use crate::portal::error::PortalError;
use crate::portal::identity::credentials::{generate_password, hash_password};
use crate::portal::journeys::domain::Journey;
use crate::portal::store::{Store, StoreError};

/// A clinic joined with everything the owner's detail screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicDetail {
    pub clinic: Clinic,
    pub documents: Vec<ClinicDocument>,
    pub journeys: Vec<Journey>,
}

/// A candidate joined with documents, journeys, and the placed clinic's
/// name when a placement has been recorded.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    pub candidate: Candidate,
    pub documents: Vec<CandidateDocument>,
    pub journeys: Vec<Journey>,
    pub placed_clinic_name: Option<String>,
}

/// Owner-side management of clinics, candidates, and their portal logins.
/// Role gating happens at the router; every operation here assumes an owner
/// is calling.
pub struct DirectoryService<S> {
    store: Arc<S>,
}

impl<S> DirectoryService<S>
where
    S: Store,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create_clinic(&self, intake: NewClinic) -> Result<Clinic, PortalError> {
        let clinic = Clinic {
            id: ClinicId::new(),
            name: intake.name,
            registration_number: intake.registration_number,
            address: intake.address,
            contact_name: intake.contact_name,
            contact_email: intake.contact_email,
            contact_phone: intake.contact_phone,
            notes: intake.notes,
            created_at: Utc::now(),
        };
        self.store
            .insert_clinic(clinic.clone())
            .map_err(conflict_as(
                "a clinic with this registration number already exists",
            ))?;
        info!(clinic = %clinic.id, "clinic registered");
        Ok(clinic)
    }

    pub fn update_clinic(&self, id: ClinicId, update: ClinicUpdate) -> Result<Clinic, PortalError> {
        let Some(mut clinic) = self.store.clinic(id)? else {
            return Err(PortalError::NotFound);
        };
        clinic.name = update.name;
        clinic.registration_number = update.registration_number;
        clinic.address = update.address;
        clinic.contact_name = update.contact_name;
        clinic.contact_email = update.contact_email;
        clinic.contact_phone = update.contact_phone;
        clinic.notes = update.notes;
        self.store
            .update_clinic(clinic.clone())
            .map_err(conflict_as(
                "a clinic with this registration number already exists",
            ))?;
        Ok(clinic)
    }

    pub fn clinics(&self) -> Result<Vec<Clinic>, PortalError> {
        Ok(self.store.clinics()?)
    }

    pub fn clinic_detail(&self, id: ClinicId) -> Result<ClinicDetail, PortalError> {
        let Some(clinic) = self.store.clinic(id)? else {
            return Err(PortalError::NotFound);
        };
        let documents = self.store.clinic_documents(id)?;
        let journeys = self.store.journeys_for_clinic(id)?;
        Ok(ClinicDetail {
            clinic,
            documents,
            journeys,
        })
    }

    pub fn create_candidate(&self, intake: NewCandidate) -> Result<Candidate, PortalError> {
        let candidate = Candidate {
            id: CandidateId::new(),
            first_name: intake.first_name,
            last_name: intake.last_name,
            email: intake.email,
            phone: intake.phone,
            location: intake.location,
            job_wishes: intake.job_wishes,
            desired_rate: intake.desired_rate,
            availability: intake.availability,
            status: CandidateStatus::Active,
            notes: intake.notes,
            placed_clinic: None,
            placed_at: None,
            created_at: Utc::now(),
        };
        self.store
            .insert_candidate(candidate.clone())
            .map_err(conflict_as("a candidate with this email already exists"))?;
        info!(candidate = %candidate.id, "candidate registered");
        Ok(candidate)
    }

    pub fn update_candidate(
        &self,
        id: CandidateId,
        update: CandidateUpdate,
    ) -> Result<Candidate, PortalError> {
        let Some(mut candidate) = self.store.candidate(id)? else {
            return Err(PortalError::NotFound);
        };
        candidate.first_name = update.first_name;
        candidate.last_name = update.last_name;
        candidate.email = update.email;
        candidate.phone = update.phone;
        candidate.location = update.location;
        candidate.job_wishes = update.job_wishes;
        candidate.desired_rate = update.desired_rate;
        candidate.availability = update.availability;
        candidate.notes = update.notes;
        candidate.status = update.status;
        self.store
            .update_candidate(candidate.clone())
            .map_err(conflict_as("a candidate with this email already exists"))?;
        Ok(candidate)
    }

    pub fn candidates(&self) -> Result<Vec<Candidate>, PortalError> {
        Ok(self.store.candidates()?)
    }

    pub fn candidate_detail(&self, id: CandidateId) -> Result<CandidateDetail, PortalError> {
        let Some(candidate) = self.store.candidate(id)? else {
            return Err(PortalError::NotFound);
        };
        let documents = self.store.candidate_documents(id)?;
        let journeys = self.store.journeys_for_candidate(id)?;
        let placed_clinic_name = match candidate.placed_clinic {
            Some(clinic) => self.store.clinic(clinic)?.map(|clinic| clinic.name),
            None => None,
        };
        Ok(CandidateDetail {
            candidate,
            documents,
            journeys,
            placed_clinic_name,
        })
    }

    /// Provision a portal login bound to a clinic or candidate. When no
    /// password is supplied one is generated and returned exactly once in
    /// the result; only the hash is stored.
    pub fn create_login(&self, request: NewLogin) -> Result<ProvisionedLogin, PortalError> {
        match request.grant {
            LoginGrant::Clinic(clinic) => {
                if self.store.clinic(clinic)?.is_none() {
                    return Err(PortalError::NotFound);
                }
            }
            LoginGrant::Candidate(candidate) => {
                if self.store.candidate(candidate)?.is_none() {
                    return Err(PortalError::NotFound);
                }
            }
        }

        let plain = request.password.unwrap_or_else(generate_password);
        let password_hash = hash_password(&plain)?;
        let user = User {
            id: UserId::new(),
            email: request.email.clone(),
            password_hash,
            role: request.grant.role(),
            active: true,
            clinic: match request.grant {
                LoginGrant::Clinic(clinic) => Some(clinic),
                LoginGrant::Candidate(_) => None,
            },
            candidate: match request.grant {
                LoginGrant::Clinic(_) => None,
                LoginGrant::Candidate(candidate) => Some(candidate),
            },
            created_at: Utc::now(),
        };
        self.store
            .insert_user(user.clone())
            .map_err(conflict_as("a login with this email already exists"))?;

        info!(user = %user.id, role = user.role.label(), "login provisioned");
        Ok(ProvisionedLogin {
            user: user.id,
            email: request.email,
            password: plain,
        })
    }

    /// Turn off a login. Users are never deleted; any open session for the
    /// user stops resolving on its next request.
    pub fn deactivate_login(&self, id: UserId) -> Result<(), PortalError> {
        let Some(mut user) = self.store.user(id)? else {
            return Err(PortalError::NotFound);
        };
        user.active = false;
        self.store.update_user(user)?;
        info!(user = %id, "login deactivated");
        Ok(())
    }
}

fn conflict_as(message: &str) -> impl Fn(StoreError) -> PortalError + '_ {
    move |err| match err {
        StoreError::Conflict => PortalError::Validation(message.to_string()),
        other => PortalError::from(other),
    }
}
