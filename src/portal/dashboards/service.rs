use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::portal::directory::domain::{CandidateId, CandidateStatus, ClinicId};
use crate::portal::documents::domain::{CandidateDocument, ClinicDocument};
use crate::portal::error::PortalError;
use crate::portal::identity::domain::Identity;
use crate::portal::journeys::domain::{Journey, JourneyId};
use crate::portal::store::Store;

/// Entity counters for the owner landing page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OwnerOverview {
    pub clinics: usize,
    pub candidates: usize,
    pub journeys: usize,
}

/// A stored document as the dashboards list it.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub id: uuid::Uuid,
    pub name: String,
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DocumentEntry {
    fn from_clinic(document: ClinicDocument) -> Self {
        Self {
            id: document.id.0,
            name: document.original_name,
            media_type: document.media_type,
            kind: None,
            created_at: document.created_at,
        }
    }

    fn from_candidate(document: CandidateDocument) -> Self {
        Self {
            id: document.id.0,
            name: document.original_name,
            media_type: document.media_type,
            kind: Some(document.kind),
            created_at: document.created_at,
        }
    }
}

/// The candidate slice a client is allowed to see: name, location, status,
/// and CV documents. Contact details stay with the owner.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub id: CandidateId,
    pub name: String,
    pub location: String,
    pub status: CandidateStatus,
    pub cv_documents: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientJourneyEntry {
    pub id: JourneyId,
    pub stage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub candidate: CandidateSummary,
}

/// Everything the client landing page shows about its own clinic.
#[derive(Debug, Clone, Serialize)]
pub struct ClientHome {
    pub clinic_id: ClinicId,
    pub clinic_name: String,
    pub documents: Vec<DocumentEntry>,
    pub journeys: Vec<ClientJourneyEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateJourneyEntry {
    pub id: JourneyId,
    pub stage: &'static str,
    pub clinic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The candidate landing page: own record, documents, and journeys.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateHome {
    pub candidate_id: CandidateId,
    pub name: String,
    pub status: CandidateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_clinic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime<Utc>>,
    pub documents: Vec<DocumentEntry>,
    pub journeys: Vec<CandidateJourneyEntry>,
}

/// Builds the per-role landing views. Each view only ever reads the scope
/// the identity's relation grants; an identity without the matching
/// relation is refused outright.
pub struct DashboardService<S> {
    store: Arc<S>,
}

impl<S> DashboardService<S>
where
    S: Store,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn owner_overview(&self) -> Result<OwnerOverview, PortalError> {
        Ok(OwnerOverview {
            clinics: self.store.clinics()?.len(),
            candidates: self.store.candidates()?.len(),
            journeys: self.store.journeys()?.len(),
        })
    }

    pub fn client_home(&self, identity: &Identity) -> Result<ClientHome, PortalError> {
        let Some(clinic_id) = identity.clinic else {
            return Err(PortalError::Forbidden);
        };
        let Some(clinic) = self.store.clinic(clinic_id)? else {
            return Err(PortalError::NotFound);
        };

        let documents = self
            .store
            .clinic_documents(clinic_id)?
            .into_iter()
            .map(DocumentEntry::from_clinic)
            .collect();

        let mut journeys = Vec::new();
        for journey in self.store.journeys_for_clinic(clinic_id)? {
            if let Some(summary) = self.candidate_summary(&journey)? {
                journeys.push(ClientJourneyEntry {
                    id: journey.id,
                    stage: journey.stage.label(),
                    scheduled_at: journey.scheduled_at,
                    notes: journey.notes,
                    candidate: summary,
                });
            }
        }

        Ok(ClientHome {
            clinic_id,
            clinic_name: clinic.name,
            documents,
            journeys,
        })
    }

    pub fn candidate_home(&self, identity: &Identity) -> Result<CandidateHome, PortalError> {
        let Some(candidate_id) = identity.candidate else {
            return Err(PortalError::Forbidden);
        };
        let Some(candidate) = self.store.candidate(candidate_id)? else {
            return Err(PortalError::NotFound);
        };

        let documents = self
            .store
            .candidate_documents(candidate_id)?
            .into_iter()
            .map(DocumentEntry::from_candidate)
            .collect();

        let mut journeys = Vec::new();
        for journey in self.store.journeys_for_candidate(candidate_id)? {
            let clinic_name = self
                .store
                .clinic(journey.clinic)?
                .map(|clinic| clinic.name)
                .unwrap_or_default();
            journeys.push(CandidateJourneyEntry {
                id: journey.id,
                stage: journey.stage.label(),
                clinic_name,
                scheduled_at: journey.scheduled_at,
                notes: journey.notes,
            });
        }

        let placed_clinic_name = match candidate.placed_clinic {
            Some(clinic) => self.store.clinic(clinic)?.map(|clinic| clinic.name),
            None => None,
        };

        Ok(CandidateHome {
            candidate_id,
            name: candidate.full_name(),
            status: candidate.status,
            placed_clinic_name,
            placed_at: candidate.placed_at,
            documents,
            journeys,
        })
    }

    fn candidate_summary(&self, journey: &Journey) -> Result<Option<CandidateSummary>, PortalError> {
        let Some(candidate) = self.store.candidate(journey.candidate)? else {
            return Ok(None);
        };
        let cv_documents = self
            .store
            .candidate_documents(candidate.id)?
            .into_iter()
            .filter(|document| document.kind == "CV")
            .map(DocumentEntry::from_candidate)
            .collect();
        Ok(Some(CandidateSummary {
            id: candidate.id,
            name: candidate.full_name(),
            location: candidate.location,
            status: candidate.status,
            cv_documents,
        }))
    }
}
