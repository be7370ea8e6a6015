use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::domain::{plan_stage_change, Journey, JourneyId, JourneyStage, StageEffect};
use crate::portal::directory::domain::{CandidateId, ClinicId, UserId};
use crate::portal::error::PortalError;
use crate::portal::store::{Store, StoreError};

/// Intake for a new journey. `stage` is the raw wire string so a malformed
/// value is rejected here, before anything is persisted; a missing stage
/// starts the journey at the first interview.
#[derive(Debug, Clone)]
pub struct NewJourney {
    pub clinic: ClinicId,
    pub candidate: CandidateId,
    pub stage: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Full overwrite of a journey's mutable fields. No diffing and no history:
/// the previous stage, schedule, and notes are gone after the update.
#[derive(Debug, Clone)]
pub struct StageUpdate {
    pub stage: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A journey joined with the names the owner screens display.
#[derive(Debug, Clone)]
pub struct JourneyDetail {
    pub journey: Journey,
    pub clinic_name: String,
    pub candidate_name: String,
}

/// Creates and advances journeys, and applies the placement effect a stage
/// move plans. Role gating is the caller's job: this service trusts that
/// only owner-authenticated requests reach it.
pub struct JourneyService<S> {
    store: Arc<S>,
}

impl<S> JourneyService<S>
where
    S: Store,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, draft: NewJourney, created_by: UserId) -> Result<Journey, PortalError> {
        let stage = match draft.stage.as_deref() {
            Some(raw) => parse_stage(raw)?,
            None => JourneyStage::FirstInterview,
        };
        if self.store.clinic(draft.clinic)?.is_none() {
            return Err(PortalError::NotFound);
        }
        if self.store.candidate(draft.candidate)?.is_none() {
            return Err(PortalError::NotFound);
        }

        let journey = Journey {
            id: JourneyId::new(),
            clinic: draft.clinic,
            candidate: draft.candidate,
            stage,
            scheduled_at: draft.scheduled_at,
            notes: draft.notes,
            created_by,
            created_at: Utc::now(),
        };
        self.store.insert_journey(journey.clone())?;

        let change = plan_stage_change(None, stage);
        if change.effect == Some(StageEffect::RecordPlacement) {
            self.record_placement(&journey)?;
        }

        info!(journey = %journey.id, stage = stage.label(), "journey created");
        Ok(journey)
    }

    pub fn update(&self, id: JourneyId, update: StageUpdate) -> Result<Journey, PortalError> {
        let stage = parse_stage(&update.stage)?;
        let Some(mut journey) = self.store.journey(id)? else {
            return Err(PortalError::NotFound);
        };

        let change = plan_stage_change(Some(journey.stage), stage);
        journey.stage = change.to;
        journey.scheduled_at = update.scheduled_at;
        journey.notes = update.notes;
        self.store.update_journey(journey.clone())?;

        if change.effect == Some(StageEffect::RecordPlacement) {
            self.record_placement(&journey)?;
        }

        info!(
            journey = %journey.id,
            from = change.from.map(JourneyStage::label).unwrap_or("-"),
            to = change.to.label(),
            "journey stage updated"
        );
        Ok(journey)
    }

    pub fn list(&self) -> Result<Vec<JourneyDetail>, PortalError> {
        let journeys = self.store.journeys()?;
        let mut details = Vec::with_capacity(journeys.len());
        for journey in journeys {
            let clinic_name = self
                .store
                .clinic(journey.clinic)?
                .map(|clinic| clinic.name)
                .unwrap_or_default();
            let candidate_name = self
                .store
                .candidate(journey.candidate)?
                .map(|candidate| candidate.full_name())
                .unwrap_or_default();
            details.push(JourneyDetail {
                journey,
                clinic_name,
                candidate_name,
            });
        }
        Ok(details)
    }

    /// Write the placement record onto the candidate. The journey's stage is
    /// already committed at this point; if this second write fails the
    /// journey stays placed, the failure is logged, and the caller sees a
    /// persistence error. There is no rollback and no lock: concurrent
    /// placements for the same candidate are last-writer-wins.
    fn record_placement(&self, journey: &Journey) -> Result<(), PortalError> {
        let placed = self
            .store
            .candidate(journey.candidate)
            .and_then(|found| found.ok_or(StoreError::NotFound))
            .and_then(|mut candidate| {
                candidate.placed_clinic = Some(journey.clinic);
                candidate.placed_at = Some(Utc::now());
                self.store.update_candidate(candidate)
            });

        placed.map_err(|err| {
            error!(
                journey = %journey.id,
                candidate = %journey.candidate,
                error = %err,
                "journey reached placed but the placement record was not written"
            );
            PortalError::Persistence(err)
        })
    }
}

fn parse_stage(raw: &str) -> Result<JourneyStage, PortalError> {
    JourneyStage::parse(raw)
        .ok_or_else(|| PortalError::Validation(format!("unknown stage '{raw}'")))
}
