use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{parse_schedule, JourneyId};
use super::service::{JourneyDetail, NewJourney, StageUpdate};
use crate::portal::directory::domain::{CandidateId, ClinicId};
use crate::portal::error::PortalError;
use crate::portal::state::{current_identity, require_owner, PortalState};
use crate::portal::store::{FileStore, SessionStore, Store};

/// Owner-side journey management. The role gate lives here: the service
/// itself trusts its caller.
pub fn journeys_router<S, N, F>(state: PortalState<S, N, F>) -> Router
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/owner/journeys", get(list_journeys_handler::<S, N, F>))
        .route(
            "/owner/journeys/new",
            post(create_journey_handler::<S, N, F>),
        )
        .route(
            "/owner/journeys/:id/update",
            post(update_journey_handler::<S, N, F>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateJourneyBody {
    pub(crate) clinic_id: Uuid,
    pub(crate) candidate_id: Uuid,
    #[serde(default)]
    pub(crate) stage: Option<String>,
    #[serde(default)]
    pub(crate) scheduled_at: Option<String>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateJourneyBody {
    pub(crate) stage: String,
    #[serde(default)]
    pub(crate) scheduled_at: Option<String>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JourneyView {
    pub(crate) id: JourneyId,
    pub(crate) clinic_id: ClinicId,
    pub(crate) clinic_name: String,
    pub(crate) candidate_id: CandidateId,
    pub(crate) candidate_name: String,
    pub(crate) stage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<JourneyDetail> for JourneyView {
    fn from(detail: JourneyDetail) -> Self {
        Self {
            id: detail.journey.id,
            clinic_id: detail.journey.clinic,
            clinic_name: detail.clinic_name,
            candidate_id: detail.journey.candidate,
            candidate_name: detail.candidate_name,
            stage: detail.journey.stage.label(),
            scheduled_at: detail.journey.scheduled_at,
            notes: detail.journey.notes,
            created_at: detail.journey.created_at,
        }
    }
}

pub(crate) async fn list_journeys_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<Json<Vec<JourneyView>>, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    require_owner(identity)?;
    let journeys = state
        .journeys
        .list()?
        .into_iter()
        .map(JourneyView::from)
        .collect();
    Ok(Json(journeys))
}

pub(crate) async fn create_journey_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
    Json(body): Json<CreateJourneyBody>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    let owner = require_owner(identity)?;

    let draft = NewJourney {
        clinic: ClinicId(body.clinic_id),
        candidate: CandidateId(body.candidate_id),
        stage: body.stage,
        scheduled_at: body.scheduled_at.as_deref().and_then(parse_schedule),
        notes: normalize_notes(body.notes),
    };
    let journey = state.journeys.create(draft, owner.user)?;
    Ok((StatusCode::CREATED, Json(journey)).into_response())
}

pub(crate) async fn update_journey_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<UpdateJourneyBody>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    require_owner(identity)?;

    let update = StageUpdate {
        stage: body.stage,
        scheduled_at: body.scheduled_at.as_deref().and_then(parse_schedule),
        notes: normalize_notes(body.notes),
    };
    let journey = state.journeys.update(JourneyId(id), update)?;
    Ok((StatusCode::OK, Json(journey)).into_response())
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}
