use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::domain::{
    CandidateId, CandidateUpdate, ClinicId, ClinicUpdate, LoginGrant, NewCandidate, NewClinic,
    NewLogin, UserId,
};
use crate::portal::error::PortalError;
use crate::portal::state::{current_identity, require_owner, PortalState};
use crate::portal::store::{FileStore, SessionStore, Store};

/// Owner-side clinic and candidate management.
pub fn directory_router<S, N, F>(state: PortalState<S, N, F>) -> Router
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/owner/clinics", get(list_clinics_handler::<S, N, F>))
        .route("/owner/clinics/new", post(create_clinic_handler::<S, N, F>))
        .route("/owner/clinics/:id", get(clinic_detail_handler::<S, N, F>))
        .route(
            "/owner/clinics/:id/edit",
            post(update_clinic_handler::<S, N, F>),
        )
        .route(
            "/owner/clinics/:id/create-login",
            post(create_clinic_login_handler::<S, N, F>),
        )
        .route("/owner/candidates", get(list_candidates_handler::<S, N, F>))
        .route(
            "/owner/candidates/new",
            post(create_candidate_handler::<S, N, F>),
        )
        .route(
            "/owner/candidates/:id",
            get(candidate_detail_handler::<S, N, F>),
        )
        .route(
            "/owner/candidates/:id/edit",
            post(update_candidate_handler::<S, N, F>),
        )
        .route(
            "/owner/candidates/:id/create-login",
            post(create_candidate_login_handler::<S, N, F>),
        )
        .route(
            "/owner/logins/:id/deactivate",
            post(deactivate_login_handler::<S, N, F>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateLoginBody {
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: Option<String>,
}

pub(crate) async fn list_clinics_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let clinics = state.directory.clinics()?;
    Ok(Json(clinics).into_response())
}

pub(crate) async fn create_clinic_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
    Json(body): Json<NewClinic>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let clinic = state.directory.create_clinic(body)?;
    Ok((StatusCode::CREATED, Json(clinic)).into_response())
}

pub(crate) async fn clinic_detail_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let detail = state.directory.clinic_detail(ClinicId(id))?;
    Ok(Json(detail).into_response())
}

pub(crate) async fn update_clinic_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<ClinicUpdate>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let clinic = state.directory.update_clinic(ClinicId(id), body)?;
    Ok(Json(clinic).into_response())
}

pub(crate) async fn create_clinic_login_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<CreateLoginBody>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let login = state.directory.create_login(NewLogin {
        email: body.email,
        password: body.password,
        grant: LoginGrant::Clinic(ClinicId(id)),
    })?;
    Ok((StatusCode::CREATED, Json(login)).into_response())
}

pub(crate) async fn list_candidates_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let candidates = state.directory.candidates()?;
    Ok(Json(candidates).into_response())
}

pub(crate) async fn create_candidate_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
    Json(body): Json<NewCandidate>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let candidate = state.directory.create_candidate(body)?;
    Ok((StatusCode::CREATED, Json(candidate)).into_response())
}

pub(crate) async fn candidate_detail_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let detail = state.directory.candidate_detail(CandidateId(id))?;
    Ok(Json(detail).into_response())
}

pub(crate) async fn update_candidate_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<CandidateUpdate>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let candidate = state.directory.update_candidate(CandidateId(id), body)?;
    Ok(Json(candidate).into_response())
}

pub(crate) async fn create_candidate_login_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<CreateLoginBody>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    let login = state.directory.create_login(NewLogin {
        email: body.email,
        password: body.password,
        grant: LoginGrant::Candidate(CandidateId(id)),
    })?;
    Ok((StatusCode::CREATED, Json(login)).into_response())
}

pub(crate) async fn deactivate_login_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_owner(current_identity(&state, &headers)?)?;
    state.directory.deactivate_login(UserId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
