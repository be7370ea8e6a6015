use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::portal::error::PortalError;
use crate::portal::identity::domain::Role;
use crate::portal::state::{current_identity, require_role, PortalState};
use crate::portal::store::{FileStore, SessionStore, Store};

/// One landing endpoint per role.
pub fn dashboards_router<S, N, F>(state: PortalState<S, N, F>) -> Router
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/owner", get(owner_home_handler::<S, N, F>))
        .route("/client", get(client_home_handler::<S, N, F>))
        .route("/candidate", get(candidate_home_handler::<S, N, F>))
        .with_state(state)
}

pub(crate) async fn owner_home_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    require_role(current_identity(&state, &headers)?, Role::Owner)?;
    let overview = state.dashboards.owner_overview()?;
    Ok(Json(overview).into_response())
}

pub(crate) async fn client_home_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = require_role(current_identity(&state, &headers)?, Role::Client)?;
    let home = state.dashboards.client_home(&identity)?;
    Ok(Json(home).into_response())
}

pub(crate) async fn candidate_home_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = require_role(current_identity(&state, &headers)?, Role::Candidate)?;
    let home = state.dashboards.candidate_home(&identity)?;
    Ok(Json(home).into_response())
}
