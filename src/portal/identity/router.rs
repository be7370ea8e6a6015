use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::domain::bearer_token;
use crate::portal::error::PortalError;
use crate::portal::state::PortalState;
use crate::portal::store::{FileStore, SessionStore, Store};

/// Login and logout endpoints.
pub fn auth_router<S, N, F>(state: PortalState<S, N, F>) -> Router
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/login", post(login_handler::<S, N, F>))
        .route("/logout", post(logout_handler::<S, N, F>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    pub(crate) email: String,
    pub(crate) password: String,
}

pub(crate) async fn login_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Json(body): Json<LoginBody>,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let session = state.auth.login(&body.email, &body.password)?;
    Ok((StatusCode::OK, Json(session)).into_response())
}

pub(crate) async fn logout_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    headers: HeaderMap,
) -> Result<StatusCode, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    if let Some(token) = bearer_token(&headers) {
        state.auth.logout(&token)?;
    }
    Ok(StatusCode::NO_CONTENT)
}
