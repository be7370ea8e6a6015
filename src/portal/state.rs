use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;

use super::dashboards::{self, DashboardService};
use super::directory::{self, DirectoryService};
use super::documents::{self, DocumentService};
use super::error::PortalError;
use super::identity::domain::{bearer_token, Identity, Role};
use super::identity::{self, AuthService, IdentityResolver};
use super::journeys::{self, JourneyService};
use super::store::{FileStore, SessionStore, Store};

/// Everything the HTTP surface needs, threaded explicitly into each handler
/// instead of living in ambient request state.
pub struct PortalState<S, N, F> {
    pub resolver: Arc<IdentityResolver<S, N>>,
    pub auth: Arc<AuthService<S, N>>,
    pub directory: Arc<DirectoryService<S>>,
    pub journeys: Arc<JourneyService<S>>,
    pub documents: Arc<DocumentService<S, F>>,
    pub dashboards: Arc<DashboardService<S>>,
}

impl<S, N, F> PortalState<S, N, F>
where
    S: Store,
    N: SessionStore,
    F: FileStore,
{
    pub fn new(store: Arc<S>, sessions: Arc<N>, files: Arc<F>) -> Self {
        Self {
            resolver: Arc::new(IdentityResolver::new(store.clone(), sessions.clone())),
            auth: Arc::new(AuthService::new(store.clone(), sessions)),
            directory: Arc::new(DirectoryService::new(store.clone())),
            journeys: Arc::new(JourneyService::new(store.clone())),
            documents: Arc::new(DocumentService::new(store.clone(), files)),
            dashboards: Arc::new(DashboardService::new(store)),
        }
    }
}

impl<S, N, F> Clone for PortalState<S, N, F> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            auth: self.auth.clone(),
            directory: self.directory.clone(),
            journeys: self.journeys.clone(),
            documents: self.documents.clone(),
            dashboards: self.dashboards.clone(),
        }
    }
}

/// The whole portal surface as one router.
pub fn portal_router<S, N, F>(state: PortalState<S, N, F>) -> Router
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .merge(identity::auth_router(state.clone()))
        .merge(documents::files_router(state.clone()))
        .merge(journeys::journeys_router(state.clone()))
        .merge(directory::directory_router(state.clone()))
        .merge(dashboards::dashboards_router(state))
}

/// Resolve the acting identity from the request headers. Anonymous is a
/// valid result; only store failures surface as errors.
pub(crate) fn current_identity<S, N, F>(
    state: &PortalState<S, N, F>,
    headers: &HeaderMap,
) -> Result<Option<Identity>, PortalError>
where
    S: Store,
    N: SessionStore,
    F: FileStore,
{
    let token = bearer_token(headers);
    Ok(state.resolver.resolve(token.as_ref())?)
}

/// Role gate for the owner-only surface. Anonymous and wrong-role requests
/// get the same generic refusal.
pub(crate) fn require_owner(identity: Option<Identity>) -> Result<Identity, PortalError> {
    require_role(identity, Role::Owner)
}

pub(crate) fn require_role(
    identity: Option<Identity>,
    role: Role,
) -> Result<Identity, PortalError> {
    match identity {
        Some(identity) if identity.role == role => Ok(identity),
        _ => Err(PortalError::Forbidden),
    }
}
