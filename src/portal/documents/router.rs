use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::domain::{CandidateDocumentId, ClinicDocumentId, DocumentUpload, FileDelivery};
use crate::portal::directory::domain::{CandidateId, ClinicId};
use crate::portal::error::PortalError;
use crate::portal::state::{current_identity, PortalState};
use crate::portal::store::{FileStore, SessionStore, Store};

/// Document serving and upload endpoints. Serving is open to any resolved
/// identity the access rules allow; uploads are owner-side except for a
/// candidate adding to its own record.
pub fn files_router<S, N, F>(state: PortalState<S, N, F>) -> Router
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/files/clinic/:doc_id", get(serve_clinic_handler::<S, N, F>))
        .route(
            "/files/candidate/:doc_id",
            get(serve_candidate_handler::<S, N, F>),
        )
        .route(
            "/owner/clinics/:id/documents",
            post(upload_clinic_handler::<S, N, F>),
        )
        .route(
            "/owner/candidates/:id/documents",
            post(upload_candidate_handler::<S, N, F>),
        )
        .route(
            "/candidate/documents",
            post(upload_own_document_handler::<S, N, F>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadParams {
    pub(crate) filename: String,
    #[serde(default)]
    pub(crate) kind: Option<String>,
}

pub(crate) async fn serve_clinic_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(doc_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    let delivery = state
        .documents
        .serve_clinic_document(identity.as_ref(), ClinicDocumentId(doc_id))?;
    Ok(delivery_response(delivery))
}

pub(crate) async fn serve_candidate_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(doc_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    let delivery = state
        .documents
        .serve_candidate_document(identity.as_ref(), CandidateDocumentId(doc_id))?;
    Ok(delivery_response(delivery))
}

pub(crate) async fn upload_clinic_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    let upload = upload_from_request(params, &headers, body);
    let document =
        state
            .documents
            .upload_clinic_document(identity.as_ref(), ClinicId(id), upload)?;
    Ok((StatusCode::CREATED, Json(document)).into_response())
}

pub(crate) async fn upload_candidate_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Path(id): Path<Uuid>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    let upload = upload_from_request(params, &headers, body);
    let document =
        state
            .documents
            .upload_candidate_document(identity.as_ref(), CandidateId(id), upload)?;
    Ok((StatusCode::CREATED, Json(document)).into_response())
}

/// A candidate attaching a document to its own record; the target id comes
/// from the identity, never the request.
pub(crate) async fn upload_own_document_handler<S, N, F>(
    State(state): State<PortalState<S, N, F>>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, PortalError>
where
    S: Store + 'static,
    N: SessionStore + 'static,
    F: FileStore + 'static,
{
    let identity = current_identity(&state, &headers)?;
    let candidate = identity
        .as_ref()
        .and_then(|identity| identity.candidate)
        .ok_or(PortalError::Forbidden)?;
    let upload = upload_from_request(params, &headers, body);
    let document =
        state
            .documents
            .upload_candidate_document(identity.as_ref(), candidate, upload)?;
    Ok((StatusCode::CREATED, Json(document)).into_response())
}

fn upload_from_request(params: UploadParams, headers: &HeaderMap, body: Bytes) -> DocumentUpload {
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
    DocumentUpload {
        original_name: params.filename,
        media_type,
        kind: params.kind,
        bytes: body.to_vec(),
    }
}

fn delivery_response(delivery: FileDelivery) -> Response {
    let filename = delivery
        .original_name
        .replace(['"', '\r', '\n', '\\'], "_");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, delivery.media_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        delivery.bytes,
    )
        .into_response()
}
