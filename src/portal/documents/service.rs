use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{
    safe_stored_name, CandidateDocument, CandidateDocumentId, ClinicDocument, ClinicDocumentId,
    DocumentUpload, FileDelivery,
};
use crate::portal::access::{
    document_upload_rule, AccessDecision, AccessGuard, DocumentOwner,
};
use crate::portal::directory::domain::{CandidateId, ClinicId, UserId};
use crate::portal::error::PortalError;
use crate::portal::identity::domain::Identity;
use crate::portal::store::{FileStore, Store};

const DEFAULT_CANDIDATE_DOCUMENT_KIND: &str = "CV";

/// Serves and ingests stored documents. Serving resolves the metadata
/// record first, then asks the access guard, then fetches the bytes: a
/// missing record is "not found", a live record the requester may not see
/// is "forbidden", and a record whose bytes have gone missing is "not
/// found" again with a warning logged.
pub struct DocumentService<S, F> {
    store: Arc<S>,
    files: Arc<F>,
    guard: AccessGuard<S>,
}

impl<S, F> DocumentService<S, F>
where
    S: Store,
    F: FileStore,
{
    pub fn new(store: Arc<S>, files: Arc<F>) -> Self {
        let guard = AccessGuard::new(store.clone());
        Self {
            store,
            files,
            guard,
        }
    }

    pub fn serve_clinic_document(
        &self,
        identity: Option<&Identity>,
        id: ClinicDocumentId,
    ) -> Result<FileDelivery, PortalError> {
        let Some(document) = self.store.clinic_document(id)? else {
            return Err(PortalError::NotFound);
        };
        let owner = DocumentOwner::Clinic(document.clinic);
        match self.guard.allows_view(identity, &owner)? {
            AccessDecision::Allow => self.deliver(
                &document.locator,
                document.media_type,
                document.original_name,
            ),
            AccessDecision::Deny => Err(PortalError::Forbidden),
        }
    }

    pub fn serve_candidate_document(
        &self,
        identity: Option<&Identity>,
        id: CandidateDocumentId,
    ) -> Result<FileDelivery, PortalError> {
        let Some(document) = self.store.candidate_document(id)? else {
            return Err(PortalError::NotFound);
        };
        let owner = DocumentOwner::Candidate(document.candidate);
        match self.guard.allows_view(identity, &owner)? {
            AccessDecision::Allow => self.deliver(
                &document.locator,
                document.media_type,
                document.original_name,
            ),
            AccessDecision::Deny => Err(PortalError::Forbidden),
        }
    }

    pub fn upload_clinic_document(
        &self,
        identity: Option<&Identity>,
        clinic: ClinicId,
        upload: DocumentUpload,
    ) -> Result<ClinicDocument, PortalError> {
        let owner = DocumentOwner::Clinic(clinic);
        if document_upload_rule(identity, &owner) == AccessDecision::Deny {
            return Err(PortalError::Forbidden);
        }
        if self.store.clinic(clinic)?.is_none() {
            return Err(PortalError::NotFound);
        }

        let uploader = uploader_id(identity)?;
        let now = Utc::now();
        let stored_name = safe_stored_name(&upload.original_name, now);
        let locator = format!("clinic/{stored_name}");
        self.files
            .put(&locator, &upload.bytes)
            .map_err(PortalError::Storage)?;

        let document = ClinicDocument {
            id: ClinicDocumentId::new(),
            clinic,
            original_name: upload.original_name,
            stored_name,
            media_type: upload.media_type,
            size_bytes: upload.bytes.len() as u64,
            locator,
            uploaded_by: uploader,
            created_at: now,
        };
        self.store.insert_clinic_document(document.clone())?;
        Ok(document)
    }

    pub fn upload_candidate_document(
        &self,
        identity: Option<&Identity>,
        candidate: CandidateId,
        upload: DocumentUpload,
    ) -> Result<CandidateDocument, PortalError> {
        let owner = DocumentOwner::Candidate(candidate);
        if document_upload_rule(identity, &owner) == AccessDecision::Deny {
            return Err(PortalError::Forbidden);
        }
        if self.store.candidate(candidate)?.is_none() {
            return Err(PortalError::NotFound);
        }

        let uploader = uploader_id(identity)?;
        let now = Utc::now();
        let stored_name = safe_stored_name(&upload.original_name, now);
        let locator = format!("candidate/{stored_name}");
        self.files
            .put(&locator, &upload.bytes)
            .map_err(PortalError::Storage)?;

        let document = CandidateDocument {
            id: CandidateDocumentId::new(),
            candidate,
            kind: upload
                .kind
                .filter(|kind| !kind.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CANDIDATE_DOCUMENT_KIND.to_string()),
            original_name: upload.original_name,
            stored_name,
            media_type: upload.media_type,
            size_bytes: upload.bytes.len() as u64,
            locator,
            uploaded_by: uploader,
            created_at: now,
        };
        self.store.insert_candidate_document(document.clone())?;
        Ok(document)
    }

    fn deliver(
        &self,
        locator: &str,
        media_type: String,
        original_name: String,
    ) -> Result<FileDelivery, PortalError> {
        let bytes = self
            .files
            .get(locator)
            .map_err(PortalError::Storage)?
            .ok_or_else(|| {
                warn!(locator, "document record exists but its bytes are gone");
                PortalError::NotFound
            })?;
        Ok(FileDelivery {
            bytes,
            media_type,
            original_name,
        })
    }
}

fn uploader_id(identity: Option<&Identity>) -> Result<UserId, PortalError> {
    identity
        .map(|identity| identity.user)
        .ok_or(PortalError::Forbidden)
}
