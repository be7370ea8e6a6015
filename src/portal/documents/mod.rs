//! Stored document metadata, upload intake, and authorized serving.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    safe_stored_name, CandidateDocument, CandidateDocumentId, ClinicDocument, ClinicDocumentId,
    DocumentUpload, FileDelivery,
};
pub use router::files_router;
pub use service::DocumentService;
