use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::portal::directory::domain::{CandidateId, ClinicId, UserId};

/// Identifier wrapper for clinic-owned documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClinicDocumentId(pub Uuid);

/// Identifier wrapper for candidate-owned documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateDocumentId(pub Uuid);

macro_rules! impl_document_id {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

impl_document_id!(ClinicDocumentId);
impl_document_id!(CandidateDocumentId);

/// Metadata for a stored clinic document. The bytes live in the file store
/// under `locator`; records are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicDocument {
    pub id: ClinicDocumentId,
    pub clinic: ClinicId,
    pub original_name: String,
    pub stored_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub locator: String,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a stored candidate document. `kind` is a free category tag;
/// uploads without one default to "CV".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: CandidateDocumentId,
    pub candidate: CandidateId,
    pub kind: String,
    pub original_name: String,
    pub stored_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub locator: String,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// An inbound upload before any authorization or storage has happened.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub original_name: String,
    pub media_type: String,
    pub kind: Option<String>,
    pub bytes: Vec<u8>,
}

/// An authorized document ready to stream back to the requester.
#[derive(Debug, Clone)]
pub struct FileDelivery {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub original_name: String,
}

/// Build a storage-safe name from an uploaded filename: a UTC stamp and a
/// random suffix for uniqueness, then the original reduced to a whitelisted
/// alphabet and capped at 80 characters. The result never contains a path
/// separator.
pub fn safe_stored_name(original: &str, now: DateTime<Utc>) -> String {
    let base: String = original
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .take(80)
        .collect();
    let stamp = now.format("%Y%m%dT%H%M%S");
    let suffix = Uuid::new_v4().simple();
    format!("{stamp}-{suffix}-{base}")
}
