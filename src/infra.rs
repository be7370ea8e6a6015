//! In-memory and on-disk implementations of the portal's collaborator
//! contracts. The in-memory variants back the default server, the demo
//! fixtures, and the test suites; `DiskFiles` keeps uploaded bytes under the
//! configured upload directory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::portal::directory::domain::{Candidate, CandidateId, Clinic, ClinicId, User, UserId};
use crate::portal::documents::domain::{
    CandidateDocument, CandidateDocumentId, ClinicDocument, ClinicDocumentId,
};
use crate::portal::identity::domain::SessionToken;
use crate::portal::journeys::domain::{Journey, JourneyId};
use crate::portal::store::{
    FileStore, JourneyDirectory, SessionStore, Store, StoreError,
};

#[derive(Default)]
struct MemoryTables {
    users: HashMap<UserId, User>,
    clinics: HashMap<ClinicId, Clinic>,
    candidates: HashMap<CandidateId, Candidate>,
    journeys: HashMap<JourneyId, Journey>,
    clinic_documents: HashMap<ClinicDocumentId, ClinicDocument>,
    candidate_documents: HashMap<CandidateDocumentId, CandidateDocument>,
}

/// Hash-map backed store. Uniqueness rules (user email, candidate email,
/// clinic registration number) are enforced the way the persistent schema
/// would enforce them, so services see the same `Conflict` surface.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryStore {
    fn with_tables<T>(&self, f: impl FnOnce(&mut MemoryTables) -> T) -> T {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        f(&mut tables)
    }
}

fn newest_first<T: Clone>(
    mut records: Vec<T>,
    created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    records.sort_by_key(|record| std::cmp::Reverse(created_at(record)));
    records
}

impl JourneyDirectory for MemoryStore {
    fn journey_exists(
        &self,
        clinic: ClinicId,
        candidate: CandidateId,
    ) -> Result<bool, StoreError> {
        Ok(self.with_tables(|tables| {
            tables
                .journeys
                .values()
                .any(|journey| journey.clinic == clinic && journey.candidate == candidate)
        }))
    }
}

impl Store for MemoryStore {
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.with_tables(|tables| tables.users.get(&id).cloned()))
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.with_tables(|tables| {
            tables
                .users
                .values()
                .find(|user| user.email.eq_ignore_ascii_case(email))
                .cloned()
        }))
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            let duplicate = tables
                .users
                .values()
                .any(|existing| existing.email.eq_ignore_ascii_case(&user.email));
            if duplicate {
                return Err(StoreError::Conflict);
            }
            tables.users.insert(user.id, user);
            Ok(())
        })
    }

    fn update_user(&self, user: User) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            if !tables.users.contains_key(&user.id) {
                return Err(StoreError::NotFound);
            }
            let duplicate = tables.users.values().any(|existing| {
                existing.id != user.id && existing.email.eq_ignore_ascii_case(&user.email)
            });
            if duplicate {
                return Err(StoreError::Conflict);
            }
            tables.users.insert(user.id, user);
            Ok(())
        })
    }

    fn clinic(&self, id: ClinicId) -> Result<Option<Clinic>, StoreError> {
        Ok(self.with_tables(|tables| tables.clinics.get(&id).cloned()))
    }

    fn insert_clinic(&self, clinic: Clinic) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            let duplicate = tables
                .clinics
                .values()
                .any(|existing| existing.registration_number == clinic.registration_number);
            if duplicate {
                return Err(StoreError::Conflict);
            }
            tables.clinics.insert(clinic.id, clinic);
            Ok(())
        })
    }

    fn update_clinic(&self, clinic: Clinic) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            if !tables.clinics.contains_key(&clinic.id) {
                return Err(StoreError::NotFound);
            }
            let duplicate = tables.clinics.values().any(|existing| {
                existing.id != clinic.id
                    && existing.registration_number == clinic.registration_number
            });
            if duplicate {
                return Err(StoreError::Conflict);
            }
            tables.clinics.insert(clinic.id, clinic);
            Ok(())
        })
    }

    fn clinics(&self) -> Result<Vec<Clinic>, StoreError> {
        let records = self.with_tables(|tables| tables.clinics.values().cloned().collect());
        Ok(newest_first(records, |clinic: &Clinic| clinic.created_at))
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StoreError> {
        Ok(self.with_tables(|tables| tables.candidates.get(&id).cloned()))
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            let duplicate = tables
                .candidates
                .values()
                .any(|existing| existing.email.eq_ignore_ascii_case(&candidate.email));
            if duplicate {
                return Err(StoreError::Conflict);
            }
            tables.candidates.insert(candidate.id, candidate);
            Ok(())
        })
    }

    fn update_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            if !tables.candidates.contains_key(&candidate.id) {
                return Err(StoreError::NotFound);
            }
            let duplicate = tables.candidates.values().any(|existing| {
                existing.id != candidate.id && existing.email.eq_ignore_ascii_case(&candidate.email)
            });
            if duplicate {
                return Err(StoreError::Conflict);
            }
            tables.candidates.insert(candidate.id, candidate);
            Ok(())
        })
    }

    fn candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let records = self.with_tables(|tables| tables.candidates.values().cloned().collect());
        Ok(newest_first(records, |candidate: &Candidate| {
            candidate.created_at
        }))
    }

    fn journey(&self, id: JourneyId) -> Result<Option<Journey>, StoreError> {
        Ok(self.with_tables(|tables| tables.journeys.get(&id).cloned()))
    }

    fn insert_journey(&self, journey: Journey) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            tables.journeys.insert(journey.id, journey);
            Ok(())
        })
    }

    fn update_journey(&self, journey: Journey) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            if !tables.journeys.contains_key(&journey.id) {
                return Err(StoreError::NotFound);
            }
            tables.journeys.insert(journey.id, journey);
            Ok(())
        })
    }

    fn journeys(&self) -> Result<Vec<Journey>, StoreError> {
        let records = self.with_tables(|tables| tables.journeys.values().cloned().collect());
        Ok(newest_first(records, |journey: &Journey| journey.created_at))
    }

    fn journeys_for_clinic(&self, clinic: ClinicId) -> Result<Vec<Journey>, StoreError> {
        let records = self.with_tables(|tables| {
            tables
                .journeys
                .values()
                .filter(|journey| journey.clinic == clinic)
                .cloned()
                .collect()
        });
        Ok(newest_first(records, |journey: &Journey| journey.created_at))
    }

    fn journeys_for_candidate(&self, candidate: CandidateId) -> Result<Vec<Journey>, StoreError> {
        let records = self.with_tables(|tables| {
            tables
                .journeys
                .values()
                .filter(|journey| journey.candidate == candidate)
                .cloned()
                .collect()
        });
        Ok(newest_first(records, |journey: &Journey| journey.created_at))
    }

    fn clinic_document(&self, id: ClinicDocumentId) -> Result<Option<ClinicDocument>, StoreError> {
        Ok(self.with_tables(|tables| tables.clinic_documents.get(&id).cloned()))
    }

    fn candidate_document(
        &self,
        id: CandidateDocumentId,
    ) -> Result<Option<CandidateDocument>, StoreError> {
        Ok(self.with_tables(|tables| tables.candidate_documents.get(&id).cloned()))
    }

    fn insert_clinic_document(&self, document: ClinicDocument) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            tables.clinic_documents.insert(document.id, document);
            Ok(())
        })
    }

    fn insert_candidate_document(&self, document: CandidateDocument) -> Result<(), StoreError> {
        self.with_tables(|tables| {
            tables.candidate_documents.insert(document.id, document);
            Ok(())
        })
    }

    fn clinic_documents(&self, clinic: ClinicId) -> Result<Vec<ClinicDocument>, StoreError> {
        let records = self.with_tables(|tables| {
            tables
                .clinic_documents
                .values()
                .filter(|document| document.clinic == clinic)
                .cloned()
                .collect()
        });
        Ok(newest_first(records, |document: &ClinicDocument| {
            document.created_at
        }))
    }

    fn candidate_documents(
        &self,
        candidate: CandidateId,
    ) -> Result<Vec<CandidateDocument>, StoreError> {
        let records = self.with_tables(|tables| {
            tables
                .candidate_documents
                .values()
                .filter(|document| document.candidate == candidate)
                .cloned()
                .collect()
        });
        Ok(newest_first(records, |document: &CandidateDocument| {
            document.created_at
        }))
    }
}

/// Server-side sessions in a hash map.
#[derive(Default, Clone)]
pub struct MemorySessions {
    sessions: Arc<Mutex<HashMap<SessionToken, UserId>>>,
}

impl SessionStore for MemorySessions {
    fn open(&self, user: UserId) -> Result<SessionToken, StoreError> {
        let token = SessionToken::issue();
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(token, user);
        Ok(token)
    }

    fn user_for(&self, token: &SessionToken) -> Result<Option<UserId>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .copied())
    }

    fn invalidate(&self, token: &SessionToken) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(token);
        Ok(())
    }
}

/// Document bytes in a hash map, for tests and ephemeral deployments.
#[derive(Default, Clone)]
pub struct MemoryFiles {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryFiles {
    /// Drop stored bytes while keeping any metadata record intact, to
    /// exercise the record-without-bytes serving path.
    pub fn remove(&self, locator: &str) {
        self.blobs
            .lock()
            .expect("file mutex poisoned")
            .remove(locator);
    }
}

impl FileStore for MemoryFiles {
    fn put(&self, locator: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.blobs
            .lock()
            .expect("file mutex poisoned")
            .insert(locator.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, locator: &str) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self
            .blobs
            .lock()
            .expect("file mutex poisoned")
            .get(locator)
            .cloned())
    }
}

/// Document bytes under a root directory. Locators are relative paths
/// produced by the document service; anything trying to escape the root is
/// refused.
#[derive(Debug, Clone)]
pub struct DiskFiles {
    root: PathBuf,
}

impl DiskFiles {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, locator: &str) -> std::io::Result<PathBuf> {
        let relative = std::path::Path::new(locator);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|part| matches!(part, std::path::Component::ParentDir));
        if escapes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "locator escapes the upload root",
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl FileStore for DiskFiles {
    fn put(&self, locator: &str, bytes: &[u8]) -> std::io::Result<()> {
        let path = self.resolve(locator)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
    }

    fn get(&self, locator: &str) -> std::io::Result<Option<Vec<u8>>> {
        let path = self.resolve(locator)?;
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
