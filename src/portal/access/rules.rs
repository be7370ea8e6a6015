use crate::portal::directory::domain::{CandidateId, ClinicId};
use crate::portal::identity::domain::{Identity, Role};

/// Which aggregate a stored document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOwner {
    Clinic(ClinicId),
    Candidate(CandidateId),
}

/// Binary outcome once every rule has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// Outcome of the static rule table. `RequireJourney` is the single case
/// that cannot be decided from the identity alone and must be resolved
/// against the journey directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRule {
    Allow,
    Deny,
    RequireJourney {
        clinic: ClinicId,
        candidate: CandidateId,
    },
}

/// The per-role, per-kind visibility table for stored documents, first match
/// wins:
///
/// - anonymous requests are denied;
/// - owners see everything;
/// - a client sees its own clinic's documents;
/// - a candidate sees its own documents;
/// - a client sees a candidate's documents only through a journey between
///   its clinic and that candidate, whatever stage that journey is in.
pub fn document_view_rule(identity: Option<&Identity>, owner: &DocumentOwner) -> ViewRule {
    let Some(identity) = identity else {
        return ViewRule::Deny;
    };
    if identity.is_owner() {
        return ViewRule::Allow;
    }

    match (*owner, identity.role) {
        (DocumentOwner::Clinic(clinic), Role::Client) => {
            if identity.clinic == Some(clinic) {
                ViewRule::Allow
            } else {
                ViewRule::Deny
            }
        }
        (DocumentOwner::Candidate(candidate), Role::Candidate) => {
            if identity.candidate == Some(candidate) {
                ViewRule::Allow
            } else {
                ViewRule::Deny
            }
        }
        (DocumentOwner::Candidate(candidate), Role::Client) => match identity.clinic {
            Some(clinic) => ViewRule::RequireJourney { clinic, candidate },
            None => ViewRule::Deny,
        },
        _ => ViewRule::Deny,
    }
}

/// Who may attach a new document: owners everywhere, a candidate on its own
/// record only. Fully static, no relational part.
pub fn document_upload_rule(identity: Option<&Identity>, owner: &DocumentOwner) -> AccessDecision {
    let Some(identity) = identity else {
        return AccessDecision::Deny;
    };
    if identity.is_owner() {
        return AccessDecision::Allow;
    }

    match (*owner, identity.role) {
        (DocumentOwner::Candidate(candidate), Role::Candidate)
            if identity.candidate == Some(candidate) =>
        {
            AccessDecision::Allow
        }
        _ => AccessDecision::Deny,
    }
}
