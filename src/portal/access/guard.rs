use std::sync::Arc;

use super::rules::{document_view_rule, AccessDecision, DocumentOwner, ViewRule};
use crate::portal::identity::domain::Identity;
use crate::portal::store::{JourneyDirectory, StoreError};

/// Applies the static rule table and resolves its one relational case
/// through the injected journey directory.
pub struct AccessGuard<L> {
    journeys: Arc<L>,
}

impl<L> AccessGuard<L>
where
    L: JourneyDirectory,
{
    pub fn new(journeys: Arc<L>) -> Self {
        Self { journeys }
    }

    pub fn allows_view(
        &self,
        identity: Option<&Identity>,
        owner: &DocumentOwner,
    ) -> Result<AccessDecision, StoreError> {
        match document_view_rule(identity, owner) {
            ViewRule::Allow => Ok(AccessDecision::Allow),
            ViewRule::Deny => Ok(AccessDecision::Deny),
            ViewRule::RequireJourney { clinic, candidate } => {
                if self.journeys.journey_exists(clinic, candidate)? {
                    Ok(AccessDecision::Allow)
                } else {
                    Ok(AccessDecision::Deny)
                }
            }
        }
    }
}
