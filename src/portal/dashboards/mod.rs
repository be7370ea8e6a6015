//! Role-scoped landing views: owner counters, the client's clinic page, and
//! the candidate's own page.

pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use router::dashboards_router;
pub use service::{
    CandidateHome, ClientHome, DashboardService, DocumentEntry, OwnerOverview,
};
