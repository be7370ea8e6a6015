//! Portal domain: who may see which stored document, and how a candidate
//! moves through the recruitment pipeline.
//!
//! Each feature follows the same layout: a `domain` of plain types and pure
//! decision logic, a `service` applying that logic against the injected
//! collaborators, and a `router` exposing the HTTP surface. The collaborator
//! contracts (`Store`, `SessionStore`, `FileStore`) live in [`store`].

pub mod access;
pub mod dashboards;
pub mod directory;
pub mod documents;
pub mod error;
pub mod identity;
pub mod journeys;
pub mod state;
pub mod store;

pub use error::PortalError;
pub use state::{portal_router, PortalState};
