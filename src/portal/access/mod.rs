//! Document access control: a pure rule table plus the one relational check
//! it cannot answer alone.

pub mod guard;
pub mod rules;


pub use guard::AccessGuard;
pub use rules::{document_upload_rule, document_view_rule, AccessDecision, DocumentOwner, ViewRule};
