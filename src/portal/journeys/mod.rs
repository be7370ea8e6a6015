//! Pipeline journeys: the tracked relationship between one clinic and one
//! candidate, and the placement record written when a journey lands.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{plan_stage_change, Journey, JourneyId, JourneyStage, StageChange, StageEffect};
pub use router::journeys_router;
pub use service::{JourneyDetail, JourneyService, NewJourney, StageUpdate};
