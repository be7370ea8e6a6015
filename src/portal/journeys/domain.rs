use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::portal::directory::domain::{CandidateId, ClinicId, UserId};

/// Identifier wrapper for pipeline journeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JourneyId(pub Uuid);

impl JourneyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JourneyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pipeline stage of a journey. Movement between stages is deliberately
/// unrestricted: a journey may revisit any stage, including leaving or
/// re-entering `Placed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JourneyStage {
    FirstInterview,
    TrialDay,
    FinalOffer,
    Placed,
    Rejected,
    Withdrawn,
}

impl JourneyStage {
    pub const ALL: [JourneyStage; 6] = [
        JourneyStage::FirstInterview,
        JourneyStage::TrialDay,
        JourneyStage::FinalOffer,
        JourneyStage::Placed,
        JourneyStage::Rejected,
        JourneyStage::Withdrawn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            JourneyStage::FirstInterview => "FIRST_INTERVIEW",
            JourneyStage::TrialDay => "TRIAL_DAY",
            JourneyStage::FinalOffer => "FINAL_OFFER",
            JourneyStage::Placed => "PLACED",
            JourneyStage::Rejected => "REJECTED",
            JourneyStage::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.label() == raw)
    }
}

impl fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The tracked relationship between one clinic and one candidate. Several
/// journeys may exist for the same pair; each progresses independently.
/// Journeys are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub id: JourneyId,
    pub clinic: ClinicId,
    pub candidate: CandidateId,
    pub stage: JourneyStage,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Durable side effect a stage move asks the caller to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEffect {
    RecordPlacement,
}

/// A planned stage move: where the journey was, where it goes, and what has
/// to be written beyond the journey itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub from: Option<JourneyStage>,
    pub to: JourneyStage,
    pub effect: Option<StageEffect>,
}

/// Decide what a stage move entails. Every move is permitted; entering
/// `Placed` carries the placement effect, even when the journey is already
/// there. Leaving `Placed` carries nothing: an earlier placement record
/// stays behind on the candidate.
pub fn plan_stage_change(from: Option<JourneyStage>, to: JourneyStage) -> StageChange {
    let effect = match to {
        JourneyStage::Placed => Some(StageEffect::RecordPlacement),
        _ => None,
    };
    StageChange { from, to, effect }
}

/// Parse a scheduling timestamp from the portal's form surface. Accepts
/// RFC 3339 and the bare `YYYY-MM-DDTHH:MM` a datetime-local field submits;
/// anything else means "no schedule", matching the form's empty-field
/// behavior.
pub fn parse_schedule(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}
