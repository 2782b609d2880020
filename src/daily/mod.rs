//! Daily action engine.
//!
//! Turns a goals-and-actions record, an optional business plan, the
//! pipeline, and the day's priority context into one primary action and
//! at most two supporting actions. Check-ins are parsed back into signals
//! that decide whether coaching comes before the next plan.

pub mod plan;
pub mod readiness;
pub mod selection;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Pipeline priority of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Act first.
    High,
    /// Act when highs are covered.
    Medium,
    /// Act last.
    Low,
}

impl Priority {
    /// Sort rank; lower ranks first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a persisted priority, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownVariant`] if the string is unrecognized.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(CoreError::unknown("Priority", s)),
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A pipeline opportunity, read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOpportunity {
    /// Opportunity id from the store.
    pub id: String,
    /// Person to contact.
    pub contact_name: String,
    /// Free-form pipeline stage ("lead", "showing", ...).
    pub stage: String,
    /// Priority set by the user.
    pub priority: Priority,
    /// Last time the user was in touch.
    pub last_contact: DateTime<Utc>,
}

/// Whether an action is the day's primary or a supporting step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// The one thing for today.
    Primary,
    /// A small step that backs the primary.
    Supporting,
}

/// Kind of work an action involves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Talk to a person.
    Contact,
    /// Work that needs no conversation.
    NonContact,
    /// Prepare or decide.
    Planning,
    /// Record keeping.
    Admin,
}

impl ActionCategory {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::NonContact => "non_contact",
            Self::Planning => "planning",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated action. Never persisted or mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAction {
    /// Deterministic id derived from the action's source.
    pub id: String,
    /// Primary or supporting.
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Kind of work.
    pub category: ActionCategory,
    /// Short imperative title.
    pub title: String,
    /// What to do and why.
    pub description: String,
    /// The smallest version that still counts.
    pub minimum_viable: String,
    /// How this ties to the 30-day milestone.
    pub milestone_connection: String,
    /// Rough time needed.
    pub minutes_estimate: u32,
}

/// The day's plan: at most one primary and two supporting actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActionPlan {
    /// Plan date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// The primary action, or none when it was withheld.
    pub primary: Option<DailyAction>,
    /// Up to two supporting actions (one under reduced load).
    pub supporting: Vec<DailyAction>,
    /// Whether the plan was built under reduced load.
    pub reduced_load: bool,
}

/// What kind of priority shapes today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityKind {
    /// Nothing special; the pipeline decides.
    #[default]
    Routine,
    /// A date-bound commitment worth mentioning alongside the primary.
    Deadline,
    /// Something that must be cleared before anything else.
    Blocker,
}

/// The priority context for today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityContext {
    /// Kind of priority.
    #[serde(rename = "type", default)]
    pub kind: PriorityKind,
    /// What the priority is about.
    #[serde(default)]
    pub description: String,
    /// Whether a blocker may replace the pipeline-derived primary.
    #[serde(default)]
    pub may_override_primary: bool,
}

impl PriorityContext {
    /// A routine day with no overriding priority.
    pub fn routine() -> Self {
        Self::default()
    }

    /// A blocker that replaces the primary action.
    pub fn blocker(description: &str) -> Self {
        Self {
            kind: PriorityKind::Blocker,
            description: description.to_owned(),
            may_override_primary: true,
        }
    }
}

/// The user's business plan, as far as the engine uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessPlan {
    /// Current strategic focus ("first-time buyers in Eastside").
    #[serde(default)]
    pub focus: Option<String>,
    /// Lead sources in order of preference.
    #[serde(default)]
    pub lead_sources: Vec<String>,
    /// Target conversations per week.
    #[serde(default)]
    pub weekly_conversation_target: Option<u32>,
}

/// Direction of a check-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    /// Things are moving.
    Positive,
    /// No clear direction.
    #[default]
    Neutral,
    /// Things are stalling.
    Negative,
}

/// A named source of friction reported in a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionIndicator {
    /// Kept putting it off.
    Procrastination,
    /// Attention went elsewhere.
    Distraction,
    /// The task felt heavy.
    EmotionalResistance,
    /// No time.
    TimePressure,
    /// Did not know what to do.
    Uncertainty,
}

impl FrictionIndicator {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Procrastination => "procrastination",
            Self::Distraction => "distraction",
            Self::EmotionalResistance => "emotional_resistance",
            Self::TimePressure => "time_pressure",
            Self::Uncertainty => "uncertainty",
        }
    }
}

/// Structured reading of a free-text check-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInResponse {
    /// Ids of actions the user reported completing.
    pub completed_action_ids: Vec<String>,
    /// The message itself when it reports partial progress.
    pub partial_progress: Option<String>,
    /// Reported momentum.
    pub momentum_signal: Momentum,
    /// Reported friction.
    pub friction_indicators: BTreeSet<FrictionIndicator>,
}
