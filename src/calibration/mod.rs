//! Calibration: onboarding a user from "no profile" to "actions unlocked".
//!
//! The lifecycle is a strict forward path with a single edit loop:
//!
//! ```text
//! UNINITIALIZED -> CALIBRATING -> G&A_DRAFTED -> G&A_CONFIRMED -> ACTIONS_ACTIVE
//!                       ^               |
//!                       +---- edit -----+
//! ```
//!
//! [`machine`] owns every transition; [`questions`] owns the fixed question
//! sets. The types here are plain data exchanged with the persistence
//! collaborator.

pub mod machine;
pub mod questions;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Calibration lifecycle stage of a single user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserState {
    /// No profile yet.
    #[default]
    #[serde(rename = "UNINITIALIZED")]
    Uninitialized,
    /// Tone and profiling questions are being gathered.
    #[serde(rename = "CALIBRATING")]
    Calibrating,
    /// A goals-and-actions draft awaits confirmation.
    #[serde(rename = "G&A_DRAFTED")]
    GaDrafted,
    /// The user confirmed the draft.
    #[serde(rename = "G&A_CONFIRMED")]
    GaConfirmed,
    /// Daily actions are unlocked.
    #[serde(rename = "ACTIONS_ACTIVE")]
    ActionsActive,
}

impl UserState {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Calibrating => "CALIBRATING",
            Self::GaDrafted => "G&A_DRAFTED",
            Self::GaConfirmed => "G&A_CONFIRMED",
            Self::ActionsActive => "ACTIONS_ACTIVE",
        }
    }

    /// Parse a persisted string into a user state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownVariant`] if the string is unrecognized.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "UNINITIALIZED" => Ok(Self::Uninitialized),
            "CALIBRATING" => Ok(Self::Calibrating),
            "G&A_DRAFTED" => Ok(Self::GaDrafted),
            "G&A_CONFIRMED" => Ok(Self::GaConfirmed),
            "ACTIONS_ACTIVE" => Ok(Self::ActionsActive),
            other => Err(CoreError::unknown("UserState", other)),
        }
    }

    /// Check if transitioning to `target` is a legal edge.
    pub fn can_transition_to(&self, target: UserState) -> bool {
        matches!(
            (self, target),
            (Self::Uninitialized, UserState::Calibrating)
                | (Self::Calibrating, UserState::GaDrafted)
                | (Self::GaDrafted, UserState::GaConfirmed)
                | (Self::GaDrafted, UserState::Calibrating)
                | (Self::GaConfirmed, UserState::ActionsActive)
        )
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Communication tone the user asked the assistant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tone {
    /// Blunt, outcome-first.
    DirectExecutive,
    /// Warm but brief.
    CoachConcise,
    /// Plain and minimal.
    NeutralMinimal,
}

impl Tone {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectExecutive => "DIRECT_EXECUTIVE",
            Self::CoachConcise => "COACH_CONCISE",
            Self::NeutralMinimal => "NEUTRAL_MINIMAL",
        }
    }

    /// Parse a persisted string into a tone.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownVariant`] if the string is unrecognized.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "DIRECT_EXECUTIVE" => Ok(Self::DirectExecutive),
            "COACH_CONCISE" => Ok(Self::CoachConcise),
            "NEUTRAL_MINIMAL" => Ok(Self::NeutralMinimal),
            other => Err(CoreError::unknown("Tone", other)),
        }
    }
}

impl FromStr for Tone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How the user prefers to execute their work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStyle {
    /// Planned blocks on a calendar.
    Structured,
    /// Whatever fits the day.
    #[default]
    Flexible,
    /// Short intense bursts.
    ShortBursts,
    /// Small amounts every day.
    SlowConsistent,
}

impl ExecutionStyle {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "STRUCTURED",
            Self::Flexible => "FLEXIBLE",
            Self::ShortBursts => "SHORT_BURSTS",
            Self::SlowConsistent => "SLOW_CONSISTENT",
        }
    }
}

/// Lifecycle status of a goals-and-actions record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GaStatus {
    /// Drafted from calibration answers, not yet confirmed.
    #[default]
    Draft,
    /// Explicitly confirmed by the user.
    Confirmed,
}

/// The goals-and-actions record that gates daily action generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsAndActions {
    /// Annual professional goal.
    pub annual_professional_goal: String,
    /// Annual personal goal.
    pub annual_personal_goal: String,
    /// Where the business honestly stands today.
    pub current_reality: String,
    /// What should be true 30 days from now.
    pub monthly_milestone: String,
    /// Preferred way of working.
    pub execution_style: ExecutionStyle,
    /// Activities the user is willing to do, in the order given.
    pub willingness_filter: Vec<String>,
    /// Activities the user has opted out of, in the order given.
    pub friction_boundaries: Vec<String>,
    /// Draft or confirmed.
    pub status: GaStatus,
    /// When the user confirmed the record.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl GoalsAndActions {
    /// Whether the record has been confirmed by the user.
    pub fn is_confirmed(&self) -> bool {
        self.status == GaStatus::Confirmed
    }
}

/// Calibration progress of a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Lifecycle stage.
    pub user_state: UserState,
    /// Chosen communication tone, if any.
    pub tone: Option<Tone>,
    /// Pointer into the active question set.
    pub current_question_index: usize,
    /// Answers keyed by question id.
    pub answers: BTreeMap<String, String>,
    /// Whether the shortened question set is active.
    pub fast_lane_triggered: bool,
    /// Draft or confirmed goals-and-actions record.
    pub goals_and_actions: Option<GoalsAndActions>,
    /// When calibration started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the question phase finished and a draft was produced.
    pub completed_at: Option<DateTime<Utc>>,
}

impl CalibrationState {
    /// A fresh, uninitialized state.
    pub fn new() -> Self {
        Self::default()
    }
}
