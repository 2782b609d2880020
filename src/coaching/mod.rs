//! Coaching engine: conversational mode, coaching move, and reply policy.
//!
//! The mode machine cycles CLARIFY -> REFLECT -> (REFRAME) -> COMMIT ->
//! DIRECT -> CLARIFY. Orthogonal to it, a coaching move is picked from the
//! signals in the user's latest message. The validator checks candidate
//! replies against the mode's rules before they reach the user.

pub mod context;
pub mod mode;
pub mod moves;
pub mod validator;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Conversational mode of the assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachMode {
    /// Ask one question to understand the situation.
    #[default]
    Clarify,
    /// Mirror back what was heard.
    Reflect,
    /// Offer a different reading of a self-story.
    Reframe,
    /// Agree on one behavioral commitment.
    Commit,
    /// State the plan; no questions.
    Direct,
}

impl CoachMode {
    /// Every mode, in cycle order.
    pub const ALL: [CoachMode; 5] = [
        Self::Clarify,
        Self::Reflect,
        Self::Reframe,
        Self::Commit,
        Self::Direct,
    ];

    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clarify => "CLARIFY",
            Self::Reflect => "REFLECT",
            Self::Reframe => "REFRAME",
            Self::Commit => "COMMIT",
            Self::Direct => "DIRECT",
        }
    }

    /// Parse a mode name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownVariant`] if the string is unrecognized.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_uppercase().as_str() {
            "CLARIFY" => Ok(Self::Clarify),
            "REFLECT" => Ok(Self::Reflect),
            "REFRAME" => Ok(Self::Reframe),
            "COMMIT" => Ok(Self::Commit),
            "DIRECT" => Ok(Self::Direct),
            _ => Err(CoreError::unknown("CoachMode", s)),
        }
    }

    /// Check if transitioning to `target` is a legal edge.
    pub fn can_transition_to(&self, target: CoachMode) -> bool {
        matches!(
            (self, target),
            (Self::Clarify, CoachMode::Reflect)
                | (Self::Reflect, CoachMode::Reframe)
                | (Self::Reflect, CoachMode::Commit)
                | (Self::Reframe, CoachMode::Commit)
                | (Self::Commit, CoachMode::Direct)
                | (Self::Direct, CoachMode::Clarify)
        )
    }

    /// Whether replies in this mode may contain a question at all.
    pub fn allows_questions(&self) -> bool {
        !matches!(self, Self::Direct | Self::Reframe)
    }
}

impl fmt::Display for CoachMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoachMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Short-lived behavioral intervention layered on top of the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachingMove {
    /// Narrow attention to one thing.
    Focus,
    /// Hand control back to the user.
    Agency,
    /// Challenge a fixed self-story.
    Identity,
    /// Make the next step smaller.
    Ease,
    /// No intervention.
    #[default]
    None,
}

impl CoachingMove {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "FOCUS",
            Self::Agency => "AGENCY",
            Self::Identity => "IDENTITY",
            Self::Ease => "EASE",
            Self::None => "NONE",
        }
    }

    /// Parse a move name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownVariant`] if the string is unrecognized.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_uppercase().as_str() {
            "FOCUS" => Ok(Self::Focus),
            "AGENCY" => Ok(Self::Agency),
            "IDENTITY" => Ok(Self::Identity),
            "EASE" => Ok(Self::Ease),
            "NONE" => Ok(Self::None),
            _ => Err(CoreError::unknown("CoachingMove", s)),
        }
    }
}

impl fmt::Display for CoachingMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's explicit answer to the missed-day prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissedDayChoice {
    /// Talk through what got in the way.
    Unpack,
    /// Drop it and start fresh.
    Skip,
}

impl MissedDayChoice {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpack => "UNPACK",
            Self::Skip => "SKIP",
        }
    }

    /// Parse a persisted choice.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownVariant`] if the string is unrecognized.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_uppercase().as_str() {
            "UNPACK" => Ok(Self::Unpack),
            "SKIP" => Ok(Self::Skip),
            _ => Err(CoreError::unknown("MissedDayChoice", s)),
        }
    }
}

/// A recorded breach of reply policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyViolation {
    /// Mode the offending reply was generated in.
    pub mode: CoachMode,
    /// Violation description as produced by the validator.
    pub reason: String,
    /// When the violation was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Conversational state owned by the coaching engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachPolicyState {
    /// Current mode.
    pub current_mode: CoachMode,
    /// Current coaching move.
    pub current_move: CoachingMove,
    /// Questions asked by the assistant in its last reply.
    pub questions_in_last_turn: u32,
    /// Whether the user accepted the assistant's reflection.
    pub reflection_confirmed: bool,
    /// A missed day was reported and awaits an UNPACK/SKIP choice.
    pub missed_day_pending: bool,
    /// The user's last missed-day choice.
    pub missed_day_choice: Option<MissedDayChoice>,
    /// The single outstanding behavioral commitment.
    pub commitment: Option<String>,
    /// Whether the user affirmed the commitment.
    pub commitment_agreed: bool,
    /// Whether the user reported doing it.
    pub commitment_completed: bool,
    /// Reply policy violations recorded so far.
    pub violations: Vec<PolicyViolation>,
}

impl CoachPolicyState {
    /// A fresh state in CLARIFY with no move.
    pub fn new() -> Self {
        Self::default()
    }
}
