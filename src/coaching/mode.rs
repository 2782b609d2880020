//! Mode machine, missed-day protocol, and commitment tracking.
//!
//! [`transition_mode`] enforces the table; [`infer_next_mode`] only
//! advises. Callers may follow the suggestion or override it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::validator::ValidationResult;
use super::{CoachMode, CoachPolicyState, MissedDayChoice, PolicyViolation};
use crate::signals;

/// Minimum size for a CLARIFY answer to count as substantive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstanceThreshold {
    /// Minimum whitespace-separated words.
    pub min_words: usize,
    /// Minimum trimmed characters.
    pub min_chars: usize,
}

impl Default for SubstanceThreshold {
    fn default() -> Self {
        Self {
            min_words: 4,
            min_chars: 20,
        }
    }
}

/// Move to `target` if the edge exists; otherwise return the state unchanged.
///
/// An accepted transition resets `questions_in_last_turn`.
pub fn transition_mode(state: &CoachPolicyState, target: CoachMode) -> CoachPolicyState {
    let mut next = state.clone();
    if !state.current_mode.can_transition_to(target) {
        debug!(from = %state.current_mode, to = %target, "rejected mode transition");
        return next;
    }
    info!(from = %state.current_mode, to = %target, "coaching mode changed");
    next.current_mode = target;
    next.questions_in_last_turn = 0;
    next
}

/// Suggest the next mode for a user message using the default threshold.
pub fn infer_next_mode(state: &CoachPolicyState, message: &str, user_confirmed: bool) -> CoachMode {
    infer_next_mode_with(state, message, user_confirmed, &SubstanceThreshold::default())
}

/// Suggest the next mode for a user message.
///
/// While a missed-day choice is pending the current mode is held.
pub fn infer_next_mode_with(
    state: &CoachPolicyState,
    message: &str,
    user_confirmed: bool,
    threshold: &SubstanceThreshold,
) -> CoachMode {
    let current = state.current_mode;
    if state.missed_day_pending {
        return current;
    }
    match current {
        CoachMode::Clarify => {
            if is_substantive(message, threshold) {
                CoachMode::Reflect
            } else {
                current
            }
        }
        CoachMode::Reflect => {
            if user_confirmed {
                CoachMode::Commit
            } else if state.reflection_confirmed && signals::detect_signals(message).self_story {
                CoachMode::Reframe
            } else {
                current
            }
        }
        // Single-turn mode.
        CoachMode::Reframe => CoachMode::Commit,
        CoachMode::Commit => {
            if signals::is_affirmation(message) || has_commitment_agreement(state) {
                CoachMode::Direct
            } else {
                current
            }
        }
        CoachMode::Direct => {
            if signals::is_question(message) {
                CoachMode::Clarify
            } else {
                current
            }
        }
    }
}

/// Whether a message carries enough content to reflect back.
pub fn is_substantive(message: &str, threshold: &SubstanceThreshold) -> bool {
    let trimmed = message.trim();
    trimmed.split_whitespace().count() >= threshold.min_words
        && trimmed.chars().count() >= threshold.min_chars
}

/// Inspect a user message for a missed-day report.
///
/// A report raises the pending flag and clears any earlier choice; other
/// messages leave the state untouched.
pub fn record_message(state: &CoachPolicyState, text: &str) -> CoachPolicyState {
    let mut next = state.clone();
    if signals::detect_missed_day(text) {
        info!("missed day reported, awaiting unpack/skip choice");
        next.missed_day_pending = true;
        next.missed_day_choice = None;
    }
    next
}

/// Record the user's missed-day choice and clear the pending flag.
pub fn set_missed_day_choice(
    state: &CoachPolicyState,
    choice: MissedDayChoice,
) -> CoachPolicyState {
    let mut next = state.clone();
    next.missed_day_pending = false;
    next.missed_day_choice = Some(choice);
    next
}

/// Interpret a free-text answer to the missed-day prompt.
pub fn parse_missed_day_choice(text: &str) -> Option<MissedDayChoice> {
    let lower = text.trim().to_lowercase();
    const UNPACK: &[&str] = &["unpack", "talk", "dig in", "look at it", "what happened"];
    const SKIP: &[&str] = &["skip", "move on", "fresh start", "start fresh", "forget it"];
    if let Ok(choice) = MissedDayChoice::parse(&lower) {
        return Some(choice);
    }
    if UNPACK.iter().any(|k| lower.contains(k)) {
        Some(MissedDayChoice::Unpack)
    } else if SKIP.iter().any(|k| lower.contains(k)) {
        Some(MissedDayChoice::Skip)
    } else {
        None
    }
}

/// Record the outstanding commitment. Replaces any earlier one.
pub fn set_commitment(state: &CoachPolicyState, commitment: &str) -> CoachPolicyState {
    let mut next = state.clone();
    let commitment = commitment.trim();
    if commitment.is_empty() {
        debug!("ignored empty commitment");
        return next;
    }
    next.commitment = Some(commitment.to_owned());
    next.commitment_agreed = false;
    next.commitment_completed = false;
    next
}

/// Record that the user affirmed the outstanding commitment.
pub fn agree_to_commitment(state: &CoachPolicyState) -> CoachPolicyState {
    let mut next = state.clone();
    if state.commitment.is_some() {
        next.commitment_agreed = true;
    }
    next
}

/// Whether a commitment exists and the user has affirmed it.
pub fn has_commitment_agreement(state: &CoachPolicyState) -> bool {
    state.commitment.is_some() && state.commitment_agreed
}

/// Record that the user reported doing what they committed to.
pub fn mark_commitment_completed(state: &CoachPolicyState) -> CoachPolicyState {
    let mut next = state.clone();
    if state.commitment.is_some() {
        next.commitment_completed = true;
    }
    next
}

/// Record that the user accepted the assistant's reflection.
pub fn confirm_reflection(state: &CoachPolicyState) -> CoachPolicyState {
    let mut next = state.clone();
    next.reflection_confirmed = true;
    next
}

/// Record how many questions the assistant's last reply contained.
pub fn record_turn_questions(state: &CoachPolicyState, count: u32) -> CoachPolicyState {
    let mut next = state.clone();
    next.questions_in_last_turn = count;
    next
}

/// Append one violation entry per validator finding.
pub fn record_violations(
    state: &CoachPolicyState,
    mode: CoachMode,
    result: &ValidationResult,
    now: DateTime<Utc>,
) -> CoachPolicyState {
    let mut next = state.clone();
    next.violations
        .extend(result.violations.iter().map(|reason| PolicyViolation {
            mode,
            reason: reason.clone(),
            recorded_at: now,
        }));
    next
}
