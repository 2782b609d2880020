//! Calibration state machine.
//!
//! Every operation takes the caller's snapshot and returns a new one. Calls
//! that are illegal for the current stage are rejected silently: the
//! returned snapshot equals the input. Calibration is user-paced and must
//! never crash a conversation.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::questions::{
    active_questions, ANNUAL_PERSONAL_GOAL, ANNUAL_PROFESSIONAL_GOAL, CURRENT_REALITY,
    EXECUTION_STYLE, FAST_LANE_QUESTIONS, FRICTION_BOUNDARIES, MONTHLY_MILESTONE,
    WILLINGNESS_FILTER,
};
use super::{CalibrationState, ExecutionStyle, GaStatus, GoalsAndActions, Tone, UserState};

/// Move the lifecycle along one edge of the transition table.
///
/// Only the stage changes; the operations below layer their own field
/// updates on top. Illegal edges return the snapshot unchanged.
pub fn transition_user_state(state: &CalibrationState, target: UserState) -> CalibrationState {
    let mut next = state.clone();
    if state.user_state.can_transition_to(target) {
        info!(from = %state.user_state, to = %target, "calibration stage changed");
        next.user_state = target;
    } else {
        debug!(from = %state.user_state, to = %target, "rejected calibration transition");
    }
    next
}

fn require_stage(state: &CalibrationState, stage: UserState, op: &'static str) -> bool {
    if state.user_state == stage {
        return true;
    }
    debug!(op, stage = %state.user_state, "calibration operation not allowed in this stage");
    false
}

/// Begin calibration. No-op unless the user is uninitialized.
pub fn start(state: &CalibrationState, now: DateTime<Utc>) -> CalibrationState {
    if !require_stage(state, UserState::Uninitialized, "start") {
        return state.clone();
    }
    let mut next = transition_user_state(state, UserState::Calibrating);
    next.current_question_index = 0;
    next.started_at = Some(now);
    next
}

/// Record the user's tone preference. Allowed only while calibrating.
pub fn set_tone(state: &CalibrationState, tone: Tone) -> CalibrationState {
    let mut next = state.clone();
    if require_stage(state, UserState::Calibrating, "set_tone") {
        next.tone = Some(tone);
    }
    next
}

/// Switch to the two-question fast lane.
///
/// Recorded answers are kept and the pointer is not rewound; a pointer
/// already past the shorter set is clamped to its end, which completes
/// the question phase.
pub fn trigger_fast_lane(state: &CalibrationState) -> CalibrationState {
    let mut next = state.clone();
    if !require_stage(state, UserState::Calibrating, "trigger_fast_lane")
        || state.fast_lane_triggered
    {
        return next;
    }
    next.fast_lane_triggered = true;
    next.current_question_index = state.current_question_index.min(FAST_LANE_QUESTIONS.len());
    info!(
        question_index = next.current_question_index,
        "fast lane triggered"
    );
    next
}

/// Store an answer and advance the pointer by exactly one.
///
/// Rejected outside `CALIBRATING` or once the active question set is
/// exhausted.
pub fn record_answer(state: &CalibrationState, question_id: &str, text: &str) -> CalibrationState {
    let mut next = state.clone();
    if !can_advance(state, "record_answer") {
        return next;
    }
    next.answers.insert(question_id.to_owned(), text.trim().to_owned());
    next.current_question_index = state.current_question_index.saturating_add(1);
    next
}

/// Advance the pointer by exactly one without storing an answer.
pub fn skip_question(state: &CalibrationState) -> CalibrationState {
    let mut next = state.clone();
    if can_advance(state, "skip_question") {
        next.current_question_index = state.current_question_index.saturating_add(1);
    }
    next
}

/// Overwrite an answer without moving the pointer (the edit loop).
pub fn revise_answer(state: &CalibrationState, question_id: &str, text: &str) -> CalibrationState {
    let mut next = state.clone();
    if require_stage(state, UserState::Calibrating, "revise_answer") {
        next.answers.insert(question_id.to_owned(), text.trim().to_owned());
    }
    next
}

fn can_advance(state: &CalibrationState, op: &'static str) -> bool {
    if !require_stage(state, UserState::Calibrating, op) {
        return false;
    }
    if is_calibration_complete(state) {
        debug!(op, "question set already complete");
        return false;
    }
    true
}

/// True once the pointer has reached the end of the active question set.
pub fn is_calibration_complete(state: &CalibrationState) -> bool {
    state.current_question_index >= active_questions(state).len()
}

/// Percentage of the active question set answered, capped at 100.
pub fn progress(state: &CalibrationState) -> u8 {
    let total = active_questions(state).len();
    let percent = state
        .current_question_index
        .saturating_mul(100)
        .checked_div(total)
        .unwrap_or(100)
        .min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// Build the goals-and-actions draft from the recorded answers.
///
/// Requires `CALIBRATING` with a complete question set. Unanswered fields
/// (e.g. after the fast lane) become empty text.
pub fn generate_draft(state: &CalibrationState, now: DateTime<Utc>) -> CalibrationState {
    if !require_stage(state, UserState::Calibrating, "generate_draft") {
        return state.clone();
    }
    if !is_calibration_complete(state) {
        debug!(
            question_index = state.current_question_index,
            "draft requested before questions were complete"
        );
        return state.clone();
    }

    let answer = |id: &str| state.answers.get(id).cloned().unwrap_or_default();
    let draft = GoalsAndActions {
        annual_professional_goal: answer(ANNUAL_PROFESSIONAL_GOAL),
        annual_personal_goal: answer(ANNUAL_PERSONAL_GOAL),
        current_reality: answer(CURRENT_REALITY),
        monthly_milestone: answer(MONTHLY_MILESTONE),
        execution_style: classify_execution_style(&answer(EXECUTION_STYLE)),
        willingness_filter: split_list(&answer(WILLINGNESS_FILTER)),
        friction_boundaries: split_list(&answer(FRICTION_BOUNDARIES)),
        status: GaStatus::Draft,
        confirmed_at: None,
    };

    let mut next = transition_user_state(state, UserState::GaDrafted);
    next.goals_and_actions = Some(draft);
    next.completed_at = Some(now);
    next
}

/// Confirm the draft: `G&A_DRAFTED -> G&A_CONFIRMED`.
pub fn confirm(state: &CalibrationState, now: DateTime<Utc>) -> CalibrationState {
    if !require_stage(state, UserState::GaDrafted, "confirm") {
        return state.clone();
    }
    let Some(draft) = state.goals_and_actions.as_ref() else {
        debug!("confirm requested without a draft");
        return state.clone();
    };
    let confirmed = GoalsAndActions {
        status: GaStatus::Confirmed,
        confirmed_at: Some(now),
        ..draft.clone()
    };
    let mut next = transition_user_state(state, UserState::GaConfirmed);
    next.goals_and_actions = Some(confirmed);
    next
}

/// Unlock daily actions: `G&A_CONFIRMED -> ACTIONS_ACTIVE`.
pub fn activate(state: &CalibrationState) -> CalibrationState {
    transition_user_state(state, UserState::ActionsActive)
}

/// Reopen calibration from a draft: `G&A_DRAFTED -> CALIBRATING`.
///
/// Answers and pointer are kept so individual answers can be revised and
/// the draft regenerated.
pub fn edit(state: &CalibrationState) -> CalibrationState {
    if !require_stage(state, UserState::GaDrafted, "edit") {
        return state.clone();
    }
    let mut next = transition_user_state(state, UserState::Calibrating);
    if let Some(draft) = next.goals_and_actions.as_mut() {
        draft.status = GaStatus::Draft;
        draft.confirmed_at = None;
    }
    next
}

/// Classify free text into an execution style.
///
/// Keyword groups are tested in a fixed order and the first match wins:
/// structured, short bursts, slow/consistent, then the flexible default.
pub fn classify_execution_style(text: &str) -> ExecutionStyle {
    let lower = text.to_lowercase();
    if lower.contains("structured") || lower.contains("planned") {
        ExecutionStyle::Structured
    } else if lower.contains("short burst") {
        ExecutionStyle::ShortBursts
    } else if lower.contains("slow") || lower.contains("consistent") {
        ExecutionStyle::SlowConsistent
    } else {
        ExecutionStyle::Flexible
    }
}

/// Split a comma-separated answer into trimmed entries, dropping blanks and
/// case-insensitive duplicates while keeping the user's order.
pub fn split_list(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .map(str::to_owned)
        .collect()
}
