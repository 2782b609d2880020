//! Calibration lifecycle and transition table tests.

use chrono::{TimeZone, Utc};

use momentum::calibration::machine::{
    activate, confirm, edit, generate_draft, is_calibration_complete, progress, record_answer,
    set_tone, skip_question, start, transition_user_state,
};
use momentum::calibration::questions::FULL_QUESTIONS;
use momentum::calibration::{CalibrationState, GaStatus, Tone, UserState};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("valid timestamp"))
}

fn answered_all() -> CalibrationState {
    let mut state = set_tone(&start(&CalibrationState::new(), now()), Tone::DirectExecutive);
    for question in FULL_QUESTIONS {
        state = record_answer(&state, question.id, "answer");
    }
    state
}

const ALL_STATES: [UserState; 5] = [
    UserState::Uninitialized,
    UserState::Calibrating,
    UserState::GaDrafted,
    UserState::GaConfirmed,
    UserState::ActionsActive,
];

#[test]
fn end_to_end_sequence() {
    let fresh = CalibrationState::new();
    assert_eq!(fresh.user_state, UserState::Uninitialized);

    let started = start(&fresh, now());
    assert_eq!(started.user_state, UserState::Calibrating);
    assert_eq!(started.started_at, Some(now()));

    let toned = set_tone(&started, Tone::DirectExecutive);
    assert_eq!(toned.tone, Some(Tone::DirectExecutive));
    assert_eq!(toned.user_state, UserState::Calibrating);

    let mut answered = toned;
    for (i, question) in FULL_QUESTIONS.iter().enumerate() {
        assert_eq!(answered.user_state, UserState::Calibrating);
        assert_eq!(answered.current_question_index, i);
        answered = record_answer(&answered, question.id, "something");
    }
    assert!(is_calibration_complete(&answered));

    let drafted = generate_draft(&answered, now());
    assert_eq!(drafted.user_state, UserState::GaDrafted);
    assert_eq!(
        drafted.goals_and_actions.as_ref().map(|ga| ga.status),
        Some(GaStatus::Draft)
    );

    let confirmed = confirm(&drafted, now());
    assert_eq!(confirmed.user_state, UserState::GaConfirmed);
    let ga = confirmed
        .goals_and_actions
        .as_ref()
        .unwrap_or_else(|| panic!("confirmed state keeps its record"));
    assert_eq!(ga.status, GaStatus::Confirmed);
    assert_eq!(ga.confirmed_at, Some(now()));

    let active = activate(&confirmed);
    assert_eq!(active.user_state, UserState::ActionsActive);
}

#[test]
fn only_table_edges_are_accepted() {
    for from in ALL_STATES {
        for to in ALL_STATES {
            let state = CalibrationState {
                user_state: from,
                ..CalibrationState::new()
            };
            let next = transition_user_state(&state, to);
            if from.can_transition_to(to) {
                assert_eq!(next.user_state, to, "{from} -> {to}");
            } else {
                assert_eq!(next, state, "{from} -> {to} must be rejected");
            }
        }
    }
}

#[test]
fn exactly_five_legal_edges() {
    let legal = ALL_STATES
        .iter()
        .flat_map(|from| ALL_STATES.iter().map(move |to| (*from, *to)))
        .filter(|(from, to)| from.can_transition_to(*to))
        .count();
    assert_eq!(legal, 5);
}

#[test]
fn start_is_noop_once_started() {
    let started = start(&CalibrationState::new(), now());
    let answered = record_answer(&started, "annual_professional_goal", "40 deals");
    assert_eq!(start(&answered, now()), answered);
}

#[test]
fn set_tone_rejected_outside_calibrating() {
    let fresh = CalibrationState::new();
    assert_eq!(set_tone(&fresh, Tone::CoachConcise), fresh);
}

#[test]
fn record_answer_rejected_outside_calibrating() {
    let fresh = CalibrationState::new();
    assert_eq!(record_answer(&fresh, "annual_professional_goal", "x"), fresh);
}

#[test]
fn record_answer_increments_by_exactly_one() {
    let mut state = start(&CalibrationState::new(), now());
    for expected in 1..=FULL_QUESTIONS.len() {
        state = record_answer(&state, "any_id", "text");
        assert_eq!(state.current_question_index, expected);
    }
}

#[test]
fn pointer_never_exceeds_question_count() {
    let complete = answered_all();
    let again = record_answer(&complete, "extra", "text");
    assert_eq!(again, complete);
    assert_eq!(skip_question(&complete), complete);
    assert_eq!(complete.current_question_index, FULL_QUESTIONS.len());
}

#[test]
fn skip_advances_without_answer() {
    let started = start(&CalibrationState::new(), now());
    let skipped = skip_question(&started);
    assert_eq!(skipped.current_question_index, 1);
    assert!(skipped.answers.is_empty());
}

#[test]
fn draft_requires_complete_questions() {
    let started = start(&CalibrationState::new(), now());
    let partial = record_answer(&started, "annual_professional_goal", "x");
    assert_eq!(generate_draft(&partial, now()), partial);
}

#[test]
fn confirm_and_activate_reject_wrong_stage() {
    let complete = answered_all();
    assert_eq!(confirm(&complete, now()), complete);
    assert_eq!(activate(&complete), complete);

    let drafted = generate_draft(&complete, now());
    assert_eq!(activate(&drafted), drafted);
}

#[test]
fn edit_loop_returns_to_calibrating() {
    let drafted = generate_draft(&answered_all(), now());
    let editing = edit(&drafted);
    assert_eq!(editing.user_state, UserState::Calibrating);
    assert_eq!(
        editing.goals_and_actions.as_ref().map(|ga| ga.status),
        Some(GaStatus::Draft)
    );

    let redrafted = generate_draft(&editing, now());
    assert_eq!(redrafted.user_state, UserState::GaDrafted);
}

#[test]
fn edit_rejected_after_confirmation() {
    let confirmed = confirm(&generate_draft(&answered_all(), now()), now());
    assert_eq!(edit(&confirmed), confirmed);
}

#[test]
fn progress_tracks_answers() {
    let started = start(&CalibrationState::new(), now());
    assert_eq!(progress(&started), 0);
    assert_eq!(progress(&answered_all()), 100);
    let one = record_answer(&started, "a", "b");
    assert_eq!(progress(&one), 14);
}

#[test]
fn user_state_round_trips_through_strings() {
    for state in ALL_STATES {
        assert_eq!(UserState::parse(state.as_str()), Ok(state));
    }
    assert!(UserState::parse("DONE").is_err());
}

#[test]
fn user_state_serializes_with_ampersand_names() {
    let json = serde_json::to_string(&UserState::GaDrafted)
        .unwrap_or_else(|e| panic!("serialize: {e}"));
    assert_eq!(json, "\"G&A_DRAFTED\"");
}
