//! Generation context tests.

use momentum::calibration::{CalibrationState, GoalsAndActions, Tone};
use momentum::coaching::context::{
    build_generation_context, fallback_line, render_instructions, ChatMessage, Role,
};
use momentum::coaching::validator::validate_response;
use momentum::coaching::{CoachMode, CoachPolicyState, CoachingMove};
use momentum::daily::BusinessPlan;

#[test]
fn context_carries_core_state() {
    let policy = CoachPolicyState {
        current_mode: CoachMode::Commit,
        current_move: CoachingMove::Ease,
        ..CoachPolicyState::new()
    };
    let calibration = CalibrationState {
        tone: Some(Tone::DirectExecutive),
        goals_and_actions: Some(GoalsAndActions {
            monthly_milestone: "Two listings".to_owned(),
            friction_boundaries: vec!["Cold calling".to_owned()],
            ..GoalsAndActions::default()
        }),
        ..CalibrationState::new()
    };
    let plan = BusinessPlan {
        focus: Some("First-time buyers".to_owned()),
        ..BusinessPlan::default()
    };
    let history = vec![ChatMessage {
        role: Role::User,
        content: "I keep avoiding the calls".to_owned(),
    }];

    let ctx = build_generation_context(&policy, &calibration, Some(&plan), &history, 10);
    assert_eq!(ctx.mode, CoachMode::Commit);
    assert_eq!(ctx.coaching_move, CoachingMove::Ease);
    assert_eq!(ctx.tone, Some(Tone::DirectExecutive));
    assert_eq!(ctx.recent_messages, history);

    let rendered = render_instructions(&ctx);
    assert!(rendered.contains("## Mode: COMMIT"));
    assert!(rendered.contains("## Move: EASE"));
    assert!(rendered.contains("Two listings"));
    assert!(rendered.contains("Never suggest: Cold calling"));
    assert!(rendered.contains("First-time buyers"));
}

#[test]
fn rendering_without_profile_skips_goal_section() {
    let ctx = build_generation_context(
        &CoachPolicyState::new(),
        &CalibrationState::new(),
        None,
        &[],
        5,
    );
    let rendered = render_instructions(&ctx);
    assert!(!rendered.contains("## Goals"));
    assert!(rendered.contains("At most one question per reply."));
}

#[test]
fn fallback_lines_never_violate_policy() {
    for mode in CoachMode::ALL {
        assert!(validate_response(fallback_line(mode), mode).valid, "{mode}");
    }
}
