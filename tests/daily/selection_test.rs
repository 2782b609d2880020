//! Primary and supporting action selection tests.

use chrono::{TimeZone, Utc};

use momentum::calibration::{GaStatus, GoalsAndActions};
use momentum::daily::selection::{
    check_strategy_integrity, select_primary_action, select_supporting_actions,
    BLOCKER_FALLBACK_TITLE,
};
use momentum::daily::{
    ActionCategory, ActionType, BusinessPlan, PipelineOpportunity, Priority, PriorityContext,
    PriorityKind,
};

fn opportunity(id: &str, name: &str, priority: Priority) -> PipelineOpportunity {
    PipelineOpportunity {
        id: id.to_owned(),
        contact_name: name.to_owned(),
        stage: "showing".to_owned(),
        priority,
        last_contact: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("valid timestamp")),
    }
}

fn confirmed(boundaries: &[&str]) -> GoalsAndActions {
    GoalsAndActions {
        monthly_milestone: "Two new listings".to_owned(),
        friction_boundaries: boundaries.iter().map(|b| (*b).to_owned()).collect(),
        status: GaStatus::Confirmed,
        ..GoalsAndActions::default()
    }
}

#[test]
fn highest_priority_wins() {
    let pipeline = vec![
        opportunity("o1", "Ana", Priority::Low),
        opportunity("o2", "Ben", Priority::High),
        opportunity("o3", "Cy", Priority::Medium),
    ];
    let action = select_primary_action(None, &pipeline, &PriorityContext::routine());
    assert_eq!(action.id, "primary-o2");
    assert_eq!(action.title, "Reach out to Ben");
    assert_eq!(action.action_type, ActionType::Primary);
    assert_eq!(action.category, ActionCategory::Contact);
}

#[test]
fn equal_priorities_keep_pipeline_order() {
    let pipeline = vec![
        opportunity("o1", "Ana", Priority::Medium),
        opportunity("o2", "Ben", Priority::High),
        opportunity("o3", "Cy", Priority::High),
    ];
    let action = select_primary_action(None, &pipeline, &PriorityContext::routine());
    assert_eq!(action.id, "primary-o2");
}

#[test]
fn empty_pipeline_falls_back_to_sphere() {
    let action = select_primary_action(None, &[], &PriorityContext::routine());
    assert_eq!(action.id, "primary-sphere");
    assert_eq!(action.title, "Reach out to one person in your sphere");
    assert_eq!(action.category, ActionCategory::Contact);
    assert_eq!(action.milestone_connection, "Keeps your pipeline moving.");
}

#[test]
fn blocker_overrides_pipeline() {
    let pipeline = vec![opportunity("o1", "Ana", Priority::High)];
    let action = select_primary_action(
        None,
        &pipeline,
        &PriorityContext::blocker("Renew your license"),
    );
    assert_eq!(action.id, "primary-blocker");
    assert_eq!(action.title, "Renew your license");
    assert_eq!(action.category, ActionCategory::NonContact);
}

#[test]
fn blank_blocker_still_overrides_pipeline() {
    let pipeline = vec![opportunity("o1", "Ana", Priority::High)];
    for description in ["", "   "] {
        let action =
            select_primary_action(None, &pipeline, &PriorityContext::blocker(description));
        assert_eq!(action.id, "primary-blocker");
        assert_eq!(action.title, BLOCKER_FALLBACK_TITLE);
        assert_eq!(action.category, ActionCategory::NonContact);
    }
}

#[test]
fn blocker_without_override_is_ignored() {
    let pipeline = vec![opportunity("o1", "Ana", Priority::High)];
    let context = PriorityContext {
        may_override_primary: false,
        ..PriorityContext::blocker("Renew your license")
    };
    let action = select_primary_action(None, &pipeline, &context);
    assert_eq!(action.id, "primary-o1");
}

#[test]
fn deadline_is_mentioned_not_substituted() {
    let pipeline = vec![opportunity("o1", "Ana", Priority::High)];
    let context = PriorityContext {
        kind: PriorityKind::Deadline,
        description: "offer due Friday".to_owned(),
        may_override_primary: false,
    };
    let action = select_primary_action(None, &pipeline, &context);
    assert_eq!(action.id, "primary-o1");
    assert!(action.description.ends_with("Deadline in view: offer due Friday."));
}

#[test]
fn milestone_flows_into_connection() {
    let ga = confirmed(&[]);
    let action = select_primary_action(Some(&ga), &[], &PriorityContext::routine());
    assert_eq!(
        action.milestone_connection,
        "Moves you toward your 30-day milestone: Two new listings"
    );
}

#[test]
fn boundary_blocks_matching_action() {
    let ga = confirmed(&["Door knocking", "Cold calling"]);
    let action = select_primary_action(
        Some(&ga),
        &[],
        &PriorityContext::blocker("Cold call prospects"),
    );
    let check = check_strategy_integrity(&action, Some(&ga));
    assert!(!check.valid);
    assert_eq!(
        check.violation.as_deref(),
        Some("action conflicts with friction boundary: cold calling")
    );
}

#[test]
fn unconfirmed_record_never_blocks() {
    let mut ga = confirmed(&["Cold calling"]);
    ga.status = GaStatus::Draft;
    let action = select_primary_action(
        Some(&ga),
        &[],
        &PriorityContext::blocker("Cold call prospects"),
    );
    assert!(check_strategy_integrity(&action, Some(&ga)).valid);
    assert!(check_strategy_integrity(&action, None).valid);
}

#[test]
fn contact_primary_gets_prep_and_log() {
    let primary = select_primary_action(None, &[], &PriorityContext::routine());
    let plan = BusinessPlan {
        focus: Some("first-time buyers".to_owned()),
        ..BusinessPlan::default()
    };
    let supporting = select_supporting_actions(Some(&primary), Some(&plan), false);
    let ids: Vec<&str> = supporting.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["primary-sphere-prep", "primary-sphere-log"]);
    assert!(supporting[0].description.contains("first-time buyers"));
    assert!(supporting
        .iter()
        .all(|a| a.action_type == ActionType::Supporting));
}

#[test]
fn non_contact_primary_gets_next_step_and_touch() {
    let primary = select_primary_action(None, &[], &PriorityContext::blocker("Fix the CRM import"));
    let plan = BusinessPlan {
        lead_sources: vec!["open houses".to_owned(), "referrals".to_owned()],
        ..BusinessPlan::default()
    };
    let supporting = select_supporting_actions(Some(&primary), Some(&plan), false);
    assert_eq!(supporting.len(), 2);
    assert_eq!(supporting[0].category, ActionCategory::Planning);
    assert_eq!(supporting[1].category, ActionCategory::Contact);
    assert!(supporting[1].description.contains("open houses"));
}

#[test]
fn supporting_counts_respect_load() {
    let primary = select_primary_action(None, &[], &PriorityContext::routine());
    assert_eq!(select_supporting_actions(Some(&primary), None, false).len(), 2);
    assert_eq!(select_supporting_actions(Some(&primary), None, true).len(), 1);
    assert!(select_supporting_actions(None, None, false).is_empty());
}
