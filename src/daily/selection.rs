//! Primary and supporting action selection, and the strategy integrity rule.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ActionCategory, ActionType, BusinessPlan, DailyAction, PipelineOpportunity, PriorityContext,
    PriorityKind,
};
use crate::calibration::GoalsAndActions;

/// Supporting actions allowed on a normal day.
pub const MAX_SUPPORTING: usize = 2;
/// Supporting actions allowed under reduced load.
pub const MAX_SUPPORTING_REDUCED: usize = 1;

/// Title of a blocker action whose description was left blank.
pub const BLOCKER_FALLBACK_TITLE: &str = "Clear today's blocker";

/// Filler words ignored when matching a boundary against an action.
const STOPWORDS: &[&str] = &["the", "and", "for", "with", "any", "all", "from", "into"];

/// Result of checking an action against the user's friction boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityCheck {
    /// True when no boundary is crossed.
    pub valid: bool,
    /// Names the first crossed boundary.
    pub violation: Option<String>,
}

impl IntegrityCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            violation: None,
        }
    }
}

/// Check that an action does not cross a declared friction boundary.
///
/// Without a confirmed goals-and-actions record there is nothing to check
/// against and every action is valid. Boundaries are tested in the user's
/// order; the first match decides the violation message.
pub fn check_strategy_integrity(
    action: &DailyAction,
    goals_and_actions: Option<&GoalsAndActions>,
) -> IntegrityCheck {
    let Some(ga) = goals_and_actions.filter(|ga| ga.is_confirmed()) else {
        return IntegrityCheck::ok();
    };
    let haystack = format!("{} {}", action.title, action.description).to_lowercase();
    for boundary in &ga.friction_boundaries {
        if boundary_matches(boundary, &haystack) {
            let name = boundary.trim().to_lowercase();
            debug!(action_id = %action.id, boundary = %name, "action crosses friction boundary");
            return IntegrityCheck {
                valid: false,
                violation: Some(format!("action conflicts with friction boundary: {name}")),
            };
        }
    }
    IntegrityCheck::ok()
}

/// A boundary matches when the text contains it verbatim, or contains the
/// stem of every significant word in it ("Cold calling" matches "cold call").
fn boundary_matches(boundary: &str, haystack: &str) -> bool {
    let boundary = boundary.trim().to_lowercase();
    if boundary.is_empty() {
        return false;
    }
    if haystack.contains(&boundary) {
        return true;
    }
    let stems: Vec<&str> = boundary
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() >= 3 && !STOPWORDS.contains(word))
        .map(stem)
        .collect();
    !stems.is_empty() && stems.iter().all(|s| haystack.contains(s))
}

fn stem(word: &str) -> &str {
    for suffix in ["ing", "ed"] {
        if let Some(root) = word.strip_suffix(suffix) {
            if root.len() >= 3 {
                return root;
            }
        }
    }
    match word.strip_suffix('s') {
        Some(root) if root.len() >= 3 && !root.ends_with('s') => root,
        _ => word,
    }
}

fn milestone_connection(goals_and_actions: Option<&GoalsAndActions>) -> String {
    goals_and_actions
        .map(|ga| ga.monthly_milestone.trim())
        .filter(|milestone| !milestone.is_empty())
        .map_or_else(
            || "Keeps your pipeline moving.".to_owned(),
            |milestone| format!("Moves you toward your 30-day milestone: {milestone}"),
        )
}

/// Choose the day's primary action.
///
/// An overriding blocker always wins; without a description it becomes a
/// generic "clear today's blocker" action. Otherwise the highest-priority
/// opportunity is chosen; the sort is stable, so equal priorities keep
/// their pipeline order. An empty pipeline falls back to reaching out to
/// someone the user already knows.
pub fn select_primary_action(
    goals_and_actions: Option<&GoalsAndActions>,
    pipeline: &[PipelineOpportunity],
    priority_context: &PriorityContext,
) -> DailyAction {
    let connection = milestone_connection(goals_and_actions);
    let blocker = priority_context.description.trim();

    if priority_context.kind == PriorityKind::Blocker && priority_context.may_override_primary {
        let title = if blocker.is_empty() {
            BLOCKER_FALLBACK_TITLE
        } else {
            blocker
        };
        return DailyAction {
            id: "primary-blocker".to_owned(),
            action_type: ActionType::Primary,
            category: ActionCategory::NonContact,
            title: title.to_owned(),
            description: "Clear this first so the rest of the day is free.".to_owned(),
            minimum_viable: "Spend 15 minutes on the first step.".to_owned(),
            milestone_connection: connection,
            minutes_estimate: 30,
        };
    }

    let mut ranked: Vec<&PipelineOpportunity> = pipeline.iter().collect();
    ranked.sort_by_key(|opportunity| opportunity.priority.rank());

    let mut action = match ranked.first() {
        Some(top) => DailyAction {
            id: format!("primary-{}", top.id),
            action_type: ActionType::Primary,
            category: ActionCategory::Contact,
            title: format!("Reach out to {}", top.contact_name),
            description: format!(
                "{} is at the {} stage. Move the conversation one step forward.",
                top.contact_name, top.stage
            ),
            minimum_viable: format!("Send {} a two-line message.", top.contact_name),
            milestone_connection: connection,
            minutes_estimate: 15,
        },
        None => DailyAction {
            id: "primary-sphere".to_owned(),
            action_type: ActionType::Primary,
            category: ActionCategory::Contact,
            title: "Reach out to one person in your sphere".to_owned(),
            description:
                "Pick one past client, friend, or referral partner and start a conversation."
                    .to_owned(),
            minimum_viable: "Send one text to someone you know.".to_owned(),
            milestone_connection: connection,
            minutes_estimate: 10,
        },
    };

    if priority_context.kind == PriorityKind::Deadline && !blocker.is_empty() {
        action.description = format!("{} Deadline in view: {blocker}.", action.description);
    }
    action
}

/// Build the supporting actions for a primary.
///
/// No primary means no supporting actions. Candidates depend on the
/// primary's category and are cut to one under reduced load, two otherwise.
pub fn select_supporting_actions(
    primary: Option<&DailyAction>,
    business_plan: Option<&BusinessPlan>,
    reduced_load: bool,
) -> Vec<DailyAction> {
    let Some(primary) = primary else {
        return Vec::new();
    };

    let mut candidates = match primary.category {
        ActionCategory::Contact => vec![
            prepare_conversation(primary, business_plan),
            log_in_crm(primary),
        ],
        ActionCategory::NonContact | ActionCategory::Admin => vec![
            define_next_step(primary),
            pipeline_touch(primary, business_plan),
        ],
        ActionCategory::Planning => vec![
            block_calendar(primary),
            pipeline_touch(primary, business_plan),
        ],
    };

    let limit = if reduced_load {
        MAX_SUPPORTING_REDUCED
    } else {
        MAX_SUPPORTING
    };
    candidates.truncate(limit);
    candidates
}

fn supporting(
    primary: &DailyAction,
    suffix: &str,
    category: ActionCategory,
    title: &str,
    description: String,
    minimum_viable: &str,
    minutes_estimate: u32,
) -> DailyAction {
    DailyAction {
        id: format!("{}-{suffix}", primary.id),
        action_type: ActionType::Supporting,
        category,
        title: title.to_owned(),
        description,
        minimum_viable: minimum_viable.to_owned(),
        milestone_connection: primary.milestone_connection.clone(),
        minutes_estimate,
    }
}

fn prepare_conversation(
    primary: &DailyAction,
    business_plan: Option<&BusinessPlan>,
) -> DailyAction {
    let mut description = format!(
        "Write down the one outcome you want from \"{}\" and the first line you will say.",
        primary.title
    );
    if let Some(focus) = business_plan.and_then(|plan| plan.focus.as_deref()) {
        description.push_str(&format!(" Tie it to your focus: {focus}."));
    }
    supporting(
        primary,
        "prep",
        ActionCategory::Planning,
        "Prepare for the conversation",
        description,
        "Write one sentence.",
        10,
    )
}

fn log_in_crm(primary: &DailyAction) -> DailyAction {
    supporting(
        primary,
        "log",
        ActionCategory::Admin,
        "Log the conversation in your CRM",
        "Record what was said and the agreed next step.".to_owned(),
        "Add one line of notes.",
        5,
    )
}

fn define_next_step(primary: &DailyAction) -> DailyAction {
    supporting(
        primary,
        "next-step",
        ActionCategory::Planning,
        "Define the next concrete step",
        format!(
            "Write the very next physical step for \"{}\".",
            primary.title
        ),
        "Name the step in five words.",
        10,
    )
}

fn block_calendar(primary: &DailyAction) -> DailyAction {
    supporting(
        primary,
        "block",
        ActionCategory::Admin,
        "Block time on your calendar",
        "Protect a slot tomorrow for your primary action.".to_owned(),
        "Add one calendar entry.",
        5,
    )
}

fn pipeline_touch(primary: &DailyAction, business_plan: Option<&BusinessPlan>) -> DailyAction {
    let description = match business_plan.and_then(|plan| plan.lead_sources.first()) {
        Some(source) => format!("Send a short check-in to one contact from {source}."),
        None => "Send a short check-in to a past client or referral partner.".to_owned(),
    };
    supporting(
        primary,
        "touch",
        ActionCategory::Contact,
        "Send one check-in message",
        description,
        "One message, no follow-up needed today.",
        10,
    )
}
