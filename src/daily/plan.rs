//! Daily plan composition and DIRECT-mode rendering.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::selection::{check_strategy_integrity, select_primary_action, select_supporting_actions};
use super::{BusinessPlan, DailyAction, DailyActionPlan, PipelineOpportunity, PriorityContext};
use crate::calibration::GoalsAndActions;
use crate::coaching::validator::{clean_response_text, ResponseValidator};

/// Compose the day's plan.
///
/// A primary that crosses a friction boundary is withheld rather than
/// shown, which also leaves the plan without supporting actions. Supporting
/// actions that cross a boundary are dropped individually.
pub fn generate_daily_plan(
    date: NaiveDate,
    goals_and_actions: Option<&GoalsAndActions>,
    business_plan: Option<&BusinessPlan>,
    pipeline: &[PipelineOpportunity],
    priority_context: &PriorityContext,
    reduced_load: bool,
) -> DailyActionPlan {
    let candidate = select_primary_action(goals_and_actions, pipeline, priority_context);
    let integrity = check_strategy_integrity(&candidate, goals_and_actions);
    let primary = if integrity.valid {
        Some(candidate)
    } else {
        debug!(
            action_id = %candidate.id,
            violation = integrity.violation.as_deref().unwrap_or_default(),
            "primary action withheld"
        );
        None
    };

    let supporting: Vec<DailyAction> =
        select_supporting_actions(primary.as_ref(), business_plan, reduced_load)
            .into_iter()
            .filter(|action| check_strategy_integrity(action, goals_and_actions).valid)
            .collect();

    info!(
        %date,
        has_primary = primary.is_some(),
        supporting = supporting.len(),
        reduced_load,
        "daily plan generated"
    );

    DailyActionPlan {
        date,
        primary,
        supporting,
        reduced_load,
    }
}

/// Render a plan as directive prose.
///
/// The output never contains a question mark, banned word, or urgency
/// phrase, so it passes reply validation in DIRECT mode unchanged even
/// when titles and milestones carry the user's own wording.
pub fn format_for_direct_mode(plan: &DailyActionPlan) -> String {
    render_direct(plan, clean_response_text)
}

/// Like [`format_for_direct_mode`], cleaning against a configured validator.
pub fn format_for_direct_mode_with(
    plan: &DailyActionPlan,
    validator: &ResponseValidator,
) -> String {
    render_direct(plan, |text| validator.clean(text))
}

fn render_direct(plan: &DailyActionPlan, clean: impl Fn(&str) -> String) -> String {
    let clean = |text: &str| strip_questions(&clean(text));
    let mut out = String::with_capacity(512);

    let Some(primary) = &plan.primary else {
        out.push_str("No primary action is set for today. ");
        out.push_str("Review your goals and choose one conversation to have.");
        return out;
    };

    let title = clean(&primary.title);
    let title = match trim_period(&title) {
        "" => "Work on your main priority",
        kept => kept,
    };
    let _ = writeln!(out, "Today's primary action: {title}.");
    let description = clean(&primary.description);
    if !description.is_empty() {
        let _ = writeln!(out, "{description}");
    }
    let _ = writeln!(
        out,
        "Minimum version: {} About {} minutes.",
        clean(&primary.minimum_viable),
        primary.minutes_estimate
    );
    let _ = writeln!(out, "Why it matters: {}", clean(&primary.milestone_connection));

    if !plan.supporting.is_empty() {
        out.push_str("\nThen:\n");
        for (position, action) in (1..).zip(&plan.supporting) {
            let _ = writeln!(
                out,
                "{position}. {}. {}",
                trim_period(&clean(&action.title)),
                clean(&action.minimum_viable)
            );
        }
    }

    if plan.reduced_load {
        out.push_str("\nLighter load today. The primary action is enough.\n");
    }

    out.trim_end().to_owned()
}

fn trim_period(text: &str) -> &str {
    text.trim().trim_end_matches('.')
}

fn strip_questions(text: &str) -> String {
    text.replace('?', ".")
}
