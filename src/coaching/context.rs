//! Context bundle handed to the text-generation collaborator.
//!
//! The core never produces prose itself beyond a few canned fallback
//! lines. It assembles mode, move, tone, and profile into a bundle and a
//! deterministic instruction block; the collaborator turns that into a
//! reply which then goes back through the validator.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{CoachMode, CoachPolicyState, CoachingMove};
use crate::calibration::{CalibrationState, GoalsAndActions, Tone};
use crate::daily::BusinessPlan;

/// Who sent a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The salesperson.
    User,
    /// The coaching assistant.
    Assistant,
}

/// One message of recent conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender.
    pub role: Role,
    /// Message text.
    pub content: String,
}

/// Everything the text-generation collaborator needs for one reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Current mode.
    pub mode: CoachMode,
    /// Current coaching move.
    pub coaching_move: CoachingMove,
    /// Preferred tone, if calibrated.
    pub tone: Option<Tone>,
    /// Goals-and-actions record, if drafted.
    pub goals_and_actions: Option<GoalsAndActions>,
    /// Business plan, if the caller has one.
    pub business_plan: Option<BusinessPlan>,
    /// Most recent messages, oldest first.
    pub recent_messages: Vec<ChatMessage>,
}

/// Assemble the bundle from core state, keeping the last `history_limit` messages.
pub fn build_generation_context(
    policy: &CoachPolicyState,
    calibration: &CalibrationState,
    business_plan: Option<&BusinessPlan>,
    history: &[ChatMessage],
    history_limit: usize,
) -> GenerationContext {
    let skip = history.len().saturating_sub(history_limit);
    GenerationContext {
        mode: policy.current_mode,
        coaching_move: policy.current_move,
        tone: calibration.tone,
        goals_and_actions: calibration.goals_and_actions.clone(),
        business_plan: business_plan.cloned(),
        recent_messages: history.iter().skip(skip).cloned().collect(),
    }
}

/// Reply rules for a mode.
pub fn mode_instructions(mode: CoachMode) -> &'static str {
    match mode {
        CoachMode::Clarify => {
            "Ask exactly one short question to understand the situation. Do not advise yet."
        }
        CoachMode::Reflect => {
            "Mirror back what the user said in one or two sentences. At most one question, to check accuracy."
        }
        CoachMode::Reframe => {
            "Offer one alternative reading of the story the user is telling about themselves. No questions."
        }
        CoachMode::Commit => {
            "Propose one small, concrete action for today and ask for agreement with at most one question."
        }
        CoachMode::Direct => "State the plan plainly as instructions. No questions.",
    }
}

/// Intent of a coaching move.
pub fn move_instructions(coaching_move: CoachingMove) -> &'static str {
    match coaching_move {
        CoachingMove::Focus => "Narrow attention to the single most important thing.",
        CoachingMove::Agency => "Point to what is within the user's control today.",
        CoachingMove::Identity => "Separate the user's identity from one outcome.",
        CoachingMove::Ease => "Shrink the next step until it feels easy to start.",
        CoachingMove::None => "No specific intervention.",
    }
}

/// Voice guidance for a tone.
pub fn tone_instructions(tone: Option<Tone>) -> &'static str {
    match tone {
        Some(Tone::DirectExecutive) => "Be blunt and outcome-first. Short sentences.",
        Some(Tone::CoachConcise) => "Be warm but brief.",
        Some(Tone::NeutralMinimal) | None => "Be plain and minimal.",
    }
}

/// Render the bundle as an instruction block for the text-generation call.
pub fn render_instructions(ctx: &GenerationContext) -> String {
    let mut doc = String::with_capacity(1024);

    let _ = writeln!(doc, "## Mode: {}", ctx.mode);
    let _ = writeln!(doc, "{}\n", mode_instructions(ctx.mode));

    let _ = writeln!(doc, "## Move: {}", ctx.coaching_move);
    let _ = writeln!(doc, "{}\n", move_instructions(ctx.coaching_move));

    doc.push_str("## Tone\n");
    let _ = writeln!(doc, "{}\n", tone_instructions(ctx.tone));

    if let Some(ga) = &ctx.goals_and_actions {
        doc.push_str("## Goals\n");
        let _ = writeln!(doc, "- Annual professional: {}", ga.annual_professional_goal);
        let _ = writeln!(doc, "- Annual personal: {}", ga.annual_personal_goal);
        let _ = writeln!(doc, "- 30-day milestone: {}", ga.monthly_milestone);
        if !ga.friction_boundaries.is_empty() {
            let _ = writeln!(
                doc,
                "- Never suggest: {}",
                ga.friction_boundaries.join(", ")
            );
        }
        doc.push('\n');
    }

    if let Some(plan) = &ctx.business_plan {
        if let Some(focus) = &plan.focus {
            let _ = writeln!(doc, "## Business focus\n{focus}\n");
        }
    }

    doc.push_str("## Rules\n");
    doc.push_str("- At most one question per reply.\n");
    doc.push_str("- No hype words and no urgency or pressure language.\n");
    doc
}

/// Canned reply for a mode, used when generated text fails validation.
pub fn fallback_line(mode: CoachMode) -> &'static str {
    match mode {
        CoachMode::Clarify => "What feels most important to work on today?",
        CoachMode::Reflect => {
            "Here is what I am hearing: you want progress, and something is in the way. Tell me if that is close."
        }
        CoachMode::Reframe => {
            "Another way to see this: one slow week is information, not a verdict."
        }
        CoachMode::Commit => {
            "Pick one small action you can finish today. Name it and we will lock it in."
        }
        CoachMode::Direct => {
            "Your next step is one conversation today. Keep it short and log it when done."
        }
    }
}
