//! Fixed calibration question sets and the phrase detectors that steer them.

use super::{CalibrationState, Tone};

/// A single profiling question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationQuestion {
    /// Stable id; answers are stored under it.
    pub id: &'static str,
    /// Prompt shown to the user.
    pub prompt: &'static str,
}

/// Answer key for the annual professional goal.
pub const ANNUAL_PROFESSIONAL_GOAL: &str = "annual_professional_goal";
/// Answer key for the annual personal goal.
pub const ANNUAL_PERSONAL_GOAL: &str = "annual_personal_goal";
/// Answer key for the current-reality statement.
pub const CURRENT_REALITY: &str = "current_reality";
/// Answer key for the 30-day milestone.
pub const MONTHLY_MILESTONE: &str = "monthly_milestone";
/// Answer key for the execution style.
pub const EXECUTION_STYLE: &str = "execution_style";
/// Answer key for the willingness filter.
pub const WILLINGNESS_FILTER: &str = "willingness_filter";
/// Answer key for the friction boundaries.
pub const FRICTION_BOUNDARIES: &str = "friction_boundaries";

/// The full seven-question path.
pub const FULL_QUESTIONS: [CalibrationQuestion; 7] = [
    CalibrationQuestion {
        id: ANNUAL_PROFESSIONAL_GOAL,
        prompt: "What is the one professional result you want by the end of this year?",
    },
    CalibrationQuestion {
        id: ANNUAL_PERSONAL_GOAL,
        prompt: "What do you want your life outside work to look like this year?",
    },
    CalibrationQuestion {
        id: CURRENT_REALITY,
        prompt: "Where does your business honestly stand today?",
    },
    CalibrationQuestion {
        id: MONTHLY_MILESTONE,
        prompt: "What needs to be true 30 days from now for you to feel on track?",
    },
    CalibrationQuestion {
        id: EXECUTION_STYLE,
        prompt: "How do you work best: structured blocks, short bursts, slow and consistent, or flexible?",
    },
    CalibrationQuestion {
        id: WILLINGNESS_FILTER,
        prompt: "Which activities are you willing to do? List them separated by commas.",
    },
    CalibrationQuestion {
        id: FRICTION_BOUNDARIES,
        prompt: "Which activities are off the table for you? List them separated by commas.",
    },
];

/// The shortened fast-lane path.
pub const FAST_LANE_QUESTIONS: [CalibrationQuestion; 2] = [
    CalibrationQuestion {
        id: ANNUAL_PROFESSIONAL_GOAL,
        prompt: "What is the one result you want this year?",
    },
    CalibrationQuestion {
        id: MONTHLY_MILESTONE,
        prompt: "What would make the next 30 days a win?",
    },
];

/// Phrases that ask to skip the long onboarding.
const FAST_LANE_PHRASES: &[&str] = &[
    "just get me started",
    "skip ahead",
    "skip the questions",
    "skip this",
    "let's just start",
    "lets just start",
    "fast lane",
    "give me the short version",
    "get to the point",
];

/// The question set in force for this state.
pub fn active_questions(state: &CalibrationState) -> &'static [CalibrationQuestion] {
    if state.fast_lane_triggered {
        &FAST_LANE_QUESTIONS
    } else {
        &FULL_QUESTIONS
    }
}

/// The question the pointer currently rests on, if any remain.
pub fn current_question(state: &CalibrationState) -> Option<&'static CalibrationQuestion> {
    active_questions(state).get(state.current_question_index)
}

/// Whether the message asks for the fast lane.
pub fn detect_fast_lane(text: &str) -> bool {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    FAST_LANE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Interpret a free-text tone choice ("1", "direct", "coach", "minimal").
pub fn parse_tone_choice(text: &str) -> Option<Tone> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if let Ok(tone) = Tone::parse(&lower.to_uppercase()) {
        return Some(tone);
    }
    if lower == "1" || lower.contains("direct") || lower.contains("executive") {
        Some(Tone::DirectExecutive)
    } else if lower == "2" || lower.contains("coach") {
        Some(Tone::CoachConcise)
    } else if lower == "3" || lower.contains("neutral") || lower.contains("minimal") {
        Some(Tone::NeutralMinimal)
    } else {
        None
    }
}
