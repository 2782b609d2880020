//! Coaching move selection.
//!
//! Priority when several signals fire: AGENCY > FOCUS > IDENTITY > EASE.
//! A message that raises all four at once is too noisy to act on and gets
//! no move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CoachPolicyState, CoachingMove};
use crate::signals::{self, Signals};

/// How clearly a message points at a single intervention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clarity {
    /// Usable signal.
    #[default]
    Normal,
    /// Every signal fired; ambiguous.
    Low,
}

/// Scan a message and assess how clear its signals are.
pub fn detect_move_signals(text: &str) -> (Signals, Clarity) {
    let signals = signals::detect_signals(text);
    (signals, assess_clarity(&signals))
}

/// `Low` when all four move signals fire together.
pub fn assess_clarity(signals: &Signals) -> Clarity {
    if signals.all_move_signals() {
        Clarity::Low
    } else {
        Clarity::Normal
    }
}

/// Pick the coaching move for a set of signals.
pub fn choose_coaching_move(signals: &Signals, clarity: Clarity) -> CoachingMove {
    if clarity == Clarity::Low {
        return CoachingMove::None;
    }
    if signals.externalized_control {
        CoachingMove::Agency
    } else if signals.overwhelm {
        CoachingMove::Focus
    } else if signals.self_story {
        CoachingMove::Identity
    } else if signals.resistance {
        CoachingMove::Ease
    } else {
        CoachingMove::None
    }
}

/// Detect, choose, and store the move for the latest user message.
pub fn apply_move(state: &CoachPolicyState, text: &str) -> CoachPolicyState {
    let (signals, clarity) = detect_move_signals(text);
    let chosen = choose_coaching_move(&signals, clarity);
    debug!(?clarity, coaching_move = %chosen, "coaching move chosen");
    let mut next = state.clone();
    next.current_move = chosen;
    next
}
