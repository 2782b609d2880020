//! Check-in parsing and the readiness gate.

use serde::{Deserialize, Serialize};

use super::{CheckInResponse, Momentum};
use crate::signals;

/// Completion marker used when the user reports doing "it" without naming
/// a specific action.
pub const ASSUMED_COMPLETION: &str = "assumed-completion";

/// More friction indicators than this warrant coaching.
pub const FRICTION_THRESHOLD: usize = 2;

/// Wording that reports some, but not all, of the work.
const PARTIAL_PROGRESS: &[&str] = &[
    "some of",
    "halfway",
    "half way",
    "partially",
    "started",
    "got through part",
];

/// Why the gate decided as it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessReason {
    /// The missed-day choice was already handled upstream.
    MissedDay,
    /// More friction indicators than the threshold.
    MultipleFrictionIndicators,
    /// The check-in reported negative momentum.
    NegativeMomentum,
}

impl ReadinessReason {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissedDay => "missed_day",
            Self::MultipleFrictionIndicators => "multiple_friction_indicators",
            Self::NegativeMomentum => "negative_momentum",
        }
    }
}

/// Outcome of the readiness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessGate {
    /// Whether coaching should come before the next plan.
    pub needs_coaching: bool,
    /// What decided it, when anything specific did.
    pub reason: Option<ReadinessReason>,
}

/// Decide whether a check-in warrants coaching before the next plan.
///
/// The friction threshold is strict: two indicators pass, three do not.
pub fn check_readiness_gate(check_in: Option<&CheckInResponse>, missed_day: bool) -> ReadinessGate {
    if missed_day {
        return ReadinessGate {
            needs_coaching: false,
            reason: Some(ReadinessReason::MissedDay),
        };
    }
    let Some(check_in) = check_in else {
        return ReadinessGate {
            needs_coaching: false,
            reason: None,
        };
    };
    if check_in.friction_indicators.len() > FRICTION_THRESHOLD {
        return ReadinessGate {
            needs_coaching: true,
            reason: Some(ReadinessReason::MultipleFrictionIndicators),
        };
    }
    if check_in.momentum_signal == Momentum::Negative {
        return ReadinessGate {
            needs_coaching: true,
            reason: Some(ReadinessReason::NegativeMomentum),
        };
    }
    ReadinessGate {
        needs_coaching: false,
        reason: None,
    }
}

/// Parse a free-text check-in.
pub fn parse_check_in(text: &str) -> CheckInResponse {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    let completed_action_ids = if signals::detect_completion(trimmed) {
        vec![ASSUMED_COMPLETION.to_owned()]
    } else {
        Vec::new()
    };
    let partial_progress = PARTIAL_PROGRESS
        .iter()
        .any(|phrase| lower.contains(phrase))
        .then(|| trimmed.to_owned());

    CheckInResponse {
        completed_action_ids,
        partial_progress,
        momentum_signal: signals::detect_momentum(trimmed),
        friction_indicators: signals::detect_friction(trimmed),
    }
}
