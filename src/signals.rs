//! Signal detector: keyword-family scanner over free-text user messages.
//!
//! Each signal is an independent family of case-insensitive patterns, so a
//! single message may raise several signals at once. Every function here is
//! pure and total: empty or whitespace-only input yields no signals.
//!
//! The same module hosts the check-in families (completion, friction,
//! momentum) and the small question/affirmation detectors shared by the
//! coaching and daily engines.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::daily::{FrictionIndicator, Momentum};

/// Boolean signals raised by a single user message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    /// Too much on the plate; the user cannot see where to start.
    pub overwhelm: bool,
    /// Outcome attributed to the market, other people, or circumstance.
    pub externalized_control: bool,
    /// A fixed negative story about who the user is.
    pub self_story: bool,
    /// Reluctance to do the work itself.
    pub resistance: bool,
    /// The user reports that the whole day slipped.
    pub missed_day: bool,
}

impl Signals {
    /// Whether any of the four move-driving signals fired.
    pub fn any_move_signal(&self) -> bool {
        self.overwhelm || self.externalized_control || self.self_story || self.resistance
    }

    /// Whether all four move-driving signals fired at once.
    pub fn all_move_signals(&self) -> bool {
        self.overwhelm && self.externalized_control && self.self_story && self.resistance
    }
}

const OVERWHELM: &[&str] = &[
    r"\boverwhelm(ed|ing)?\b",
    r"\btoo much\b",
    r"\bswamped\b",
    r"\bdrowning\b",
    r"\bburn(ed|t)[ -]?out\b",
    r"\bcan't keep up\b",
    r"\bso much (to do|going on)\b",
    r"\bstretched (too )?thin\b",
    r"\bdon't know where to start\b",
];

const EXTERNALIZED_CONTROL: &[&str] = &[
    r"\bthe market\b",
    r"\bthe economy\b",
    r"\binterest rates\b",
    r"\b(nobody|no one) (is )?(buying|calling|answering|responding)\b",
    r"\bout of my (hands|control)\b",
    r"\bnot up to me\b",
    r"\bmy (broker|manager|boss|upline|team lead) (won't|doesn't|didn't|never)\b",
    r"\bthey (won't|never|don't) (call|answer|respond|reply)\b",
    r"\bbecause of (them|the market|the economy)\b",
    r"\bnothing i can do\b",
];

const SELF_STORY: &[&str] = &[
    r"\bi'?m (just )?not (good|cut out|a natural|a salesperson|a sales person|the type)\b",
    r"\bi'?m (bad|terrible|awful|hopeless) at\b",
    r"\bi always (fail|mess|screw|quit|give up)\b",
    r"\bi never (follow through|finish|stick)\b",
    r"\bthat'?s just (who|how) i am\b",
    r"\bi'?m (a failure|lazy|a fraud)\b",
    r"\bi can'?t sell\b",
    r"\bwho am i to\b",
];

const RESISTANCE: &[&str] = &[
    r"\bi don'?t want to\b",
    r"\bi hate (calling|prospecting|asking|doing)\b",
    r"\bi'?d rather not\b",
    r"\bnot (really )?feeling it\b",
    r"\bcan'?t (make|bring) myself\b",
    r"\bdread(ing)?\b",
    r"\bkeep avoiding\b",
    r"\bputting (it |this |that )?off\b",
    r"\bprocrastinat",
];

const MISSED_DAY: &[&str] = &[
    r"\bnothing got done\b",
    r"\bgot nothing done\b",
    r"\bdidn'?t (do|get) anything( done)?\b",
    r"\bdid nothing\b",
    r"\bfell off\b",
    r"\bblew (the|my) day\b",
    r"\bwasted (the|my) (whole )?day\b",
    r"\bdidn'?t get to any of it\b",
];

const AFFIRMATION_LEAD: &[&str] = &[
    r"^(yes|yeah|yep|yup|sure|ok|okay|deal|agreed|absolutely|definitely|will do|committed)\b",
];

const AFFIRMATION_ANYWHERE: &[&str] = &[
    r"\bi commit\b",
    r"\bi'?m in\b",
    r"\blet'?s do it\b",
    r"\bsounds good\b",
    r"\bi agree\b",
    r"\bi'?ll do it\b",
    r"\bi will do it\b",
    r"\bcount me in\b",
];

const COMPLETION: &[&str] = &[
    r"\bdid it\b",
    r"\bdone\b",
    r"\bcompleted\b",
    r"\bfinished\b",
    r"\bmade the calls?\b",
    r"\bchecked (it )?off\b",
];

/// Words that cancel a completion token when they appear shortly before it
/// in the same clause.
const NEGATORS: &[&str] = &[
    "not", "never", "nothing", "didn't", "didnt", "haven't", "havent", "hasn't", "hasnt",
    "wasn't", "wasnt", "couldn't", "couldnt", "won't", "wont", "can't", "cant",
];

/// How many words before a completion token a negator may sit.
const NEGATION_WINDOW: usize = 4;

const PROCRASTINATION: &[&str] = &[
    r"\bkept putting (it |this |that )?off\b",
    r"\bput (it|this|that) off\b",
    r"\bprocrastinat",
];

const DISTRACTION: &[&str] = &[r"\bdistract(ed|ion|ions)?\b", r"\bgot sidetracked\b"];

const EMOTIONAL_RESISTANCE: &[&str] = &[
    r"\bfelt heavy\b",
    r"\bdreaded\b",
    r"\bfelt (anxious|scared|nervous)\b",
];

const TIME_PRESSURE: &[&str] = &[
    r"\bdidn'?t have (the )?time\b",
    r"\bno time\b",
    r"\bran out of time\b",
    r"\btoo busy\b",
];

const UNCERTAINTY: &[&str] = &[
    r"\bwasn'?t sure\b",
    r"\bnot sure (what|how|who)\b",
    r"\bdidn'?t know (what|how|who|where)\b",
];

const POSITIVE_MOMENTUM: &[&str] = &[
    r"\bgreat (day|call|conversation|week)\b",
    r"\bfelt (good|great)\b",
    r"\bon a roll\b",
    r"\bmomentum\b",
    r"\benergi[sz]ed\b",
    r"\bproud\b",
    r"\bproductive\b",
    r"\bexcited\b",
    r"\bbooked (a|an|the|two|three)\b",
    r"\bwent well\b",
];

const NEGATIVE_MOMENTUM: &[&str] = &[
    r"\brough\b",
    r"\bterrible\b",
    r"\bawful\b",
    r"\bfrustrat",
    r"\bstuck\b",
    r"\bdiscouraged\b",
    r"\bexhausted\b",
    r"\bbad day\b",
    r"\bstruggl",
    r"\bdefeated\b",
];

/// Lead words that make a message read as a question even without `?`.
const INTERROGATIVE_LEADS: &[&str] = &[
    "what", "why", "how", "when", "where", "who", "which", "should", "could", "would", "can",
    "is", "are", "do", "does",
];

/// A compiled keyword family.
struct Family(Vec<Regex>);

impl Family {
    fn compile(patterns: &[&str]) -> Self {
        Self(
            patterns
                .iter()
                .filter_map(|pattern| Regex::new(&format!("(?i){pattern}")).ok())
                .collect(),
        )
    }

    fn is_match(&self, text: &str) -> bool {
        self.0.iter().any(|re| re.is_match(text))
    }
}

static OVERWHELM_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(OVERWHELM));
static EXTERNALIZED_RE: LazyLock<Family> =
    LazyLock::new(|| Family::compile(EXTERNALIZED_CONTROL));
static SELF_STORY_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(SELF_STORY));
static RESISTANCE_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(RESISTANCE));
static MISSED_DAY_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(MISSED_DAY));
static AFFIRM_LEAD_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(AFFIRMATION_LEAD));
static AFFIRM_ANY_RE: LazyLock<Family> =
    LazyLock::new(|| Family::compile(AFFIRMATION_ANYWHERE));
static COMPLETION_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(COMPLETION));
static CLAUSE_BREAK_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)[,.;:!?]|\b(but|and|then|so)\b").ok());
static POSITIVE_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(POSITIVE_MOMENTUM));
static NEGATIVE_RE: LazyLock<Family> = LazyLock::new(|| Family::compile(NEGATIVE_MOMENTUM));

/// Friction families, tested independently; order fixes the iteration order only.
static FRICTION_RE: LazyLock<Vec<(FrictionIndicator, Family)>> = LazyLock::new(|| {
    vec![
        (
            FrictionIndicator::Procrastination,
            Family::compile(PROCRASTINATION),
        ),
        (FrictionIndicator::Distraction, Family::compile(DISTRACTION)),
        (
            FrictionIndicator::EmotionalResistance,
            Family::compile(EMOTIONAL_RESISTANCE),
        ),
        (
            FrictionIndicator::TimePressure,
            Family::compile(TIME_PRESSURE),
        ),
        (FrictionIndicator::Uncertainty, Family::compile(UNCERTAINTY)),
    ]
});

/// Fold typographic apostrophes so `didn’t` and `didn't` match the same family.
fn normalize(text: &str) -> String {
    text.trim().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Scan a message for all coaching signals.
pub fn detect_signals(text: &str) -> Signals {
    let text = normalize(text);
    if text.is_empty() {
        return Signals::default();
    }
    Signals {
        overwhelm: OVERWHELM_RE.is_match(&text),
        externalized_control: EXTERNALIZED_RE.is_match(&text),
        self_story: SELF_STORY_RE.is_match(&text),
        resistance: RESISTANCE_RE.is_match(&text),
        missed_day: missed_day_in(&text),
    }
}

/// Whether the message reports a fully missed day.
///
/// Ordinary negative statements ("today was rough") and questions never
/// count, even when they contain missed-day wording.
pub fn detect_missed_day(text: &str) -> bool {
    missed_day_in(&normalize(text))
}

fn missed_day_in(normalized: &str) -> bool {
    !normalized.is_empty() && !question_in(normalized) && MISSED_DAY_RE.is_match(normalized)
}

/// Whether the message is a question: it contains `?` or opens with an
/// interrogative lead word.
pub fn is_question(text: &str) -> bool {
    question_in(&normalize(text))
}

fn question_in(normalized: &str) -> bool {
    if normalized.contains('?') {
        return true;
    }
    let first = normalized
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    INTERROGATIVE_LEADS.contains(&first.as_str())
}

/// Whether the message agrees to a proposal ("yes", "let's do it", "I'm in").
pub fn is_affirmation(text: &str) -> bool {
    let text = normalize(text);
    if text.is_empty() {
        return false;
    }
    AFFIRM_LEAD_RE.is_match(&text) || AFFIRM_ANY_RE.is_match(&text)
}

/// Whether a check-in reports completing the day's action.
///
/// A completion token only counts when no negator governs it, meaning no
/// negator within a few words before it in the same clause. "I didn't get
/// it done" is not a completion; "I didn't have to do much and it's done" is.
pub fn detect_completion(text: &str) -> bool {
    let text = normalize(text);
    COMPLETION_RE
        .0
        .iter()
        .flat_map(|re| re.find_iter(&text))
        .any(|found| !negated_before(&text[..found.start()]))
}

fn negated_before(prefix: &str) -> bool {
    let clause_start = CLAUSE_BREAK_RE
        .as_ref()
        .and_then(|re| re.find_iter(prefix).last())
        .map_or(0, |m| m.end());
    let clause = prefix[clause_start..].to_lowercase();
    clause
        .split_whitespace()
        .rev()
        .take(NEGATION_WINDOW)
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .any(|word| NEGATORS.contains(&word))
}

/// All friction indicators present in a check-in. Zero or more may fire.
pub fn detect_friction(text: &str) -> BTreeSet<FrictionIndicator> {
    let text = normalize(text);
    FRICTION_RE
        .iter()
        .filter(|(_, family)| family.is_match(&text))
        .map(|(indicator, _)| *indicator)
        .collect()
}

/// Momentum reported by a check-in.
///
/// Defaults to [`Momentum::Neutral`] when neither family fires, and also
/// when both fire (a mixed report carries no direction).
pub fn detect_momentum(text: &str) -> Momentum {
    let text = normalize(text);
    match (POSITIVE_RE.is_match(&text), NEGATIVE_RE.is_match(&text)) {
        (true, false) => Momentum::Positive,
        (false, true) => Momentum::Negative,
        _ => Momentum::Neutral,
    }
}
