//! Reply policy validator.
//!
//! Checks a candidate assistant reply before it is shown. All rules are
//! evaluated independently, so one reply may collect several violations.
//! The validator is advisory: it reports, the caller decides whether to
//! regenerate, log, or substitute a canned line.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::CoachMode;

/// Hype vocabulary the assistant never uses.
const BANNED_WORDS: &[&str] = &[
    "crush",
    "hustle",
    "grind",
    "empower",
    "synergy",
    "game-changer",
    "game changer",
    "rockstar",
    "ninja",
    "unleash",
];

/// Pressure phrasing the assistant never uses.
const URGENCY_PATTERNS: &[&str] = &[
    r"\bdon'?t miss\b",
    r"\blimited time\b",
    r"\bact now\b",
    r"\burgent(ly)?\b",
    r"\blast chance\b",
    r"\bbefore it'?s too late\b",
    r"\bhurry\b",
    r"\btime is running out\b",
];

/// Violation text for more than one question in a reply.
pub const MULTIPLE_QUESTIONS: &str = "multiple questions";
/// Violation text for urgency phrasing.
pub const URGENCY_DETECTED: &str = "urgency language detected";

/// Outcome of validating one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no rule was violated.
    pub valid: bool,
    /// One entry per violated rule (per distinct banned word).
    pub violations: Vec<String>,
    /// Number of `?` characters in the reply.
    pub question_count: usize,
}

/// Most cleaning passes before giving up on text that keeps re-forming
/// a match (removing "crush" from "act crush now" exposes "act now").
const MAX_CLEAN_PASSES: usize = 4;

static EXTRA_SPACE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").ok());
static SPACE_BEFORE_PUNCT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[ \t]+([.,;:!])").ok());
static REPEATED_PUNCT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([,;:])(\s*[,;:])+").ok());

/// Validator holding the banned-word list and urgency patterns.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    banned_words: Vec<(String, Regex)>,
    urgency_patterns: Vec<Regex>,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new(&[], &[])
    }
}

impl ResponseValidator {
    /// Create a validator with extra banned words and urgency phrases
    /// appended to the built-in lists. Extra phrases match literally.
    pub fn new(extra_banned_words: &[String], extra_urgency_phrases: &[String]) -> Self {
        let mut banned_words: Vec<(String, Regex)> = Vec::new();
        let candidates = BANNED_WORDS
            .iter()
            .map(|word| (*word).to_owned())
            .chain(extra_banned_words.iter().map(|w| w.trim().to_lowercase()));
        for word in candidates {
            if word.is_empty() || banned_words.iter().any(|(known, _)| *known == word) {
                continue;
            }
            if let Ok(re) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&word))) {
                banned_words.push((word, re));
            }
        }

        let urgency_patterns = URGENCY_PATTERNS
            .iter()
            .map(|pattern| (*pattern).to_owned())
            .chain(
                extra_urgency_phrases
                    .iter()
                    .filter(|phrase| !phrase.trim().is_empty())
                    .map(|phrase| regex::escape(phrase.trim())),
            )
            .filter_map(|pattern| Regex::new(&format!("(?i){pattern}")).ok())
            .collect();

        Self {
            banned_words,
            urgency_patterns,
        }
    }

    /// Validate a reply generated in `mode`.
    pub fn validate(&self, text: &str, mode: CoachMode) -> ValidationResult {
        let mut violations = Vec::new();
        let question_count = text.matches('?').count();

        if question_count > 1 {
            violations.push(MULTIPLE_QUESTIONS.to_owned());
        }
        if !mode.allows_questions() && question_count > 0 {
            violations.push(format!("questions not allowed in {mode} mode"));
        }

        let text = fold_apostrophes(text);
        for (word, re) in &self.banned_words {
            if re.is_match(&text) {
                violations.push(format!("banned word: {word}"));
            }
        }

        if self.urgency_patterns.iter().any(|re| re.is_match(&text)) {
            violations.push(URGENCY_DETECTED.to_owned());
        }

        ValidationResult {
            valid: violations.is_empty(),
            violations,
            question_count,
        }
    }

    /// Remove banned words and urgency phrasing from user-supplied text so
    /// it can be embedded in a reply that must pass [`Self::validate`].
    ///
    /// Leftover separators and doubled spaces are tidied, and a leading
    /// capital is kept when the input had one. Question marks are left
    /// alone; that rule depends on the mode.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = fold_apostrophes(text);
        for _ in 0..MAX_CLEAN_PASSES {
            let before = cleaned.clone();
            for re in self
                .banned_words
                .iter()
                .map(|(_, re)| re)
                .chain(&self.urgency_patterns)
            {
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
            if let Some(re) = &*EXTRA_SPACE_RE {
                cleaned = re.replace_all(&cleaned, " ").into_owned();
            }
            if cleaned == before {
                break;
            }
        }
        tidy(&cleaned, text.starts_with(char::is_uppercase))
    }
}

fn fold_apostrophes(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'")
}

fn tidy(text: &str, capitalize: bool) -> String {
    let mut out = text.to_owned();
    for (re, replacement) in [
        (&*EXTRA_SPACE_RE, " "),
        (&*SPACE_BEFORE_PUNCT_RE, "$1"),
        (&*REPEATED_PUNCT_RE, "$1"),
    ] {
        if let Some(re) = re {
            out = re.replace_all(&out, replacement).into_owned();
        }
    }
    let trimmed =
        out.trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | ';' | '-'));
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) if capitalize => first.to_uppercase().chain(chars).collect(),
        _ => trimmed.to_owned(),
    }
}

static DEFAULT_VALIDATOR: LazyLock<ResponseValidator> = LazyLock::new(ResponseValidator::default);

/// Validate a reply against the built-in lists.
pub fn validate_response(text: &str, mode: CoachMode) -> ValidationResult {
    DEFAULT_VALIDATOR.validate(text, mode)
}

/// Clean text against the built-in lists. See [`ResponseValidator::clean`].
pub fn clean_response_text(text: &str) -> String {
    DEFAULT_VALIDATOR.clean(text)
}
