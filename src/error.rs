//! Library error type.
//!
//! State transitions never fail: illegal requests return the unchanged
//! snapshot. Errors only surface when parsing plain strings from a
//! persistence or CLI boundary into the closed enumerations of the core.

/// Errors produced at the boundary of the decision core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A string did not name any variant of a closed enumeration.
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// The enumeration being parsed (e.g. "CoachMode").
        kind: &'static str,
        /// The offending input.
        value: String,
    },
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_owned(),
        }
    }
}
