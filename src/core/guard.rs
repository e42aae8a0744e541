//! Symbolic guard references.
//!
//! A transition never holds its guard predicate. It holds a [`Condition`]
//! naming a predicate registered in an
//! [`ExecutionContext`](crate::context::ExecutionContext), so the same
//! declaration can run against different registries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Guard reference attached to a transition.
///
/// `Display` gives the stable, human-readable form used by exporters.
///
/// # Example
///
/// ```rust
/// use statechart::core::Condition;
///
/// assert_eq!(Condition::Always.to_string(), "true");
/// assert_eq!(Condition::named("has_credit").to_string(), "has_credit");
/// assert_eq!(Condition::negated("has_credit").to_string(), "!has_credit");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// No guard; the transition is always eligible.
    #[default]
    Always,
    /// Eligible when the named predicate returns `true`.
    Named(String),
    /// Eligible when the named predicate returns `false`.
    Not(String),
}

impl Condition {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn negated(name: impl Into<String>) -> Self {
        Self::Not(name.into())
    }

    /// Name of the predicate to resolve, if any.
    pub fn guard_name(&self) -> Option<&str> {
        match self {
            Self::Always => None,
            Self::Named(name) | Self::Not(name) => Some(name),
        }
    }

    /// Apply this condition's polarity to a raw predicate result.
    pub fn apply(&self, raw: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Named(_) => raw,
            Self::Not(_) => !raw,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("true"),
            Self::Named(name) => f.write_str(name),
            Self::Not(name) => write!(f, "!{name}"),
        }
    }
}
