//! Closed vocabularies for node and transition kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the children of a state are activated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeType {
    /// Leaf state, no children.
    #[default]
    None,
    /// Exactly one child is active at a time.
    Sequential,
    /// Every child is active at once (orthogonal regions).
    Parallel,
}

/// What a composite remembers about its sub-configuration when exited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryType {
    #[default]
    None,
    /// Last active immediate child.
    Shallow,
    /// Last active leaf path.
    Deep,
}

/// Exit/entry scope of a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Leaves the source, even when targeting itself or a descendant.
    #[default]
    External,
    /// Runs actions only; source stays active.
    Internal,
    /// Never exits a source that contains the target (or vice versa).
    Local,
}

/// How the target of a transition descends into its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Follow the target's declared history type.
    #[default]
    History,
    /// Always take initial children.
    Shallow,
    /// Restore remembered leaf paths where recorded.
    Deep,
}

impl fmt::Display for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        };
        f.write_str(name)
    }
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Shallow => "shallow",
            Self::Deep => "deep",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::External => "external",
            Self::Internal => "internal",
            Self::Local => "local",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plain_states() {
        assert_eq!(CompositeType::default(), CompositeType::None);
        assert_eq!(HistoryType::default(), HistoryType::None);
        assert_eq!(TransitionKind::default(), TransitionKind::External);
        assert_eq!(EntryMode::default(), EntryMode::History);
    }

    #[test]
    fn display_matches_serde_names() {
        for kind in [
            TransitionKind::External,
            TransitionKind::Internal,
            TransitionKind::Local,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        assert_eq!(HistoryType::Deep.to_string(), "deep");
        assert_eq!(CompositeType::Parallel.to_string(), "parallel");
    }
}
