//! Errors returned by registered behaviors.

use thiserror::Error;

/// Failure reported by a guard or action behavior.
///
/// Also produced by the registry when a symbolic name has no behavior
/// registered at call time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("{0}")]
    Failed(String),

    #[error("No {kind} registered under '{name}'")]
    Unresolved { kind: BehaviorKind, name: String },
}

impl BehaviorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<String> for BehaviorError {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for BehaviorError {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_string())
    }
}

/// Which registry table a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    Action,
    Guard,
}

impl std::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Action => f.write_str("action"),
            Self::Guard => f.write_str("guard"),
        }
    }
}
