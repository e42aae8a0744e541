//! Runtime errors surfaced by `fire` and `start`.

use crate::context::BehaviorError;
use std::fmt;
use thiserror::Error;

/// Where in a transition an action was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Exit,
    Transition,
    Entry,
}

impl fmt::Display for ActionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit => f.write_str("exit"),
            Self::Transition => f.write_str("transition"),
            Self::Entry => f.write_str("entry"),
        }
    }
}

/// Errors that can occur while dispatching an event.
///
/// An event that matches nothing is not an error; `fire` returns `false`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FireError {
    /// A guard failed to evaluate. No state was exited or entered.
    #[error("Guard '{condition}' on '{event}' from '{state}' failed: {cause}")]
    GuardEvaluation {
        state: String,
        event: String,
        condition: String,
        cause: BehaviorError,
    },

    /// An action failed mid-sequence. Completed exits and entries are not
    /// rolled back; the machine should be reset or halted.
    #[error("{phase} action '{action}' of '{state}' failed: {cause}")]
    ActionExecution {
        state: String,
        action: String,
        phase: ActionPhase,
        cause: BehaviorError,
    },
}

impl FireError {
    pub fn is_guard_failure(&self) -> bool {
        matches!(self, Self::GuardEvaluation { .. })
    }

    pub fn is_action_failure(&self) -> bool {
        matches!(self, Self::ActionExecution { .. })
    }
}

/// Errors that can occur when loading machine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Invalid(String),
}
