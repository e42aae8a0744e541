//! Build errors for state tree and transition builders.

use crate::model::DeclarationError;
use thiserror::Error;

/// Errors that can occur when building a state tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    /// Every declaration problem found, not just the first.
    #[error("Invalid state tree ({} problem(s)): {}", .0.len(), summarize(.0))]
    Invalid(Vec<DeclarationError>),
}

impl BuildError {
    /// Declaration problems carried by [`BuildError::Invalid`]; empty otherwise.
    pub fn declaration_errors(&self) -> &[DeclarationError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn summarize(errors: &[DeclarationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
