//! Immutable transition declarations.

use crate::core::{Condition, EntryMode, Event, StateId, StateIndex, TransitionKind};

/// One event-triggered edge of the state tree.
///
/// Transitions carry no behavior. The dispatch engine interprets the data;
/// guards and actions are symbolic names resolved at call time.
#[derive(Clone, Debug)]
pub struct Transition<S, E> {
    pub(crate) source: S,
    pub(crate) target: S,
    pub(crate) source_index: StateIndex,
    pub(crate) target_index: StateIndex,
    pub(crate) event: E,
    pub(crate) kind: TransitionKind,
    pub(crate) condition: Condition,
    pub(crate) priority: i32,
    pub(crate) actions: Vec<String>,
    pub(crate) entry_mode: EntryMode,
    /// Declaration position among the source's transitions.
    pub(crate) ordinal: usize,
}

impl<S: StateId, E: Event> Transition<S, E> {
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Declared target (equal to the source for self and internal transitions).
    pub fn target(&self) -> &S {
        &self.target
    }

    pub fn source_index(&self) -> StateIndex {
        self.source_index
    }

    pub fn target_index(&self) -> StateIndex {
        self.target_index
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Guard reference; `Display` yields a stable description.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Lower value wins when several transitions match.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Action names, executed in order between exit and entry.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.entry_mode
    }

    pub fn declaration_order(&self) -> usize {
        self.ordinal
    }

    pub fn is_self_transition(&self) -> bool {
        self.source_index == self.target_index
    }
}
