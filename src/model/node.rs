//! State nodes stored in the tree arena.

use super::error::DeclarationError;
use super::transition::Transition;
use crate::core::{CompositeType, Event, HistoryType, StateId, StateIndex, TransitionKind};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of a declaration check; accumulates every failure.
pub type Verification = Validation<(), NonEmptyVec<DeclarationError>>;

pub(crate) fn check(ok: bool, error: impl FnOnce() -> DeclarationError) -> Verification {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

/// Immutable description of one state.
///
/// Hierarchy links are arena indices into the owning
/// [`StateTree`](super::StateTree); the tree owns every node.
#[derive(Clone, Debug)]
pub struct StateNode<S, E> {
    pub(crate) id: S,
    pub(crate) index: StateIndex,
    pub(crate) parent: Option<StateIndex>,
    pub(crate) children: Vec<StateIndex>,
    pub(crate) composite: CompositeType,
    pub(crate) history: HistoryType,
    pub(crate) initial: Option<StateIndex>,
    pub(crate) entry_actions: Vec<String>,
    pub(crate) exit_actions: Vec<String>,
    pub(crate) transitions: Vec<Transition<S, E>>,
    pub(crate) is_final: bool,
    pub(crate) level: usize,
    pub(crate) region: bool,
}

impl<S: StateId, E: Event> StateNode<S, E> {
    pub fn id(&self) -> &S {
        &self.id
    }

    pub fn index(&self) -> StateIndex {
        self.index
    }

    pub fn parent(&self) -> Option<StateIndex> {
        self.parent
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[StateIndex] {
        &self.children
    }

    pub fn composite_type(&self) -> CompositeType {
        self.composite
    }

    pub fn history_type(&self) -> HistoryType {
        self.history
    }

    pub fn initial_child(&self) -> Option<StateIndex> {
        self.initial
    }

    pub fn entry_actions(&self) -> &[String] {
        &self.entry_actions
    }

    pub fn exit_actions(&self) -> &[String] {
        &self.exit_actions
    }

    /// Every outgoing transition in declaration order.
    pub fn all_transitions(&self) -> &[Transition<S, E>] {
        &self.transitions
    }

    /// Candidates for `event` declared on this node only.
    ///
    /// Ordered by priority ascending; ties keep declaration order.
    pub fn transitions(&self, event: &E) -> Vec<&Transition<S, E>> {
        let mut candidates: Vec<&Transition<S, E>> = self
            .transitions
            .iter()
            .filter(|t| t.event == *event)
            .collect();
        candidates.sort_by_key(|t| t.priority);
        candidates
    }

    /// Events with at least one transition declared on this node.
    ///
    /// Ancestors are not consulted. Order follows first declaration.
    pub fn acceptable_events(&self) -> Vec<&E> {
        let mut seen = HashSet::new();
        self.transitions
            .iter()
            .map(|t| &t.event)
            .filter(|event| seen.insert(*event))
            .collect()
    }

    pub fn accepts(&self, event: &E) -> bool {
        self.transitions.iter().any(|t| t.event == *event)
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Depth in the tree; the root is level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_parallel(&self) -> bool {
        self.composite == CompositeType::Parallel
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this state is an orthogonal region, i.e. a child of a
    /// parallel state.
    pub fn is_region(&self) -> bool {
        self.region
    }

    /// Check the invariants that only need this node's own data.
    pub fn verify(&self) -> Verification {
        let name = || self.id.name().to_string();
        let mut checks = Vec::new();

        match self.composite {
            CompositeType::None => {
                checks.push(check(self.children.is_empty(), || {
                    DeclarationError::BrokenHierarchy { state: name() }
                }));
                checks.push(check(self.initial.is_none(), || {
                    DeclarationError::InitialOnLeaf { state: name() }
                }));
            }
            CompositeType::Sequential => {
                checks.push(check(!self.children.is_empty(), || {
                    DeclarationError::EmptyComposite { state: name() }
                }));
                checks.push(check(self.initial.is_some(), || {
                    DeclarationError::MissingInitialChild { state: name() }
                }));
            }
            CompositeType::Parallel => {
                checks.push(check(!self.children.is_empty(), || {
                    DeclarationError::EmptyComposite { state: name() }
                }));
            }
        }

        if self.is_final {
            checks.push(check(self.children.is_empty(), || {
                DeclarationError::FinalWithChildren { state: name() }
            }));
            checks.push(check(self.transitions.is_empty(), || {
                DeclarationError::FinalWithTransitions { state: name() }
            }));
        }

        let mut keys = HashSet::new();
        for transition in &self.transitions {
            let event = || transition.event.name().to_string();
            checks.push(check(keys.insert((&transition.event, transition.priority)), || {
                DeclarationError::DuplicateTransition {
                    state: name(),
                    event: event(),
                    priority: transition.priority,
                }
            }));
            checks.push(check(transition.source_index == self.index, || {
                DeclarationError::MisplacedTransition {
                    owner: name(),
                    event: event(),
                    origin: transition.source.name().to_string(),
                }
            }));
            if transition.kind == TransitionKind::Internal {
                checks.push(check(transition.is_self_transition(), || {
                    DeclarationError::InternalTargetMismatch {
                        state: name(),
                        event: event(),
                        target: transition.target.name().to_string(),
                    }
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}
