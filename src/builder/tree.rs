//! Builder assembling a verified state tree.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::transition::{TransitionBuilder, TransitionDecl};
use crate::core::{CompositeType, Event, StateId, StateIndex};
use crate::model::{DeclarationError, StateNode, StateTree, Transition, Verification};
use std::collections::HashMap;
use stillwater::validation::Validation;

/// Builder for constructing state trees with a fluent API.
///
/// States may be declared in any order; hierarchy comes from
/// [`StateBuilder::parent`]. Children keep their declaration order, which
/// is the document order used for region ordering and export.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{StateBuilder, StateTreeBuilder, TransitionBuilder};
///
/// let s = |name: &str| name.to_string();
///
/// let tree = StateTreeBuilder::<String, &str>::new()
///     .state(StateBuilder::new(s("Root")).initial(s("A")))
///     .state(StateBuilder::new(s("A")).parent(s("Root")))
///     .state(StateBuilder::new(s("B")).parent(s("Root")))
///     .transition(TransitionBuilder::new().from(s("A")).to(s("B")).on("go"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(tree.len(), 3);
/// ```
pub struct StateTreeBuilder<S, E> {
    states: Vec<StateBuilder<S>>,
    transitions: Vec<TransitionDecl<S, E>>,
}

impl<S: StateId, E: Event> StateTreeBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn state(mut self, state: StateBuilder<S>) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder<S>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder is missing a required field.
    pub fn transition(mut self, builder: TransitionBuilder<S, E>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition declaration.
    pub fn add_transition(mut self, transition: TransitionDecl<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Link, index and verify the declaration.
    ///
    /// Returns every problem found, not just the first.
    pub fn build(self) -> Result<StateTree<S, E>, BuildError> {
        let (lookup, root) = self.index_states()?;
        let count = self.states.len();

        let parents: Vec<Option<StateIndex>> = self
            .states
            .iter()
            .map(|state| state.parent.as_ref().and_then(|p| lookup.get(p).copied()))
            .collect();

        let mut children: Vec<Vec<StateIndex>> = vec![Vec::new(); count];
        for (position, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[parent.0].push(StateIndex(position));
            }
        }

        let mut transitions: Vec<Vec<Transition<S, E>>> = (0..count).map(|_| Vec::new()).collect();
        for decl in self.transitions {
            let (Some(&source_index), Some(&target_index)) =
                (lookup.get(&decl.source), lookup.get(&decl.target))
            else {
                continue;
            };
            let outgoing = &mut transitions[source_index.0];
            let ordinal = outgoing.len();
            outgoing.push(Transition {
                source: decl.source,
                target: decl.target,
                source_index,
                target_index,
                event: decl.event,
                kind: decl.kind,
                condition: decl.condition,
                priority: decl.priority,
                actions: decl.actions,
                entry_mode: decl.entry_mode,
                ordinal,
            });
        }

        let nodes: Vec<StateNode<S, E>> = self
            .states
            .into_iter()
            .zip(children)
            .zip(transitions)
            .enumerate()
            .map(|(position, ((state, children), transitions))| {
                let composite = state.composite.unwrap_or(if children.is_empty() {
                    CompositeType::None
                } else {
                    CompositeType::Sequential
                });
                let initial = state.initial.as_ref().and_then(|i| lookup.get(i).copied());
                StateNode {
                    id: state.id,
                    index: StateIndex(position),
                    parent: parents[position],
                    children,
                    composite,
                    history: state.history,
                    initial,
                    entry_actions: state.entry_actions,
                    exit_actions: state.exit_actions,
                    transitions,
                    is_final: state.is_final,
                    level: level(&parents, position),
                    region: false,
                }
            })
            .collect();

        let tree = StateTree::from_nodes(nodes, root);
        into_result(tree.verify())?;

        tracing::debug!(
            root = tree.root_node().id().name(),
            states = tree.len(),
            "state tree built"
        );
        Ok(tree)
    }

    /// Assign arena indices and check every id reference resolves.
    fn index_states(&self) -> Result<(HashMap<S, StateIndex>, StateIndex), BuildError> {
        let mut checks: Vec<Verification> = Vec::new();
        let mut lookup: HashMap<S, StateIndex> = HashMap::with_capacity(self.states.len());

        if self.states.is_empty() {
            checks.push(Validation::fail(DeclarationError::Empty));
        }

        for (position, state) in self.states.iter().enumerate() {
            if lookup.contains_key(&state.id) {
                checks.push(Validation::fail(DeclarationError::DuplicateState {
                    state: state.id.name().to_string(),
                }));
            } else {
                lookup.insert(state.id.clone(), StateIndex(position));
            }
        }

        let known = |id: &S, by: &str| {
            if lookup.contains_key(id) {
                Validation::success(())
            } else {
                Validation::fail(DeclarationError::UnknownState {
                    referenced: id.name().to_string(),
                    by: by.to_string(),
                })
            }
        };

        for state in &self.states {
            let by = state.id.name();
            if let Some(parent) = &state.parent {
                checks.push(known(parent, by));
            }
            if let Some(initial) = &state.initial {
                checks.push(known(initial, by));
            }
        }
        for decl in &self.transitions {
            let by = format!("transition on '{}'", decl.event.name());
            checks.push(known(&decl.source, &by));
            checks.push(known(&decl.target, &by));
        }

        let roots: Vec<usize> = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.parent.is_none())
            .map(|(position, _)| position)
            .collect();
        match roots.as_slice() {
            [] if !self.states.is_empty() => checks.push(Validation::fail(DeclarationError::NoRoot)),
            [] | [_] => {}
            _ => checks.push(Validation::fail(DeclarationError::MultipleRoots {
                roots: roots
                    .iter()
                    .map(|&position| self.states[position].id.name().to_string())
                    .collect(),
            })),
        }

        into_result(Validation::all_vec(checks).map(|_| ()))?;
        let root = roots.first().copied().map(StateIndex).ok_or_else(|| {
            BuildError::Invalid(vec![DeclarationError::NoRoot])
        })?;
        Ok((lookup, root))
    }
}

impl<S: StateId, E: Event> Default for StateTreeBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth below the root; 0 when the parent chain never terminates.
fn level(parents: &[Option<StateIndex>], position: usize) -> usize {
    let mut depth = 0;
    let mut current = position;
    while let Some(parent) = parents[current] {
        depth += 1;
        if depth > parents.len() {
            return 0;
        }
        current = parent.0;
    }
    depth
}

fn into_result(verification: Verification) -> Result<(), BuildError> {
    match verification {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(BuildError::Invalid(errors.iter().cloned().collect())),
    }
}
