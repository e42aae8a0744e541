//! Serializable structural outline of a state tree.

use super::{walk, Visitor};
use crate::core::{
    CompositeType, Condition, EntryMode, Event, HistoryType, StateId, TransitionKind,
};
use crate::model::{StateNode, StateTree, Transition};
use serde::{Deserialize, Serialize};

/// One transition as plain data. The event is kept by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutline<S> {
    pub event: String,
    pub target: S,
    pub priority: i32,
    pub kind: TransitionKind,
    pub condition: Condition,
    pub actions: Vec<String>,
    pub entry_mode: EntryMode,
}

/// One state as plain data, with its outgoing transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateOutline<S> {
    pub id: S,
    pub parent: Option<S>,
    pub composite: CompositeType,
    pub history: HistoryType,
    pub initial: Option<S>,
    pub is_final: bool,
    pub entry_actions: Vec<String>,
    pub exit_actions: Vec<String>,
    pub transitions: Vec<TransitionOutline<S>>,
}

/// States in visit (document) order.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{StateBuilder, StateTreeBuilder};
/// use statechart::visitor::ModelOutline;
///
/// let tree = StateTreeBuilder::<String, &str>::new()
///     .state(StateBuilder::new("Root".to_string()))
///     .build()
///     .unwrap();
///
/// let outline = ModelOutline::of(&tree);
/// let json = outline.to_json().unwrap();
/// assert_eq!(ModelOutline::from_json(&json).unwrap(), outline);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelOutline<S> {
    pub root: S,
    pub states: Vec<StateOutline<S>>,
}

impl<S: StateId> ModelOutline<S> {
    /// Outline `tree` by walking it with an [`OutlineVisitor`].
    pub fn of<E: Event>(tree: &StateTree<S, E>) -> Self {
        let mut visitor = OutlineVisitor::new();
        walk(tree, &mut visitor);
        visitor.into_outline().unwrap_or_else(|| Self {
            root: tree.root_node().id().clone(),
            states: Vec::new(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn state(&self, id: &S) -> Option<&StateOutline<S>> {
        self.states.iter().find(|state| &state.id == id)
    }
}

/// Visitor collecting a [`ModelOutline`].
pub struct OutlineVisitor<S> {
    root: Option<S>,
    states: Vec<StateOutline<S>>,
}

impl<S: StateId> OutlineVisitor<S> {
    pub fn new() -> Self {
        Self {
            root: None,
            states: Vec::new(),
        }
    }

    /// The collected outline, or `None` if nothing was visited.
    pub fn into_outline(self) -> Option<ModelOutline<S>> {
        Some(ModelOutline {
            root: self.root?,
            states: self.states,
        })
    }
}

impl<S: StateId> Default for OutlineVisitor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, E: Event> Visitor<S, E> for OutlineVisitor<S> {
    fn visit_machine_entry(&mut self, tree: &StateTree<S, E>) {
        self.root = Some(tree.root_node().id().clone());
        self.states.clear();
    }

    fn visit_state_entry(&mut self, tree: &StateTree<S, E>, state: &StateNode<S, E>) {
        self.states.push(StateOutline {
            id: state.id().clone(),
            parent: state.parent().map(|index| tree.id(index).clone()),
            composite: state.composite_type(),
            history: state.history_type(),
            initial: state.initial_child().map(|index| tree.id(index).clone()),
            is_final: state.is_final(),
            entry_actions: state.entry_actions().to_vec(),
            exit_actions: state.exit_actions().to_vec(),
            transitions: Vec::new(),
        });
    }

    fn visit_transition_entry(&mut self, _tree: &StateTree<S, E>, edge: &Transition<S, E>) {
        // Transitions are visited right after their owning state.
        let Some(owner) = self.states.last_mut() else {
            return;
        };
        owner.transitions.push(TransitionOutline {
            event: edge.event().name().to_string(),
            target: edge.target().clone(),
            priority: edge.priority(),
            kind: edge.kind(),
            condition: edge.condition().clone(),
            actions: edge.actions().to_vec(),
            entry_mode: edge.entry_mode(),
        });
    }
}
