//! Builder for declaring states.

use crate::core::{CompositeType, HistoryType, StateId};

/// Declaration of one state node.
///
/// The composite type is inferred when not set: a state with children is
/// `Sequential`, one without is a leaf.
///
/// # Example
///
/// ```rust
/// use statechart::builder::StateBuilder;
/// use statechart::core::HistoryType;
///
/// let playing = StateBuilder::new("Playing".to_string())
///     .parent("On".to_string())
///     .initial("Normal".to_string())
///     .history(HistoryType::Deep)
///     .on_entry("start_clock");
/// ```
#[derive(Clone, Debug)]
pub struct StateBuilder<S> {
    pub(crate) id: S,
    pub(crate) parent: Option<S>,
    pub(crate) composite: Option<CompositeType>,
    pub(crate) history: HistoryType,
    pub(crate) initial: Option<S>,
    pub(crate) entry_actions: Vec<String>,
    pub(crate) exit_actions: Vec<String>,
    pub(crate) is_final: bool,
}

impl<S: StateId> StateBuilder<S> {
    pub fn new(id: S) -> Self {
        Self {
            id,
            parent: None,
            composite: None,
            history: HistoryType::None,
            initial: None,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            is_final: false,
        }
    }

    /// Nest this state under `parent`. Exactly one declared state has none.
    pub fn parent(mut self, parent: S) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn composite(mut self, composite: CompositeType) -> Self {
        self.composite = Some(composite);
        self
    }

    /// Mark as a parallel composite: every child is an orthogonal region.
    pub fn parallel(self) -> Self {
        self.composite(CompositeType::Parallel)
    }

    pub fn history(mut self, history: HistoryType) -> Self {
        self.history = history;
        self
    }

    /// Child entered when this sequential composite is entered without history.
    pub fn initial(mut self, child: S) -> Self {
        self.initial = Some(child);
        self
    }

    /// Append a registered action run when the state is entered.
    pub fn on_entry(mut self, action: impl Into<String>) -> Self {
        self.entry_actions.push(action.into());
        self
    }

    /// Append a registered action run when the state is exited.
    pub fn on_exit(mut self, action: impl Into<String>) -> Self {
        self.exit_actions.push(action.into());
        self
    }

    pub fn final_state(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn id(&self) -> &S {
        &self.id
    }
}
