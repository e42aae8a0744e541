//! Builder for declaring transitions.

use crate::builder::error::BuildError;
use crate::core::{Condition, EntryMode, Event, StateId, TransitionKind};

/// A transition declaration not yet bound to a tree.
///
/// Produced by [`TransitionBuilder::build`]; the tree builder resolves
/// the source and target ids to arena indices.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionDecl<S, E> {
    pub(crate) source: S,
    pub(crate) target: S,
    pub(crate) event: E,
    pub(crate) kind: TransitionKind,
    pub(crate) condition: Condition,
    pub(crate) priority: i32,
    pub(crate) actions: Vec<String>,
    pub(crate) entry_mode: EntryMode,
}

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use statechart::builder::TransitionBuilder;
/// use statechart::core::TransitionKind;
///
/// let decl = TransitionBuilder::<String, &str>::new()
///     .from("Idle".to_string())
///     .to("Busy".to_string())
///     .on("submit")
///     .when("has_credit")
///     .priority(1)
///     .perform("charge")
///     .build()
///     .unwrap();
///
/// assert_eq!(decl.kind(), TransitionKind::External);
/// ```
pub struct TransitionBuilder<S, E> {
    source: Option<S>,
    target: Option<S>,
    event: Option<E>,
    kind: TransitionKind,
    condition: Condition,
    priority: i32,
    actions: Vec<String>,
    entry_mode: EntryMode,
}

impl<S: StateId, E: Event> TransitionBuilder<S, E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            source: None,
            target: None,
            event: None,
            kind: TransitionKind::External,
            condition: Condition::Always,
            priority: 0,
            actions: Vec::new(),
            entry_mode: EntryMode::History,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.source = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    pub fn kind(mut self, kind: TransitionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for an INTERNAL transition; the target is the source.
    pub fn internal(mut self) -> Self {
        self.kind = TransitionKind::Internal;
        if self.target.is_none() {
            self.target = self.source.clone();
        }
        self
    }

    pub fn local(self) -> Self {
        self.kind(TransitionKind::Local)
    }

    /// Guard on a registered predicate (optional).
    pub fn when(mut self, guard: impl Into<String>) -> Self {
        self.condition = Condition::named(guard);
        self
    }

    /// Guard on the negation of a registered predicate (optional).
    pub fn unless(mut self, guard: impl Into<String>) -> Self {
        self.condition = Condition::negated(guard);
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Lower values are tried first. Defaults to 0.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Append a registered action to run between exit and entry.
    pub fn perform(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn entry_mode(mut self, mode: EntryMode) -> Self {
        self.entry_mode = mode;
        self
    }

    /// Build the declaration.
    pub fn build(self) -> Result<TransitionDecl<S, E>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingFromState)?;
        let target = self.target.ok_or(BuildError::MissingToState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;

        Ok(TransitionDecl {
            source,
            target,
            event,
            kind: self.kind,
            condition: self.condition,
            priority: self.priority,
            actions: self.actions,
            entry_mode: self.entry_mode,
        })
    }
}

impl<S: StateId, E: Event> Default for TransitionBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E> TransitionDecl<S, E> {
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }
}
