//! Registry resolving symbolic action and guard names.

use super::error::{BehaviorError, BehaviorKind};
use super::state_context::StateContext;
use crate::core::Condition;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered action behavior.
pub type ActionFn<S, E, C> =
    Arc<dyn Fn(&StateContext<'_, S, E, C>) -> Result<(), BehaviorError> + Send + Sync>;

/// Registered guard behavior.
pub type GuardFn<S, E, C> =
    Arc<dyn Fn(&StateContext<'_, S, E, C>) -> Result<bool, BehaviorError> + Send + Sync>;

/// Name → behavior registry consulted on every dispatch.
///
/// Populated once before a machine runs and never mutated while it
/// dispatches. Names are resolved at call time, so a declaration can be
/// paired with a different registry per machine instance (e.g. fakes in
/// tests).
///
/// # Example
///
/// ```rust
/// use statechart::context::ExecutionContext;
///
/// let context: ExecutionContext<String, String, u32> = ExecutionContext::new()
///     .with_guard("positive", |ctx| Ok(*ctx.payload() > 0))
///     .with_action("noop", |_ctx| Ok(()));
///
/// assert!(context.has_guard("positive"));
/// assert!(context.has_action("noop"));
/// ```
pub struct ExecutionContext<S, E, C> {
    actions: HashMap<String, ActionFn<S, E, C>>,
    guards: HashMap<String, GuardFn<S, E, C>>,
}

impl<S, E, C> ExecutionContext<S, E, C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Register an action, replacing any previous behavior under `name`.
    pub fn with_action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&StateContext<'_, S, E, C>) -> Result<(), BehaviorError> + Send + Sync + 'static,
    {
        self.register_action(name, action);
        self
    }

    /// Register a guard, replacing any previous behavior under `name`.
    pub fn with_guard<F>(mut self, name: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&StateContext<'_, S, E, C>) -> Result<bool, BehaviorError> + Send + Sync + 'static,
    {
        self.register_guard(name, guard);
        self
    }

    pub fn register_action<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&StateContext<'_, S, E, C>) -> Result<(), BehaviorError> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
    }

    pub fn register_guard<F>(&mut self, name: impl Into<String>, guard: F)
    where
        F: Fn(&StateContext<'_, S, E, C>) -> Result<bool, BehaviorError> + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Arc::new(guard));
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    /// Resolve `name` and run it.
    pub fn invoke_action(
        &self,
        name: &str,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<(), BehaviorError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| BehaviorError::Unresolved {
                kind: BehaviorKind::Action,
                name: name.to_string(),
            })?;
        action(ctx)
    }

    /// Evaluate a condition; `Condition::Always` never touches the registry.
    pub fn evaluate(
        &self,
        condition: &Condition,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<bool, BehaviorError> {
        let Some(name) = condition.guard_name() else {
            return Ok(true);
        };
        let guard = self
            .guards
            .get(name)
            .ok_or_else(|| BehaviorError::Unresolved {
                kind: BehaviorKind::Guard,
                name: name.to_string(),
            })?;
        Ok(condition.apply(guard(ctx)?))
    }
}

impl<S, E, C> Default for ExecutionContext<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E, C> std::fmt::Debug for ExecutionContext<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut actions: Vec<&String> = self.actions.keys().collect();
        let mut guards: Vec<&String> = self.guards.keys().collect();
        actions.sort();
        guards.sort();
        f.debug_struct("ExecutionContext")
            .field("actions", &actions)
            .field("guards", &guards)
            .finish()
    }
}
