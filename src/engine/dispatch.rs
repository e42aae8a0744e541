//! Event resolution: transition selection, exit/entry sets, history.
//!
//! A [`Dispatcher`] borrows one machine's mutable memory (active flags,
//! history records, transition log) next to the shared tree and registry,
//! and lives for a single `fire` or `start` call.
//!
//! Selection evaluates every guard before anything is exited, so a guard
//! failure leaves the configuration untouched. Execution then runs each
//! selected transition as exit → transition actions → entry, innermost
//! exits first and outermost entries first.

use super::error::{ActionPhase, FireError};
use crate::context::{ExecutionContext, StateContext};
use crate::core::{
    CompositeType, EntryMode, Event, HistoryRecord, HistoryStore, HistoryType, StateId,
    StateIndex, TransitionKind, TransitionLog, TransitionRecord,
};
use crate::model::{StateTree, Transition};
use chrono::Utc;
use std::collections::HashMap;

/// Active leaves at or below `from`, in document order.
pub(crate) fn active_leaves<S: StateId, E: Event>(
    tree: &StateTree<S, E>,
    active: &[bool],
    from: StateIndex,
) -> Vec<StateIndex> {
    let mut leaves = Vec::new();
    if active[from.0] {
        collect_leaves(tree, active, from, &mut leaves);
    }
    leaves
}

fn collect_leaves<S: StateId, E: Event>(
    tree: &StateTree<S, E>,
    active: &[bool],
    state: StateIndex,
    out: &mut Vec<StateIndex>,
) {
    let mut has_active_child = false;
    for &child in tree.node(state).children() {
        if active[child.0] {
            has_active_child = true;
            collect_leaves(tree, active, child, out);
        }
    }
    if !has_active_child {
        out.push(state);
    }
}

pub(crate) struct Dispatcher<'m, S: StateId, E, C> {
    pub(crate) tree: &'m StateTree<S, E>,
    pub(crate) registry: &'m ExecutionContext<S, E, C>,
    pub(crate) active: &'m mut Vec<bool>,
    pub(crate) history: &'m mut HistoryStore,
    pub(crate) log: Option<&'m mut TransitionLog<S>>,
}

impl<'m, S: StateId, E: Event, C> Dispatcher<'m, S, E, C> {
    /// Resolve `event` against the active configuration and run every
    /// selected transition. Sets `ctx.accepted` when anything was selected.
    pub(crate) fn internal_fire(
        &mut self,
        event: &E,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let selected = self.select(event, ctx)?;
        if selected.is_empty() {
            tracing::debug!(
                machine_id = %ctx.machine_id(),
                event = event.name(),
                "event ignored"
            );
            return Ok(());
        }

        ctx.accept();
        for transition in selected {
            self.execute(transition, ctx)?;
        }
        Ok(())
    }

    /// Pick at most one transition per active region.
    ///
    /// Each active leaf walks upward; the first state with a passing guard
    /// wins for that leaf. Outer selections preempted by an inner one are
    /// dropped.
    fn select(
        &self,
        event: &E,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<Vec<&'m Transition<S, E>>, FireError> {
        let tree = self.tree;
        let mut evaluated: HashMap<StateIndex, Option<&'m Transition<S, E>>> = HashMap::new();
        let mut selected: Vec<&'m Transition<S, E>> = Vec::new();

        for leaf in active_leaves(tree, self.active.as_slice(), tree.root()) {
            let mut current = Some(leaf);
            while let Some(state) = current {
                let choice = match evaluated.get(&state) {
                    Some(choice) => *choice,
                    None => {
                        let choice = self.choose(state, event, ctx)?;
                        evaluated.insert(state, choice);
                        choice
                    }
                };
                if let Some(transition) = choice {
                    if !selected
                        .iter()
                        .any(|t| t.source_index == transition.source_index)
                    {
                        selected.push(transition);
                    }
                    break;
                }
                current = tree.parent(state);
            }
        }

        let sources: Vec<StateIndex> = selected.iter().map(|t| t.source_index).collect();
        selected.retain(|t| {
            !sources
                .iter()
                .any(|&inner| tree.is_descendant(inner, t.source_index))
        });
        Ok(selected)
    }

    /// First transition on `state` for `event` whose guard passes.
    fn choose(
        &self,
        state: StateIndex,
        event: &E,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<Option<&'m Transition<S, E>>, FireError> {
        let tree = self.tree;
        for transition in tree.node(state).transitions(event) {
            ctx.set_route(
                Some(transition.source.clone()),
                Some(transition.target.clone()),
            );
            let passed = self
                .registry
                .evaluate(&transition.condition, ctx)
                .map_err(|cause| {
                    tracing::warn!(
                        machine_id = %ctx.machine_id(),
                        state = transition.source.name(),
                        event = event.name(),
                        condition = %transition.condition,
                        error = %cause,
                        "guard evaluation failed"
                    );
                    FireError::GuardEvaluation {
                        state: transition.source.name().to_string(),
                        event: event.name().to_string(),
                        condition: transition.condition.to_string(),
                        cause,
                    }
                })?;
            if passed {
                return Ok(Some(transition));
            }
        }
        Ok(None)
    }

    fn execute(
        &mut self,
        transition: &'m Transition<S, E>,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        if !self.active[transition.source_index.0] {
            tracing::debug!(
                machine_id = %ctx.machine_id(),
                source = transition.source.name(),
                target = transition.target.name(),
                "transition skipped, source exited by an earlier region"
            );
            return Ok(());
        }

        ctx.set_route(
            Some(transition.source.clone()),
            Some(transition.target.clone()),
        );

        match transition.kind {
            TransitionKind::Internal => {
                self.run_transition_actions(transition, ctx)?;
            }
            TransitionKind::External | TransitionKind::Local => {
                let domain = self.domain(transition);
                let scope = self.scope(domain, transition);
                self.exit_scope(&scope, ctx)?;
                self.run_transition_actions(transition, ctx)?;
                self.enter_scope(domain, &scope, transition, ctx)?;
            }
        }

        tracing::debug!(
            machine_id = %ctx.machine_id(),
            event = transition.event.name(),
            source = transition.source.name(),
            target = transition.target.name(),
            kind = %transition.kind,
            "transition executed"
        );

        if let Some(log) = self.log.as_deref_mut() {
            log.record(TransitionRecord {
                source: transition.source.clone(),
                target: transition.target.clone(),
                event: transition.event.name().to_string(),
                kind: transition.kind,
                timestamp: Utc::now(),
            });
        }
        Ok(())
    }

    /// The state that stays active across the transition, or `None` when
    /// even the root is exited and re-entered.
    fn domain(&self, transition: &Transition<S, E>) -> Option<StateIndex> {
        let source = transition.source_index;
        let target = transition.target_index;
        let lca = self.tree.lca(source, target);
        match transition.kind {
            TransitionKind::External if lca == source || lca == target => self.tree.parent(lca),
            _ => Some(lca),
        }
    }

    /// Subtrees exited and re-entered by a transition with `domain`.
    ///
    /// Below a sequential domain that is its single active child. Below a
    /// parallel domain it is every region holding the source or target, or
    /// all regions when the domain itself is the target.
    fn scope(
        &self,
        domain: Option<StateIndex>,
        transition: &Transition<S, E>,
    ) -> Vec<StateIndex> {
        let tree = self.tree;
        let Some(domain) = domain else {
            return vec![tree.root()];
        };
        let node = tree.node(domain);
        if !node.is_parallel() || transition.target_index == domain {
            return node.children().to_vec();
        }
        let touched: Vec<StateIndex> = node
            .children()
            .iter()
            .copied()
            .filter(|&region| {
                tree.is_ancestor_or_self(region, transition.source_index)
                    || tree.is_ancestor_or_self(region, transition.target_index)
            })
            .collect();
        if touched.is_empty() {
            node.children().to_vec()
        } else {
            touched
        }
    }

    fn exit_scope(
        &mut self,
        scope: &[StateIndex],
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        for &state in scope.iter().rev() {
            if self.active[state.0] {
                self.exit_subtree(state, ctx)?;
            }
        }
        Ok(())
    }

    fn enter_scope(
        &mut self,
        domain: Option<StateIndex>,
        scope: &[StateIndex],
        transition: &Transition<S, E>,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let mode = transition.entry_mode;
        let path = tree.path_from(domain, transition.target_index);
        let Some(domain) = domain else {
            return self.enter_path(&path, mode, ctx);
        };
        let Some(&first) = path.first() else {
            // Target is the domain: its exited children come back per `mode`.
            return self.descend(domain, mode, ctx);
        };

        if tree.node(domain).is_parallel() {
            for &region in scope {
                if region == first {
                    self.enter_path(&path, mode, ctx)?;
                } else {
                    self.enter_by_history(region, ctx)?;
                }
            }
            Ok(())
        } else {
            self.enter_path(&path, mode, ctx)
        }
    }

    /// Enter each state on `path` top-down; the last one descends per `mode`.
    /// Sibling regions of parallel states on the path are entered by history.
    fn enter_path(
        &mut self,
        path: &[StateIndex],
        mode: EntryMode,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let Some((&first, rest)) = path.split_first() else {
            return Ok(());
        };
        let Some(&next) = rest.first() else {
            return match mode {
                EntryMode::History => self.enter_by_history(first, ctx),
                EntryMode::Shallow => self.enter_shallow(first, ctx),
                EntryMode::Deep => self.enter_deep(first, ctx),
            };
        };

        self.entry(first, ctx)?;
        let node = tree.node(first);
        if node.is_parallel() {
            for &region in node.children() {
                if region == next {
                    self.enter_path(rest, mode, ctx)?;
                } else {
                    self.enter_by_history(region, ctx)?;
                }
            }
            Ok(())
        } else {
            self.enter_path(rest, mode, ctx)
        }
    }

    fn enter_shallow(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        self.enter(state, EntryMode::Shallow, ctx)
    }

    fn enter_deep(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        self.enter(state, EntryMode::Deep, ctx)
    }

    pub(crate) fn enter_by_history(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        self.enter(state, EntryMode::History, ctx)
    }

    fn enter(
        &mut self,
        state: StateIndex,
        mode: EntryMode,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        self.entry(state, ctx)?;
        self.descend(state, mode, ctx)
    }

    /// Enter the children of an already-entered `state`.
    fn descend(
        &mut self,
        state: StateIndex,
        mode: EntryMode,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let node = tree.node(state);
        match mode {
            EntryMode::Shallow => self.descend_shallow(state, ctx),
            EntryMode::Deep => self.descend_deep(state, &[], ctx),
            EntryMode::History => match node.history_type() {
                HistoryType::None => self.descend_shallow(state, ctx),
                HistoryType::Shallow => {
                    let remembered = match node.composite_type() {
                        CompositeType::Sequential => self.history.shallow(state),
                        _ => None,
                    };
                    match remembered {
                        Some(child) => self.enter_shallow(child, ctx),
                        None => self.descend_shallow(state, ctx),
                    }
                }
                HistoryType::Deep => self.descend_deep(state, &[], ctx),
            },
        }
    }

    fn descend_shallow(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let node = tree.node(state);
        match node.composite_type() {
            CompositeType::None => Ok(()),
            CompositeType::Sequential => match node.initial_child() {
                Some(initial) => self.enter_shallow(initial, ctx),
                None => Ok(()),
            },
            CompositeType::Parallel => {
                for &region in node.children() {
                    self.enter_shallow(region, ctx)?;
                }
                Ok(())
            }
        }
    }

    /// Restore the leaves remembered along this branch, falling back to
    /// initial children where nothing was recorded.
    fn descend_deep(
        &mut self,
        state: StateIndex,
        inherited: &[StateIndex],
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let node = tree.node(state);

        let mut leaves: Vec<StateIndex> = inherited
            .iter()
            .copied()
            .filter(|&leaf| tree.is_descendant(leaf, state))
            .collect();
        if leaves.is_empty() && node.history_type() == HistoryType::Deep {
            if let Some(recorded) = self.history.deep(state) {
                leaves = recorded
                    .iter()
                    .copied()
                    .filter(|&leaf| tree.is_descendant(leaf, state))
                    .collect();
            }
        }

        match node.composite_type() {
            CompositeType::None => Ok(()),
            CompositeType::Parallel => {
                for &region in node.children() {
                    self.entry(region, ctx)?;
                    self.descend_deep(region, &leaves, ctx)?;
                }
                Ok(())
            }
            CompositeType::Sequential => {
                let remembered = node.children().iter().copied().find(|&child| {
                    leaves
                        .iter()
                        .any(|&leaf| tree.is_ancestor_or_self(child, leaf))
                });
                match remembered.or(node.initial_child()) {
                    Some(child) => {
                        self.entry(child, ctx)?;
                        self.descend_deep(child, &leaves, ctx)
                    }
                    None => Ok(()),
                }
            }
        }
    }

    fn exit_subtree(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        self.record_history(state);
        for &child in tree.node(state).children().iter().rev() {
            if self.active[child.0] {
                self.exit_subtree(child, ctx)?;
            }
        }
        self.exit(state, ctx)
    }

    fn record_history(&mut self, state: StateIndex) {
        let tree = self.tree;
        let node = tree.node(state);
        let record = match (node.history_type(), node.composite_type()) {
            (HistoryType::Shallow, CompositeType::Sequential) => node
                .children()
                .iter()
                .copied()
                .find(|child| self.active[child.0])
                .map(HistoryRecord::Shallow),
            (HistoryType::Deep, CompositeType::Sequential | CompositeType::Parallel) => {
                let leaves = active_leaves(tree, self.active.as_slice(), state);
                match leaves.as_slice() {
                    [only] if *only == state => None,
                    _ => Some(HistoryRecord::Deep(leaves)),
                }
            }
            _ => None,
        };
        if let Some(record) = record {
            self.history.write(state, record);
        }
    }

    /// Mark `state` active and run its entry actions in order.
    fn entry(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let node = tree.node(state);
        tracing::trace!(machine_id = %ctx.machine_id(), state = node.id().name(), "entry");
        self.active[state.0] = true;
        for action in node.entry_actions() {
            self.run_action(node.id(), action, ActionPhase::Entry, ctx)?;
        }
        Ok(())
    }

    /// Run exit actions in order, then mark `state` inactive.
    fn exit(
        &mut self,
        state: StateIndex,
        ctx: &mut StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        let tree = self.tree;
        let node = tree.node(state);
        tracing::trace!(machine_id = %ctx.machine_id(), state = node.id().name(), "exit");
        for action in node.exit_actions() {
            self.run_action(node.id(), action, ActionPhase::Exit, ctx)?;
        }
        self.active[state.0] = false;
        Ok(())
    }

    fn run_transition_actions(
        &self,
        transition: &Transition<S, E>,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        for action in &transition.actions {
            self.run_action(&transition.source, action, ActionPhase::Transition, ctx)?;
        }
        Ok(())
    }

    fn run_action(
        &self,
        state: &S,
        action: &str,
        phase: ActionPhase,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<(), FireError> {
        self.registry.invoke_action(action, ctx).map_err(|cause| {
            tracing::warn!(
                machine_id = %ctx.machine_id(),
                state = state.name(),
                action,
                %phase,
                error = %cause,
                "action failed"
            );
            FireError::ActionExecution {
                state: state.name().to_string(),
                action: action.to_string(),
                phase,
                cause,
            }
        })
    }
}
