//! State machine instance driving one active configuration.

use super::config::MachineConfig;
use super::dispatch::{active_leaves, Dispatcher};
use super::error::FireError;
use crate::context::{ExecutionContext, StateContext};
use crate::core::{Event, HistoryRecord, HistoryStore, StateId, TransitionLog};
use crate::model::StateTree;
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle of a machine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineStatus {
    /// No active configuration; `start` (or an auto-starting `fire`) enters it.
    Idle,
    Running,
    /// An action failed mid-dispatch; the configuration may be inconsistent.
    Faulted,
}

/// One running instance of a declared state tree.
///
/// The tree and the registry are shared (`Arc`) and read-only; the active
/// configuration, history records and transition log belong to this
/// instance alone. Dispatch is synchronous and takes `&mut self`, so one
/// event runs to completion before the next is accepted.
pub struct StateMachine<S: StateId, E: Event, C> {
    id: Uuid,
    tree: Arc<StateTree<S, E>>,
    context: Arc<ExecutionContext<S, E, C>>,
    config: MachineConfig,
    active: Vec<bool>,
    history: HistoryStore,
    log: TransitionLog<S>,
    status: MachineStatus,
}

impl<S: StateId, E: Event, C> StateMachine<S, E, C> {
    /// Create an idle machine with the default configuration.
    pub fn new(tree: Arc<StateTree<S, E>>, context: Arc<ExecutionContext<S, E, C>>) -> Self {
        Self::with_config(tree, context, MachineConfig::default())
    }

    pub fn with_config(
        tree: Arc<StateTree<S, E>>,
        context: Arc<ExecutionContext<S, E, C>>,
        config: MachineConfig,
    ) -> Self {
        let log = match config.transition_log_limit {
            Some(limit) => TransitionLog::bounded(limit),
            None => TransitionLog::new(),
        };
        Self {
            id: Uuid::new_v4(),
            active: vec![false; tree.len()],
            tree,
            context,
            config,
            history: HistoryStore::new(),
            log,
            status: MachineStatus::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tree(&self) -> &Arc<StateTree<S, E>> {
        &self.tree
    }

    pub fn context(&self) -> &Arc<ExecutionContext<S, E, C>> {
        &self.context
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn transition_log(&self) -> &TransitionLog<S> {
        &self.log
    }

    /// Enter the declared initial configuration.
    ///
    /// Does nothing unless the machine is idle.
    pub fn start(&mut self, payload: &C) -> Result<(), FireError> {
        if self.status != MachineStatus::Idle {
            return Ok(());
        }
        tracing::debug!(machine_id = %self.id, root = self.tree.root_node().id().name(), "starting");

        let mut ctx = StateContext::new(self.id, None, payload);
        let root = self.tree.root();
        let result = self.dispatcher().enter_by_history(root, &mut ctx);
        self.settle(result)
    }

    /// Dispatch `event` and report whether any transition fired.
    ///
    /// An event no active state accepts is a silent no-op. Errors follow the
    /// no-rollback policy described on [`FireError`].
    pub fn fire(&mut self, event: E, payload: &C) -> Result<bool, FireError> {
        if self.status == MachineStatus::Idle {
            if !self.config.auto_start {
                tracing::debug!(
                    machine_id = %self.id,
                    event = event.name(),
                    "event ignored, machine not started"
                );
                return Ok(false);
            }
            self.start(payload)?;
        }

        let mut ctx = StateContext::new(self.id, Some(event.clone()), payload);
        let result = self.dispatcher().internal_fire(&event, &mut ctx);
        self.settle(result)?;
        Ok(ctx.is_accepted())
    }

    /// Return to the declared initial configuration.
    ///
    /// Every history record and the transition log are discarded first, so
    /// the root is entered as on a fresh `start`; its entry actions run. No
    /// exit actions run for the configuration being abandoned.
    pub fn reset(&mut self, payload: &C) -> Result<(), FireError> {
        self.clear();
        self.start(payload)
    }

    /// Drop the active configuration, history and log without running any
    /// action, leaving the machine `Idle`.
    pub fn clear(&mut self) {
        tracing::debug!(machine_id = %self.id, "clear");
        self.active.iter_mut().for_each(|flag| *flag = false);
        self.history.clear();
        self.log.clear();
        self.status = MachineStatus::Idle;
    }

    /// Active leaf states, one per active region, in document order.
    pub fn active_states(&self) -> Vec<S> {
        active_leaves(&self.tree, &self.active, self.tree.root())
            .into_iter()
            .map(|index| self.tree.id(index).clone())
            .collect()
    }

    /// Whether `id` is active, as a leaf or as an ancestor of one.
    pub fn is_active(&self, id: &S) -> bool {
        self.tree
            .index_of(id)
            .is_some_and(|index| self.active[index.get()])
    }

    pub fn is_final_state(&self, id: &S) -> bool {
        self.tree.get(id).is_some_and(|node| node.is_final())
    }

    /// Whether every active leaf is a final state.
    pub fn is_completed(&self) -> bool {
        let leaves = active_leaves(&self.tree, &self.active, self.tree.root());
        !leaves.is_empty()
            && leaves
                .iter()
                .all(|&index| self.tree.node(index).is_final())
    }

    /// Events some active state (leaf or ancestor) declares a transition for.
    pub fn acceptable_events(&self) -> Vec<E> {
        let mut events: Vec<E> = Vec::new();
        for &index in self.tree.document_order() {
            if !self.active[index.get()] {
                continue;
            }
            for event in self.tree.node(index).acceptable_events() {
                if !events.contains(event) {
                    events.push(event.clone());
                }
            }
        }
        events
    }

    /// Whether some active state declares a transition for `event`.
    ///
    /// Guards are not evaluated.
    pub fn can_accept(&self, event: &E) -> bool {
        self.tree
            .document_order()
            .iter()
            .any(|&index| self.active[index.get()] && self.tree.node(index).accepts(event))
    }

    /// What `id` remembered when it was last exited: the immediate child for
    /// shallow history, the leaves for deep history.
    pub fn last_active(&self, id: &S) -> Option<Vec<S>> {
        let index = self.tree.index_of(id)?;
        let ids = match self.history.get(index)? {
            HistoryRecord::Shallow(child) => vec![self.tree.id(*child).clone()],
            HistoryRecord::Deep(leaves) => leaves
                .iter()
                .map(|&leaf| self.tree.id(leaf).clone())
                .collect(),
        };
        Some(ids)
    }

    fn dispatcher(&mut self) -> Dispatcher<'_, S, E, C> {
        let log = if self.config.record_transitions {
            Some(&mut self.log)
        } else {
            None
        };
        Dispatcher {
            tree: &self.tree,
            registry: &self.context,
            active: &mut self.active,
            history: &mut self.history,
            log,
        }
    }

    fn settle(&mut self, result: Result<(), FireError>) -> Result<(), FireError> {
        match result {
            Ok(()) => {
                self.status = MachineStatus::Running;
                Ok(())
            }
            Err(error) => {
                if error.is_action_failure() {
                    self.status = MachineStatus::Faulted;
                } else if self.active.iter().any(|&flag| flag) {
                    self.status = MachineStatus::Running;
                }
                Err(error)
            }
        }
    }
}

impl<S: StateId, E: Event, C> std::fmt::Debug for StateMachine<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("active", &self.active_states())
            .finish()
    }
}
