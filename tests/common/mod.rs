//! Shared fixtures for integration tests.
#![allow(dead_code)]

use statechart::builder::{StateBuilder, TransitionBuilder};
use statechart::context::ExecutionContext;
use statechart::core::{Event, StateId};
use statechart::model::StateTree;
use statechart::{event_enum, state_enum};
use std::sync::{Arc, Mutex};

state_enum! {
    pub enum St {
        Root,
        A,
        B,
        C,
        D,
        X,
        Y,
        Idle,
        P,
        R1,
        R2,
        P1,
        P2,
        Q1,
        Q2,
        Off,
        On,
        M1,
        M2,
        Ma,
        Mb,
        Mc,
        Md,
        Done,
    }
}

event_enum! {
    pub enum Ev {
        Go,
        Next,
        Leave,
        Back,
        Flip,
        Start,
        Stop,
        PowerOn,
        PowerOff,
        Switch,
        Step,
        Tick,
        Finish,
        Ext,
        Loc,
        Unknown,
    }
}

/// Guards and actions see the payload; tests use it as a plain number.
pub type Payload = u32;

pub type Journal = Arc<Mutex<Vec<String>>>;

/// State whose entry and exit actions journal `"<name>+"` / `"<name>-"`.
pub fn st<S: StateId>(id: S) -> StateBuilder<S> {
    let name = id.name().to_string();
    StateBuilder::new(id)
        .on_entry(format!("{name}+"))
        .on_exit(format!("{name}-"))
}

pub fn on<S: StateId, E: Event>(from: S, to: S, event: E) -> TransitionBuilder<S, E> {
    TransitionBuilder::new().from(from).to(to).on(event)
}

/// Registry where every declared entry/exit action journals its own name.
pub fn journaling<S, E, C>(tree: &StateTree<S, E>) -> (ExecutionContext<S, E, C>, Journal)
where
    S: StateId + 'static,
    E: Event + 'static,
    C: 'static,
{
    let journal: Journal = Arc::default();
    let mut registry = ExecutionContext::new();
    for node in tree.nodes() {
        for action in node.entry_actions().iter().chain(node.exit_actions()) {
            record(&mut registry, &journal, action);
        }
    }
    (registry, journal)
}

/// Register `name` as an action that journals `name`.
pub fn record<S: 'static, E: 'static, C: 'static>(
    registry: &mut ExecutionContext<S, E, C>,
    journal: &Journal,
    name: &str,
) {
    let journal = Arc::clone(journal);
    let entry = name.to_string();
    registry.register_action(name, move |_ctx| {
        journal.lock().unwrap().push(entry.clone());
        Ok(())
    });
}

/// Drain everything journaled so far.
pub fn take(journal: &Journal) -> Vec<String> {
    std::mem::take(&mut *journal.lock().unwrap())
}
