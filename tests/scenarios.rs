//! End-to-end dispatch scenarios against a running machine.

mod common;

use common::{journaling, on, record, st, take, Ev, Journal, Payload, St};
use statechart::builder::{StateTreeBuilder, TransitionBuilder};
use statechart::context::{BehaviorError, BehaviorKind, ExecutionContext};
use statechart::core::{EntryMode, HistoryType};
use statechart::engine::{ActionPhase, FireError, MachineConfig, MachineStatus, StateMachine};
use statechart::model::StateTree;
use statechart::visitor::ModelOutline;
use std::sync::{Arc, Mutex};

type Machine = StateMachine<St, Ev, Payload>;

fn machine(tree: StateTree<St, Ev>) -> (Machine, Journal) {
    machine_with(tree, |_, _| {})
}

fn machine_with(
    tree: StateTree<St, Ev>,
    customize: impl FnOnce(&mut ExecutionContext<St, Ev, Payload>, &Journal),
) -> (Machine, Journal) {
    let (mut registry, journal) = journaling(&tree);
    customize(&mut registry, &journal);
    let machine = StateMachine::new(Arc::new(tree), Arc::new(registry));
    (machine, journal)
}

/// Root { A (initial), B }, A --Go--> B.
fn flat() -> StateTree<St, Ev> {
    StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .state(st(St::B).parent(St::Root))
        .transition(on(St::A, St::B, Ev::Go))
        .unwrap()
        .build()
        .unwrap()
}

/// Root { Idle (initial), P || { R1 { P1, P2 }, R2 { Q1, Q2 } } }.
fn orthogonal() -> StateTree<St, Ev> {
    StateTreeBuilder::new()
        .state(st(St::Root).initial(St::Idle))
        .state(st(St::Idle).parent(St::Root))
        .state(st(St::P).parent(St::Root).parallel())
        .state(st(St::R1).parent(St::P).initial(St::P1))
        .state(st(St::P1).parent(St::R1))
        .state(st(St::P2).parent(St::R1))
        .state(st(St::R2).parent(St::P).initial(St::Q1))
        .state(st(St::Q1).parent(St::R2))
        .state(st(St::Q2).parent(St::R2))
        .transition(on(St::Idle, St::P, Ev::Start))
        .unwrap()
        .transition(on(St::P, St::Idle, Ev::Stop))
        .unwrap()
        .transition(on(St::P1, St::P2, Ev::Flip))
        .unwrap()
        .transition(on(St::Q1, St::Q2, Ev::Step))
        .unwrap()
        .transition(on(St::P2, St::P1, Ev::Step))
        .unwrap()
        .transition(on(St::P1, St::Idle, Ev::Leave))
        .unwrap()
        .transition(on(St::Q1, St::Q2, Ev::Leave))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn scenario_simple_transition_then_unmatched_event() {
    let (mut m, _journal) = machine(flat());

    assert!(m.fire(Ev::Go, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::B]);

    assert!(!m.fire(Ev::Go, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::B]);
}

#[test]
fn scenario_shallow_history_restores_last_child() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::C))
        .state(st(St::C).parent(St::Root).initial(St::X).history(HistoryType::Shallow))
        .state(st(St::X).parent(St::C))
        .state(st(St::Y).parent(St::C))
        .state(st(St::D).parent(St::Root))
        .transition(on(St::X, St::Y, Ev::Next))
        .unwrap()
        .transition(on(St::C, St::D, Ev::Leave))
        .unwrap()
        .transition(on(St::D, St::C, Ev::Back))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, _journal) = machine(tree);

    m.start(&0).unwrap();
    assert_eq!(m.active_states(), vec![St::X]);

    assert!(m.fire(Ev::Next, &0).unwrap());
    assert!(m.fire(Ev::Leave, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::D]);
    assert_eq!(m.last_active(&St::C), Some(vec![St::Y]));

    assert!(m.fire(Ev::Back, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::Y]);
}

#[test]
fn scenario_parallel_event_leaves_other_region_alone() {
    let (mut m, journal) = machine(orthogonal());
    m.fire(Ev::Start, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::P1, St::Q1]);
    take(&journal);

    assert!(m.fire(Ev::Flip, &0).unwrap());

    assert_eq!(m.active_states(), vec![St::P2, St::Q1]);
    assert_eq!(take(&journal), vec!["P1-", "P2+"]);
}

#[test]
fn scenario_false_guard_falls_through_to_next_priority() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .state(st(St::B).parent(St::Root))
        .state(st(St::C).parent(St::Root))
        .transition(on(St::A, St::C, Ev::Go).priority(1))
        .unwrap()
        .transition(on(St::A, St::B, Ev::Go).priority(0).when("never"))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, _journal) = machine_with(tree, |registry, _| {
        registry.register_guard("never", |_ctx| Ok(false));
    });

    assert!(m.fire(Ev::Go, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::C]);
}

#[test]
fn lower_priority_number_wins_regardless_of_declaration_order() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .state(st(St::B).parent(St::Root))
        .state(st(St::C).parent(St::Root))
        .transition(on(St::A, St::B, Ev::Go).priority(5))
        .unwrap()
        .transition(on(St::A, St::C, Ev::Go).priority(-1))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, _journal) = machine(tree);

    m.fire(Ev::Go, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::C]);
}

#[test]
fn deep_history_restores_nested_leaf() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::Off))
        .state(st(St::Off).parent(St::Root))
        .state(st(St::On).parent(St::Root).initial(St::M1).history(HistoryType::Deep))
        .state(st(St::M1).parent(St::On).initial(St::Ma))
        .state(st(St::Ma).parent(St::M1))
        .state(st(St::Mb).parent(St::M1))
        .state(st(St::M2).parent(St::On).initial(St::Mc))
        .state(st(St::Mc).parent(St::M2))
        .state(st(St::Md).parent(St::M2))
        .transition(on(St::Off, St::On, Ev::PowerOn))
        .unwrap()
        .transition(on(St::On, St::Off, Ev::PowerOff))
        .unwrap()
        .transition(on(St::M1, St::M2, Ev::Switch))
        .unwrap()
        .transition(on(St::Mc, St::Md, Ev::Step))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine(tree);

    m.fire(Ev::PowerOn, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::Ma]);
    m.fire(Ev::Switch, &0).unwrap();
    m.fire(Ev::Step, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::Md]);

    m.fire(Ev::PowerOff, &0).unwrap();
    assert_eq!(m.last_active(&St::On), Some(vec![St::Md]));
    take(&journal);

    m.fire(Ev::PowerOn, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::Md]);
    assert_eq!(take(&journal), vec!["Off-", "On+", "M2+", "Md+"]);
}

#[test]
fn shallow_entry_mode_ignores_recorded_history() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::Off))
        .state(st(St::Off).parent(St::Root))
        .state(st(St::On).parent(St::Root).initial(St::Ma).history(HistoryType::Deep))
        .state(st(St::Ma).parent(St::On))
        .state(st(St::Mb).parent(St::On))
        .transition(on(St::Off, St::On, Ev::PowerOn).entry_mode(EntryMode::Shallow))
        .unwrap()
        .transition(on(St::Off, St::On, Ev::Back))
        .unwrap()
        .transition(on(St::On, St::Off, Ev::PowerOff))
        .unwrap()
        .transition(on(St::Ma, St::Mb, Ev::Step))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, _journal) = machine(tree);

    m.start(&0).unwrap();
    m.fire(Ev::Back, &0).unwrap();
    m.fire(Ev::Step, &0).unwrap();
    m.fire(Ev::PowerOff, &0).unwrap();

    // Shallow entry ignores the recorded history.
    m.fire(Ev::PowerOn, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::Ma]);
}

#[test]
fn parallel_regions_enter_in_order_and_exit_in_reverse() {
    let (mut m, journal) = machine(orthogonal());
    m.start(&0).unwrap();
    take(&journal);

    m.fire(Ev::Start, &0).unwrap();
    assert_eq!(
        take(&journal),
        vec!["Idle-", "P+", "R1+", "P1+", "R2+", "Q1+"]
    );

    m.fire(Ev::Stop, &0).unwrap();
    assert_eq!(
        take(&journal),
        vec!["Q1-", "R2-", "P1-", "R1-", "P-", "Idle+"]
    );
}

#[test]
fn each_region_reacts_to_the_same_event() {
    let (mut m, journal) = machine(orthogonal());
    m.fire(Ev::Start, &0).unwrap();
    m.fire(Ev::Flip, &0).unwrap();
    take(&journal);

    assert!(m.fire(Ev::Step, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::P1, St::Q2]);
    assert_eq!(take(&journal), vec!["P2-", "P1+", "Q1-", "Q2+"]);
}

#[test]
fn region_leaving_the_parallel_state_preempts_later_regions() {
    let (mut m, journal) = machine(orthogonal());
    m.fire(Ev::Start, &0).unwrap();
    take(&journal);

    assert!(m.fire(Ev::Leave, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::Idle]);
    let journal = take(&journal);
    assert!(!journal.contains(&"Q2+".to_string()));
    assert_eq!(journal.last().map(String::as_str), Some("Idle+"));
}

#[test]
fn unmatched_event_changes_nothing() {
    let (mut m, journal) = machine(orthogonal());
    m.fire(Ev::Start, &0).unwrap();
    let before = m.active_states();
    take(&journal);

    assert!(!m.fire(Ev::Unknown, &0).unwrap());
    assert_eq!(m.active_states(), before);
    assert!(take(&journal).is_empty());
}

#[test]
fn external_and_local_transitions_differ_on_the_source() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::P))
        .state(st(St::P).parent(St::Root).initial(St::A))
        .state(st(St::A).parent(St::P))
        .state(st(St::B).parent(St::P))
        .transition(on(St::P, St::B, Ev::Ext))
        .unwrap()
        .transition(on(St::P, St::B, Ev::Loc).local())
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine(tree);
    m.start(&0).unwrap();
    take(&journal);

    m.fire(Ev::Ext, &0).unwrap();
    assert_eq!(take(&journal), vec!["A-", "P-", "P+", "B+"]);

    m.fire(Ev::Loc, &0).unwrap();
    assert_eq!(take(&journal), vec!["B-", "B+"]);
}

#[test]
fn local_transition_to_an_ancestor_keeps_the_ancestor() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root).initial(St::X))
        .state(st(St::X).parent(St::A))
        .state(st(St::Y).parent(St::A))
        .transition(on(St::X, St::Y, Ev::Next))
        .unwrap()
        .transition(on(St::Y, St::A, Ev::Loc).local())
        .unwrap()
        .transition(on(St::X, St::A, Ev::Back).local())
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine(tree);
    m.start(&0).unwrap();
    take(&journal);

    assert!(m.fire(Ev::Back, &0).unwrap());
    assert_eq!(take(&journal), vec!["X-", "X+"]);

    m.fire(Ev::Next, &0).unwrap();
    take(&journal);
    assert!(m.fire(Ev::Loc, &0).unwrap());
    assert_eq!(take(&journal), vec!["Y-", "X+"]);
    assert_eq!(m.active_states(), vec![St::X]);
}

#[test]
fn cross_region_transition_reenters_only_touched_regions() {
    // P || { R1 { P1, P2 }, R2 { Q1, Q2 }, C { D } }
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::Idle))
        .state(st(St::Idle).parent(St::Root))
        .state(st(St::P).parent(St::Root).parallel())
        .state(st(St::R1).parent(St::P).initial(St::P1))
        .state(st(St::P1).parent(St::R1))
        .state(st(St::P2).parent(St::R1))
        .state(st(St::R2).parent(St::P).initial(St::Q1))
        .state(st(St::Q1).parent(St::R2))
        .state(st(St::Q2).parent(St::R2))
        .state(st(St::C).parent(St::P).initial(St::D))
        .state(st(St::D).parent(St::C))
        .transition(on(St::Idle, St::P, Ev::Start))
        .unwrap()
        .transition(on(St::P1, St::P2, Ev::Flip))
        .unwrap()
        .transition(on(St::Q1, St::Q2, Ev::Step))
        .unwrap()
        .transition(on(St::P2, St::Q1, Ev::Switch))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine(tree);
    m.fire(Ev::Start, &0).unwrap();
    m.fire(Ev::Flip, &0).unwrap();
    m.fire(Ev::Step, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::P2, St::Q2, St::D]);
    take(&journal);

    assert!(m.fire(Ev::Switch, &0).unwrap());

    assert_eq!(
        take(&journal),
        vec!["Q2-", "R2-", "P2-", "R1-", "R1+", "P1+", "R2+", "Q1+"]
    );
    assert_eq!(m.active_states(), vec![St::P1, St::Q1, St::D]);
    assert!(m.is_active(&St::P));
}

#[test]
fn external_self_transition_exits_and_reenters() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .transition(on(St::A, St::A, Ev::Go))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine(tree);
    m.start(&0).unwrap();
    take(&journal);

    assert!(m.fire(Ev::Go, &0).unwrap());
    assert_eq!(take(&journal), vec!["A-", "A+"]);
}

#[test]
fn internal_transition_runs_actions_only() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .transition(
            TransitionBuilder::new()
                .from(St::A)
                .on(Ev::Tick)
                .internal()
                .perform("count"),
        )
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine_with(tree, |registry, journal| {
        record(registry, journal, "count");
    });
    m.start(&0).unwrap();
    take(&journal);

    assert!(m.fire(Ev::Tick, &0).unwrap());
    assert_eq!(take(&journal), vec!["count"]);
    assert_eq!(m.active_states(), vec![St::A]);
}

#[test]
fn transition_actions_run_between_exit_and_entry() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .state(st(St::B).parent(St::Root))
        .transition(on(St::A, St::B, Ev::Go).perform("first").perform("second"))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, journal) = machine_with(tree, |registry, journal| {
        record(registry, journal, "first");
        record(registry, journal, "second");
    });
    m.start(&0).unwrap();
    take(&journal);

    m.fire(Ev::Go, &0).unwrap();
    assert_eq!(take(&journal), vec!["A-", "first", "second", "B+"]);
}

#[test]
fn guards_see_event_route_and_payload() {
    let seen: Arc<Mutex<Option<(Ev, St, St, Payload)>>> = Arc::default();
    let (mut m, _journal) = machine_with(flat_guarded(), |registry, _| {
        let seen = Arc::clone(&seen);
        registry.register_guard("enough", move |ctx| {
            *seen.lock().unwrap() = Some((
                *ctx.event().unwrap(),
                *ctx.source().unwrap(),
                *ctx.target().unwrap(),
                *ctx.payload(),
            ));
            Ok(*ctx.payload() >= 10)
        });
    });

    assert!(!m.fire(Ev::Go, &3).unwrap());
    assert_eq!(*seen.lock().unwrap(), Some((Ev::Go, St::A, St::B, 3)));

    assert!(m.fire(Ev::Go, &10).unwrap());
    assert_eq!(m.active_states(), vec![St::B]);
}

fn flat_guarded() -> StateTree<St, Ev> {
    StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .state(st(St::B).parent(St::Root))
        .transition(on(St::A, St::B, Ev::Go).when("enough"))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn failing_guard_leaves_configuration_untouched() {
    let (mut m, journal) = machine_with(flat_guarded(), |registry, _| {
        registry.register_guard("enough", |_ctx| Err(BehaviorError::new("sensor offline")));
    });
    m.start(&0).unwrap();
    take(&journal);

    let error = m.fire(Ev::Go, &0).unwrap_err();

    assert!(error.is_guard_failure());
    assert_eq!(m.active_states(), vec![St::A]);
    assert!(take(&journal).is_empty());
    assert_eq!(m.status(), MachineStatus::Running);
}

#[test]
fn unregistered_guard_is_reported_by_name() {
    let (mut m, _journal) = machine(flat_guarded());

    let error = m.fire(Ev::Go, &0).unwrap_err();

    assert_eq!(
        error,
        FireError::GuardEvaluation {
            state: "A".into(),
            event: "Go".into(),
            condition: "enough".into(),
            cause: BehaviorError::Unresolved {
                kind: BehaviorKind::Guard,
                name: "enough".into(),
            },
        }
    );
    assert_eq!(m.active_states(), vec![St::A]);
}

#[test]
fn failing_exit_action_faults_without_rollback() {
    let (mut m, journal) = machine_with(flat(), |registry, _| {
        registry.register_action("A-", |_ctx| Err("disk full".into()));
    });
    m.start(&0).unwrap();
    take(&journal);

    let error = m.fire(Ev::Go, &0).unwrap_err();

    match error {
        FireError::ActionExecution {
            state,
            action,
            phase,
            ..
        } => {
            assert_eq!(state, "A");
            assert_eq!(action, "A-");
            assert_eq!(phase, ActionPhase::Exit);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(m.status(), MachineStatus::Faulted);
    assert_eq!(m.active_states(), vec![St::A]);
    assert!(take(&journal).is_empty());
}

#[test]
fn failing_entry_action_keeps_completed_exits() {
    let (mut m, journal) = machine_with(flat(), |registry, _| {
        registry.register_action("B+", |_ctx| Err("refused".into()));
    });
    m.start(&0).unwrap();
    take(&journal);

    let error = m.fire(Ev::Go, &0).unwrap_err();

    assert!(error.is_action_failure());
    assert_eq!(take(&journal), vec!["A-"]);
    assert_eq!(m.active_states(), vec![St::B]);
    assert_eq!(m.status(), MachineStatus::Faulted);

    m.reset(&0).unwrap();
    assert_eq!(m.active_states(), vec![St::A]);
    assert_eq!(m.status(), MachineStatus::Running);
}

#[test]
fn reset_returns_to_initial_configuration() {
    let (mut m, journal) = machine(flat());
    m.fire(Ev::Go, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::B]);
    assert_eq!(m.transition_log().len(), 1);
    take(&journal);

    m.reset(&0).unwrap();

    assert_eq!(m.active_states(), vec![St::A]);
    assert_eq!(m.status(), MachineStatus::Running);
    assert!(m.transition_log().is_empty());
    assert_eq!(take(&journal), vec!["Root+", "A+"]);
}

#[test]
fn reset_forgets_history() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::Off))
        .state(st(St::Off).parent(St::Root))
        .state(st(St::On).parent(St::Root).initial(St::Ma).history(HistoryType::Deep))
        .state(st(St::Ma).parent(St::On))
        .state(st(St::Mb).parent(St::On))
        .transition(on(St::Off, St::On, Ev::PowerOn))
        .unwrap()
        .transition(on(St::On, St::Off, Ev::PowerOff))
        .unwrap()
        .transition(on(St::Ma, St::Mb, Ev::Step))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, _journal) = machine(tree);
    m.fire(Ev::PowerOn, &0).unwrap();
    m.fire(Ev::Step, &0).unwrap();
    m.fire(Ev::PowerOff, &0).unwrap();
    assert_eq!(m.last_active(&St::On), Some(vec![St::Mb]));

    m.reset(&0).unwrap();

    assert_eq!(m.active_states(), vec![St::Off]);
    assert_eq!(m.last_active(&St::On), None);
    m.fire(Ev::PowerOn, &0).unwrap();
    assert_eq!(m.active_states(), vec![St::Ma]);
}

#[test]
fn clear_drops_everything_without_actions() {
    let (mut m, journal) = machine(flat());
    m.fire(Ev::Go, &0).unwrap();
    take(&journal);

    m.clear();

    assert!(m.active_states().is_empty());
    assert_eq!(m.status(), MachineStatus::Idle);
    assert!(m.transition_log().is_empty());
    assert!(take(&journal).is_empty());

    m.start(&0).unwrap();
    assert_eq!(m.active_states(), vec![St::A]);
}

#[test]
fn unstarted_machine_ignores_events_without_auto_start() {
    let (registry, _journal) = journaling::<St, Ev, Payload>(&flat());
    let mut m = StateMachine::with_config(
        Arc::new(flat()),
        Arc::new(registry),
        MachineConfig::default().auto_start(false),
    );

    assert!(!m.fire(Ev::Go, &0).unwrap());
    assert_eq!(m.status(), MachineStatus::Idle);

    m.start(&0).unwrap();
    m.start(&0).unwrap();
    assert!(m.fire(Ev::Go, &0).unwrap());
    assert_eq!(m.active_states(), vec![St::B]);
}

#[test]
fn queries_reflect_the_active_configuration() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::P))
        .state(st(St::P).parent(St::Root).parallel())
        .state(st(St::R1).parent(St::P).initial(St::P1))
        .state(st(St::P1).parent(St::R1))
        .state(st(St::Done).parent(St::R1).final_state())
        .state(st(St::R2).parent(St::P).initial(St::Q1))
        .state(st(St::Q1).parent(St::R2))
        .state(st(St::Q2).parent(St::R2).final_state())
        .transition(on(St::P1, St::Done, Ev::Finish))
        .unwrap()
        .transition(on(St::Q1, St::Q2, Ev::Step))
        .unwrap()
        .transition(on(St::P, St::Root, Ev::Stop))
        .unwrap()
        .build()
        .unwrap();
    let (mut m, _journal) = machine(tree);
    m.start(&0).unwrap();

    assert!(m.is_active(&St::P));
    assert!(m.is_active(&St::R2));
    assert!(!m.is_active(&St::Done));
    assert!(m.can_accept(&Ev::Stop));
    assert!(!m.can_accept(&Ev::Go));
    assert_eq!(m.acceptable_events(), vec![Ev::Stop, Ev::Finish, Ev::Step]);

    m.fire(Ev::Finish, &0).unwrap();
    assert!(m.is_final_state(&St::Done));
    assert!(!m.is_completed());

    m.fire(Ev::Step, &0).unwrap();
    assert!(m.is_completed());
}

#[test]
fn transition_log_records_path_and_respects_limits() {
    let tree = StateTreeBuilder::new()
        .state(st(St::Root).initial(St::A))
        .state(st(St::A).parent(St::Root))
        .state(st(St::B).parent(St::Root))
        .transition(on(St::A, St::B, Ev::Go))
        .unwrap()
        .transition(on(St::B, St::A, Ev::Back))
        .unwrap()
        .build()
        .unwrap();
    let tree = Arc::new(tree);
    let registry = Arc::new(journaling::<St, Ev, Payload>(&tree).0);

    let mut full = StateMachine::new(Arc::clone(&tree), Arc::clone(&registry));
    for event in [Ev::Go, Ev::Back, Ev::Go] {
        full.fire(event, &0).unwrap();
    }
    assert_eq!(full.transition_log().path(), vec![&St::A, &St::B, &St::A, &St::B]);
    assert_eq!(full.transition_log().records()[0].event, "Go");

    let mut bounded = StateMachine::with_config(
        Arc::clone(&tree),
        Arc::clone(&registry),
        MachineConfig::default().transition_log_limit(2),
    );
    for event in [Ev::Go, Ev::Back, Ev::Go] {
        bounded.fire(event, &0).unwrap();
    }
    assert_eq!(bounded.transition_log().len(), 2);
    assert_eq!(bounded.transition_log().records()[0].source, St::B);

    let mut silent = StateMachine::with_config(
        tree,
        registry,
        MachineConfig::default().record_transitions(false),
    );
    silent.fire(Ev::Go, &0).unwrap();
    assert!(silent.transition_log().is_empty());
}

#[test]
fn machines_sharing_a_tree_keep_separate_memory() {
    let tree = Arc::new(flat());
    let registry = Arc::new(journaling::<St, Ev, Payload>(&tree).0);
    let mut first = StateMachine::new(Arc::clone(&tree), Arc::clone(&registry));
    let mut second = StateMachine::new(tree, registry);

    first.fire(Ev::Go, &0).unwrap();
    second.start(&0).unwrap();

    assert_eq!(first.active_states(), vec![St::B]);
    assert_eq!(second.active_states(), vec![St::A]);
    assert_ne!(first.id(), second.id());
}

#[test]
fn outline_round_trips_through_json() {
    let tree = orthogonal();
    let outline = ModelOutline::of(&tree);

    let json = outline.to_json().unwrap();
    let parsed: ModelOutline<St> = ModelOutline::from_json(&json).unwrap();

    assert_eq!(parsed, outline);
    let ids: Vec<St> = parsed.states.iter().map(|state| state.id).collect();
    assert_eq!(
        ids,
        vec![
            St::Root,
            St::Idle,
            St::P,
            St::R1,
            St::P1,
            St::P2,
            St::R2,
            St::Q1,
            St::Q2,
        ]
    );
    let p1 = parsed.state(&St::P1).unwrap();
    let events: Vec<&str> = p1.transitions.iter().map(|t| t.event.as_str()).collect();
    assert_eq!(events, vec!["Flip", "Leave"]);
}
