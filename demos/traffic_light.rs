//! Traffic Light Statechart
//!
//! This example demonstrates a cyclic controller nested in a composite.
//!
//! Key concepts:
//! - Cyclic transitions inside a sequential composite
//! - A guard reading the event payload
//! - Leaving and re-entering a composite by deep history
//!
//! Run with: cargo run --example traffic_light
//! Add `RUST_LOG=statechart=debug` to see dispatch tracing.

use statechart::builder::{StateBuilder, StateTreeBuilder, TransitionBuilder};
use statechart::context::ExecutionContext;
use statechart::core::{HistoryType, StateId};
use statechart::engine::StateMachine;
use statechart::{event_enum, state_enum};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Light {
        Controller,
        Operating,
        Red,
        Green,
        Yellow,
        Flashing,
    }
}

event_enum! {
    enum Signal {
        Timer,
        Fault,
        Repair,
    }
}

/// Seconds elapsed since the last change.
struct Clock {
    elapsed: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Traffic Light Statechart ===\n");

    let tree = StateTreeBuilder::new()
        .state(StateBuilder::new(Light::Controller).initial(Light::Operating))
        .state(
            StateBuilder::new(Light::Operating)
                .parent(Light::Controller)
                .initial(Light::Red)
                .history(HistoryType::Deep),
        )
        .state(StateBuilder::new(Light::Red).parent(Light::Operating).on_entry("show_red"))
        .state(StateBuilder::new(Light::Green).parent(Light::Operating).on_entry("show_green"))
        .state(StateBuilder::new(Light::Yellow).parent(Light::Operating).on_entry("show_yellow"))
        .state(StateBuilder::new(Light::Flashing).parent(Light::Controller).on_entry("show_flashing"))
        .transition(
            TransitionBuilder::new()
                .from(Light::Red)
                .to(Light::Green)
                .on(Signal::Timer)
                .when("long_enough"),
        )?
        .transition(TransitionBuilder::new().from(Light::Green).to(Light::Yellow).on(Signal::Timer))?
        .transition(TransitionBuilder::new().from(Light::Yellow).to(Light::Red).on(Signal::Timer))?
        .transition(TransitionBuilder::new().from(Light::Operating).to(Light::Flashing).on(Signal::Fault))?
        .transition(TransitionBuilder::new().from(Light::Flashing).to(Light::Operating).on(Signal::Repair))?
        .build()?;

    let mut context = ExecutionContext::<Light, Signal, Clock>::new()
        .with_guard("long_enough", |ctx| Ok(ctx.payload().elapsed >= 30));
    for light in [Light::Red, Light::Green, Light::Yellow, Light::Flashing] {
        context.register_action(format!("show_{}", light.name().to_lowercase()), move |_ctx| {
            println!("  -> {}", light.name());
            Ok(())
        });
    }

    let mut light: StateMachine<Light, Signal, Clock> =
        StateMachine::new(Arc::new(tree), Arc::new(context));

    light.start(&Clock { elapsed: 0 })?;
    println!("Initial: {:?}\n", light.active_states());

    println!("Timer after 10s (red holds for 30s):");
    let accepted = light.fire(Signal::Timer, &Clock { elapsed: 10 })?;
    println!("  accepted: {accepted}, active: {:?}\n", light.active_states());

    println!("Timer after 30s:");
    light.fire(Signal::Timer, &Clock { elapsed: 30 })?;
    println!("  active: {:?}\n", light.active_states());

    println!("Fault, then repair (deep history resumes the cycle):");
    light.fire(Signal::Fault, &Clock { elapsed: 0 })?;
    println!("  active: {:?}", light.active_states());
    light.fire(Signal::Repair, &Clock { elapsed: 0 })?;
    println!("  active: {:?}\n", light.active_states());

    println!("Transitions taken: {}", light.transition_log().len());
    for record in light.transition_log().records() {
        println!("  {:?} --{}--> {:?}", record.source, record.event, record.target);
    }

    Ok(())
}
