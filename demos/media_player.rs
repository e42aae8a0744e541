//! Media Player Statechart
//!
//! This example demonstrates orthogonal regions and shallow history.
//!
//! Key concepts:
//! - A parallel root: transport and audio react to events independently
//! - Shallow history remembering Playing vs Paused across a stop
//! - Internal transitions that run actions without leaving the state
//! - Outline export of the declared structure as JSON
//!
//! Run with: cargo run --example media_player

use statechart::builder::{StateBuilder, StateTreeBuilder, TransitionBuilder};
use statechart::context::ExecutionContext;
use statechart::core::HistoryType;
use statechart::engine::StateMachine;
use statechart::visitor::ModelOutline;
use statechart::{event_enum, state_enum};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Player {
        Root,
        Transport,
        Stopped,
        Active,
        Playing,
        Paused,
        Audio,
        Normal,
        Muted,
    }
}

event_enum! {
    enum Button {
        Play,
        Pause,
        Stop,
        Resume,
        Mute,
        Tick,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Media Player Statechart ===\n");

    let tree = StateTreeBuilder::new()
        .state(StateBuilder::new(Player::Root).parallel())
        .state(
            StateBuilder::new(Player::Transport)
                .parent(Player::Root)
                .initial(Player::Stopped),
        )
        .state(StateBuilder::new(Player::Stopped).parent(Player::Transport))
        .state(
            StateBuilder::new(Player::Active)
                .parent(Player::Transport)
                .initial(Player::Playing)
                .history(HistoryType::Shallow),
        )
        .state(StateBuilder::new(Player::Playing).parent(Player::Active))
        .state(StateBuilder::new(Player::Paused).parent(Player::Active))
        .state(StateBuilder::new(Player::Audio).parent(Player::Root).initial(Player::Normal))
        .state(StateBuilder::new(Player::Normal).parent(Player::Audio))
        .state(StateBuilder::new(Player::Muted).parent(Player::Audio))
        .transition(TransitionBuilder::new().from(Player::Stopped).to(Player::Active).on(Button::Play))?
        .transition(TransitionBuilder::new().from(Player::Stopped).to(Player::Active).on(Button::Resume))?
        .transition(TransitionBuilder::new().from(Player::Playing).to(Player::Paused).on(Button::Pause))?
        .transition(TransitionBuilder::new().from(Player::Paused).to(Player::Playing).on(Button::Play))?
        .transition(
            TransitionBuilder::new()
                .from(Player::Active)
                .to(Player::Stopped)
                .on(Button::Stop)
                .perform("rewind"),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Player::Playing)
                .on(Button::Tick)
                .internal()
                .perform("advance"),
        )?
        .transition(TransitionBuilder::new().from(Player::Normal).to(Player::Muted).on(Button::Mute))?
        .transition(TransitionBuilder::new().from(Player::Muted).to(Player::Normal).on(Button::Mute))?
        .build()?;

    let position = Arc::new(AtomicU32::new(0));
    let context = {
        let advance = Arc::clone(&position);
        let rewind = Arc::clone(&position);
        ExecutionContext::<Player, Button, u32>::new()
            .with_action("advance", move |ctx| {
                advance.fetch_add(*ctx.payload(), Ordering::SeqCst);
                Ok(())
            })
            .with_action("rewind", move |_ctx| {
                rewind.store(0, Ordering::SeqCst);
                Ok(())
            })
    };

    let tree = Arc::new(tree);
    let mut player = StateMachine::new(Arc::clone(&tree), Arc::new(context));
    player.start(&0)?;

    let script = [
        (Button::Play, 0),
        (Button::Tick, 5),
        (Button::Mute, 0),
        (Button::Tick, 5),
        (Button::Pause, 0),
        (Button::Tick, 5),
        (Button::Stop, 0),
        (Button::Resume, 0),
        (Button::Mute, 0),
    ];
    for (button, seconds) in script {
        let accepted = player.fire(button, &seconds)?;
        println!(
            "{:<7} accepted={:<5} position={:>2}s active={:?}",
            format!("{button:?}"),
            accepted,
            position.load(Ordering::SeqCst),
            player.active_states()
        );
    }

    println!("\nOutline:\n{}", ModelOutline::of(&tree).to_json()?);

    Ok(())
}
