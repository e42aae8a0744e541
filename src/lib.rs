//! Statechart: a hierarchical state machine runtime
//!
//! A statechart is declared once as an immutable tree of states and
//! transitions, then run by any number of machine instances. Each instance
//! owns its active configuration and history memory; the tree and the
//! behavior registry are shared read-only.
//!
//! # Core Concepts
//!
//! - **States**: nested sequentially (one active child) or in parallel
//!   (orthogonal regions, all active)
//! - **Transitions**: event-triggered edges with a priority, a symbolic
//!   guard and a list of symbolic actions
//! - **History**: shallow or deep memory of a composite's last
//!   sub-configuration, restored on re-entry
//! - **Execution context**: the registry resolving guard and action names
//!   to callables at call time
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{StateBuilder, StateTreeBuilder, TransitionBuilder};
//! use statechart::context::ExecutionContext;
//! use statechart::engine::StateMachine;
//! use statechart::{event_enum, state_enum};
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Door {
//!         Root,
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! event_enum! {
//!     enum Action {
//!         Push,
//!         Pull,
//!     }
//! }
//!
//! let tree = StateTreeBuilder::new()
//!     .state(StateBuilder::new(Door::Root).initial(Door::Closed))
//!     .state(StateBuilder::new(Door::Closed).parent(Door::Root))
//!     .state(StateBuilder::new(Door::Open).parent(Door::Root))
//!     .transition(TransitionBuilder::new().from(Door::Closed).to(Door::Open).on(Action::Push))?
//!     .transition(TransitionBuilder::new().from(Door::Open).to(Door::Closed).on(Action::Pull))?
//!     .build()?;
//!
//! let mut door = StateMachine::new(Arc::new(tree), Arc::new(ExecutionContext::<_, _, ()>::new()));
//! assert!(door.fire(Action::Push, &())?);
//! assert_eq!(door.active_states(), vec![Door::Open]);
//! assert!(!door.fire(Action::Push, &())?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod context;
pub mod core;
pub mod engine;
pub mod model;
pub mod visitor;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, StateTreeBuilder, TransitionBuilder};
pub use context::{BehaviorError, ExecutionContext, StateContext};
pub use core::{CompositeType, Condition, EntryMode, Event, HistoryType, StateId, TransitionKind};
pub use engine::{FireError, MachineConfig, MachineStatus, StateMachine};
pub use model::{DeclarationError, StateTree};
