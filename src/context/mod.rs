//! Behavior resolution and per-dispatch context.
//!
//! The model only stores behavior *names*. An [`ExecutionContext`] maps
//! those names to callables, and a [`StateContext`] carries the event,
//! payload and machine identity to each call.

mod error;
mod registry;
mod state_context;

pub use error::{BehaviorError, BehaviorKind};
pub use registry::{ActionFn, ExecutionContext, GuardFn};
pub use state_context::StateContext;
