//! Immutable statechart model.
//!
//! States live in an arena ([`StateTree`]) and refer to each other by
//! [`StateIndex`](crate::core::StateIndex). Nothing in this module changes
//! after construction; runtime memory belongs to the machine instance.

mod error;
mod node;
mod transition;
mod tree;

pub use error::DeclarationError;
pub use node::{StateNode, Verification};
pub use transition::Transition;
pub use tree::StateTree;
