//! Builder API for declaring state trees.
//!
//! This module provides fluent builders and macros for declaring a
//! statechart with minimal boilerplate. [`StateTreeBuilder::build`] links
//! the declaration into an arena and runs every declaration check, so a
//! tree that builds is ready to run.

pub mod error;
pub mod macros;
pub mod state;
pub mod transition;
pub mod tree;

pub use error::BuildError;
pub use state::StateBuilder;
pub use transition::{TransitionBuilder, TransitionDecl};
pub use tree::StateTreeBuilder;
