//! Runtime: machine instances and event dispatch.
//!
//! A [`StateMachine`] owns the mutable side of a statechart (active
//! configuration, history records, transition log) and drives it against
//! a shared, read-only [`StateTree`](crate::model::StateTree).

mod config;
mod dispatch;
mod error;
mod machine;

pub use config::MachineConfig;
pub use error::{ActionPhase, ConfigError, FireError};
pub use machine::{MachineStatus, StateMachine};
