//! Core statechart vocabulary.
//!
//! This module contains the leaf types every other module builds on:
//! - Identity traits for states and events
//! - Closed enums for composite, history, transition and entry kinds
//! - Symbolic guard references
//! - History memory and the transition log

mod guard;
mod history;
mod kinds;
mod state;

pub use guard::Condition;
pub use history::{HistoryRecord, HistoryStore, TransitionLog, TransitionRecord};
pub use kinds::{CompositeType, EntryMode, HistoryType, TransitionKind};
pub use state::{Event, StateId, StateIndex};
