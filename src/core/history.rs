//! History records and the transition log.
//!
//! Two kinds of memory live here:
//! - [`HistoryStore`]: what each composite with a history type remembered
//!   when it was last exited. Read only when re-entering by history.
//! - [`TransitionLog`]: an ordered record of executed transitions, for
//!   diagnostics and auditing.
//!
//! Both are owned by exactly one machine instance.

use super::kinds::TransitionKind;
use super::state::{StateId, StateIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// What a composite remembered at its last exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryRecord {
    /// The immediate child that was active.
    Shallow(StateIndex),
    /// Every leaf that was active beneath the composite, in document order.
    Deep(Vec<StateIndex>),
}

/// Per-instance history memory, keyed by the owning composite.
///
/// Records survive unrelated transitions and are only dropped by
/// [`HistoryStore::clear`].
#[derive(Clone, Debug, Default)]
pub struct HistoryStore {
    records: HashMap<StateIndex, HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `record` for `owner`, replacing any earlier record.
    pub fn write(&mut self, owner: StateIndex, record: HistoryRecord) {
        self.records.insert(owner, record);
    }

    pub fn get(&self, owner: StateIndex) -> Option<&HistoryRecord> {
        self.records.get(&owner)
    }

    /// Last active child, if `owner` holds a shallow record.
    pub fn shallow(&self, owner: StateIndex) -> Option<StateIndex> {
        match self.records.get(&owner) {
            Some(HistoryRecord::Shallow(child)) => Some(*child),
            _ => None,
        }
    }

    /// Last active leaves, if `owner` holds a deep record.
    pub fn deep(&self, owner: StateIndex) -> Option<&[StateIndex]> {
        match self.records.get(&owner) {
            Some(HistoryRecord::Deep(leaves)) => Some(leaves),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Record of one executed transition.
///
/// # Example
///
/// ```rust
/// use statechart::core::{TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     source: "Idle".to_string(),
///     target: "Running".to_string(),
///     event: "start".to_string(),
///     kind: TransitionKind::External,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.event, "start");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: StateId> {
    /// State that owned the transition
    pub source: S,
    /// Declared target of the transition
    pub target: S,
    /// Name of the triggering event
    pub event: String,
    pub kind: TransitionKind,
    /// When the transition finished its entry phase
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of executed transitions, optionally bounded.
///
/// When a limit is set, the oldest records are dropped first.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionLog<S: StateId> {
    records: Vec<TransitionRecord<S>>,
    limit: Option<usize>,
}

impl<S: StateId> Default for TransitionLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> TransitionLog<S> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            limit: None,
        }
    }

    /// Create a log that keeps at most `limit` records.
    pub fn bounded(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn record(&mut self, record: TransitionRecord<S>) {
        if self.limit == Some(0) {
            return;
        }
        self.records.push(record);
        if let Some(limit) = self.limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the first recorded source followed by the target of each
    /// record, in order.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.source);
        }
        for record in &self.records {
            path.push(&record.target);
        }
        path
    }

    /// Time between the first and last retained records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[TransitionRecord<S>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
