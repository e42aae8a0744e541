//! Identity traits for states and events.
//!
//! A statechart never stores user state *values*; it stores identities.
//! States and events are small comparable tags, usually enums generated
//! with [`state_enum!`](crate::state_enum) and [`event_enum!`](crate::event_enum).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Identity of a state node.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: ids key the arena lookup table
/// - `Debug`: ids appear in diagnostics
/// - `Serialize` + `Deserialize`: ids appear in serializable transition logs
///
/// # Example
///
/// ```rust
/// use statechart::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Player {
///     Stopped,
///     Playing,
///     Paused,
/// }
///
/// impl StateId for Player {
///     fn name(&self) -> &str {
///         match self {
///             Self::Stopped => "Stopped",
///             Self::Playing => "Playing",
///             Self::Paused => "Paused",
///         }
///     }
/// }
///
/// assert_eq!(Player::Paused.name(), "Paused");
/// ```
pub trait StateId:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Identity of an event that can trigger transitions.
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync {
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}

/// Stable arena position of a state node within one [`StateTree`](crate::model::StateTree).
///
/// Indices are only meaningful for the tree that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateIndex(pub(crate) usize);

impl StateIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl StateId for String {
    fn name(&self) -> &str {
        self
    }
}

impl Event for String {
    fn name(&self) -> &str {
        self
    }
}

impl Event for &'static str {
    fn name(&self) -> &str {
        self
    }
}
