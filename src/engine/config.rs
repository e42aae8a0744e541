//! Per-instance machine configuration.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunables for one machine instance.
///
/// Missing fields fall back to [`MachineConfig::default`] when loaded from
/// JSON.
///
/// # Example
///
/// ```rust
/// use statechart::engine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "transition_log_limit": 16 }"#).unwrap();
/// assert_eq!(config.transition_log_limit, Some(16));
/// assert!(config.auto_start);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Enter the initial configuration on the first `fire` of an idle machine.
    pub auto_start: bool,
    /// Keep a [`TransitionLog`](crate::core::TransitionLog) of executed transitions.
    pub record_transitions: bool,
    /// Upper bound on retained log records; `None` keeps everything.
    pub transition_log_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            record_transitions: true,
            transition_log_limit: None,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn auto_start(mut self, enabled: bool) -> Self {
        self.auto_start = enabled;
        self
    }

    pub fn record_transitions(mut self, enabled: bool) -> Self {
        self.record_transitions = enabled;
        self
    }

    pub fn transition_log_limit(mut self, limit: usize) -> Self {
        self.transition_log_limit = Some(limit);
        self
    }
}
