//! Configuration types shared by the builder, authoring and controller layers.

use serde::{Deserialize, Serialize};

/// How a state resolves several transitions in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Evaluate every transition and request a switch for each one. The
    /// last transition in declared order decides where the controller ends
    /// up; earlier requests are overwritten.
    #[default]
    LastWins,

    /// Evaluate in order and stop at the first transition that leads away
    /// from the owning state. If none does, no switch is requested.
    FirstMatch,
}

/// Controller behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Record every change of the current state.
    pub record_history: bool,

    /// Keep at most this many history entries, dropping the oldest.
    pub history_limit: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            record_history: true,
            history_limit: None,
        }
    }
}
