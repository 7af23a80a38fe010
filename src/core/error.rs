//! Runtime errors raised while ticking a state machine.

use crate::graph::StateId;
use thiserror::Error;

/// Failure reported by an [`Action`](crate::core::Action) or
/// [`Decision`](crate::core::Decision) while it runs.
///
/// The state machine never swallows these. They surface to whoever drives
/// the tick, wrapped in an [`FsmError`] that names the offending state.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CapabilityError {
    /// Build an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Errors that abort a tick.
///
/// A tick that fails is not rolled back: actions that already ran keep
/// their effects and switch requests already issued stay applied.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("Action {index} ('{action}') of state '{state}' failed: {source}")]
    ActionFailed {
        state: String,
        index: usize,
        action: String,
        #[source]
        source: CapabilityError,
    },

    #[error("Decision '{decision}' of transition {index} in state '{state}' failed: {source}")]
    DecisionFailed {
        state: String,
        index: usize,
        decision: String,
        #[source]
        source: CapabilityError,
    },

    #[error("Transition {index} of state '{state}' could not switch: {source}")]
    SwitchFailed {
        state: String,
        index: usize,
        #[source]
        source: Box<FsmError>,
    },

    #[error("State {id} does not exist in the state graph")]
    UnknownState { id: StateId },

    #[error("No state named '{name}' in the state graph")]
    UnknownStateName { name: String },
}
