//! Checkpoint and resume for controllers.
//!
//! A checkpoint captures where a controller is in its graph, how many ticks
//! it has run, its history and its config. States are stored by name, so a
//! checkpoint can be resumed on a rebuilt graph as long as the names still
//! exist, whatever their order. Actions, decisions and the agent context are
//! not serialized; resuming needs the graph and a fresh context from the host.

use crate::config::ControllerConfig;
use crate::controller::{StateController, StateHistory, StateTransition};
use crate::graph::{StateGraph, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a controller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// Controller the checkpoint was taken from
    pub controller_id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Name of the current state
    pub current_state: String,

    /// Ticks run so far
    pub ticks: u64,

    /// Recorded state changes, oldest first
    pub history: Vec<CheckpointedChange>,

    /// Controller settings
    pub config: ControllerConfig,
}

/// A recorded state change with both states given by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckpointedChange {
    pub from: String,
    pub to: String,
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<C> StateController<C> {
    /// Snapshot the controller.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            controller_id: self.id,
            timestamp: Utc::now(),
            current_state: self.current_state_name().to_string(),
            ticks: self.ticks,
            history: self
                .history
                .transitions()
                .iter()
                .map(|change| CheckpointedChange {
                    from: self.state_name(change.from),
                    to: self.state_name(change.to),
                    tick: change.tick,
                    timestamp: change.timestamp,
                })
                .collect(),
            config: self.config.clone(),
        }
    }

    fn state_name(&self, id: StateId) -> String {
        self.graph.name_of(id).unwrap_or("<unknown>").to_string()
    }

    /// Rebuild a controller from `checkpoint` on top of `graph`.
    ///
    /// The controller keeps the checkpointed id, tick count, history and
    /// config. Every state named in the checkpoint must exist in `graph`.
    pub fn resume(
        graph: Arc<StateGraph<C>>,
        checkpoint: &Checkpoint,
        context: C,
    ) -> Result<Self, CheckpointError> {
        checkpoint.check_version()?;
        let lookup = |name: &str| {
            graph.id_of(name).ok_or_else(|| CheckpointError::UnknownState {
                name: name.to_string(),
            })
        };
        let current = lookup(&checkpoint.current_state)?;

        let mut history = StateHistory::new();
        history.set_limit(checkpoint.config.history_limit);
        for change in &checkpoint.history {
            history.record(StateTransition {
                from: lookup(&change.from)?,
                to: lookup(&change.to)?,
                tick: change.tick,
                timestamp: change.timestamp,
            });
        }

        let mut controller =
            StateController::new(graph, current, context).map_err(|_| CheckpointError::UnknownState {
                name: checkpoint.current_state.clone(),
            })?;
        controller.id = checkpoint.controller_id;
        controller.ticks = checkpoint.ticks;
        controller.history = history;
        controller.config = checkpoint.config.clone();

        debug!(
            controller = %controller.id,
            state = %checkpoint.current_state,
            ticks = checkpoint.ticks,
            "controller resumed from checkpoint"
        );
        Ok(controller)
    }
}
