//! Errors raised while saving or resuming a controller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The controller snapshot could not be encoded
    #[error("Could not encode controller checkpoint: {0}")]
    SerializationFailed(String),

    /// The bytes or JSON are not a controller checkpoint
    #[error("Could not decode controller checkpoint: {0}")]
    DeserializationFailed(String),

    #[error("Controller checkpoint has format version {found}; this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A state named in the checkpoint is not part of the graph being resumed
    #[error("Checkpointed state '{name}' does not exist in the state graph")]
    UnknownState { name: String },
}
