//! Errors raised while loading graph definitions.

use crate::builder::GraphBuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error("Failed to parse graph definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] GraphBuildError),
}
