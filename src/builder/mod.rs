//! Builder API for assembling state graphs in code.
//!
//! States are declared by name and transitions point at names. Names are
//! resolved once the whole graph is known, so declaration order does not
//! matter and cycles are fine.
//!
//! # Example
//!
//! ```
//! use pluggable_ai::builder::{StateBuilder, StateGraphBuilder};
//! use pluggable_ai::core::{decision_fn, Not, SharedDecision};
//! use std::sync::Arc;
//!
//! let moving = decision_fn("moving", |speed: &f32| Ok(*speed > 0.0));
//! let stopped: SharedDecision<f32> = Arc::new(Not::new(moving.clone()));
//!
//! let graph = StateGraphBuilder::new()
//!     .state(StateBuilder::new("Idle").when(moving, "Walking", "Idle"))
//!     .state(StateBuilder::new("Walking").when(stopped, "Idle", "Walking"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! ```

pub mod error;
pub mod graph;
pub mod state;
pub mod transition;

pub use error::{Branch, ConfigError, GraphBuildError};
pub use graph::StateGraphBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;
