//! Pluggable AI: a finite state machine for game agents.
//!
//! Behaviour is authored as a graph of states. Each state runs an ordered
//! list of actions every tick and then evaluates an ordered list of
//! transitions, each of which asks a decision and picks one of two target
//! states. A controller per agent owns the current state and the agent
//! context, and drives the graph one tick at a time.
//!
//! # Core Concepts
//!
//! - **Action**: per-tick behaviour, see [`core::Action`]
//! - **Decision**: predicate choosing a transition branch, see [`core::Decision`]
//! - **Transition**: decision plus true and false targets
//! - **State**: actions and transitions, plus the update algorithm
//! - **StateController**: per-agent driver, see [`controller::StateController`]
//!
//! Graphs are immutable once built and can be shared by any number of
//! controllers. Actions and decisions keep no per-agent data; that lives on
//! the context type.
//!
//! # Example
//!
//! ```rust
//! use pluggable_ai::builder::{StateBuilder, StateGraphBuilder};
//! use pluggable_ai::controller::StateController;
//! use pluggable_ai::core::{action_fn, decision_fn, Controller};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Sentry {
//!     enemy_visible: bool,
//!     shots: u32,
//! }
//!
//! let sees_enemy = decision_fn("sees_enemy", |s: &Sentry| Ok(s.enemy_visible));
//! let shoot = action_fn("shoot", |s: &mut Sentry| {
//!     s.shots += 1;
//!     Ok(())
//! });
//!
//! let graph = StateGraphBuilder::new()
//!     .state(StateBuilder::new("Watch").when(sees_enemy.clone(), "Attack", "Watch"))
//!     .state(
//!         StateBuilder::new("Attack")
//!             .action(shoot)
//!             .when(sees_enemy, "Attack", "Watch"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut sentry = StateController::with_initial_name(Arc::new(graph), "Watch", Sentry::default()).unwrap();
//!
//! sentry.context_mut().enemy_visible = true;
//! sentry.run(3).unwrap();
//!
//! assert_eq!(sentry.current_state_name(), "Attack");
//! assert_eq!(sentry.context().shots, 2);
//! ```

pub mod authoring;
pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod controller;
pub mod core;
pub mod graph;

// Re-export commonly used types
pub use builder::{StateBuilder, StateGraphBuilder};
pub use config::{ControllerConfig, TransitionPolicy};
pub use controller::StateController;
pub use crate::core::{Action, Controller, Decision, FsmError, State, Transition};
pub use graph::{StateGraph, StateId};
