//! Core state machine abstractions.
//!
//! - [`Action`]: behaviour run every tick a state is active
//! - [`Decision`]: predicate that picks a transition branch
//! - [`Transition`]: a decision plus its true and false target states
//! - [`State`]: ordered actions and transitions, and the update algorithm
//! - [`Controller`]: what a state needs from the host driving it
//!
//! Actions and decisions are shared by every controller running the same
//! graph. Per-agent data lives on the context type `C`, never on them.

mod action;
mod controller;
mod decision;
mod error;
mod state;
mod transition;

pub use action::{action_fn, Action, FnAction, SharedAction};
pub use controller::Controller;
pub use decision::{decision_fn, AllOf, AnyOf, Constant, Decision, FnDecision, Not, SharedDecision};
pub use error::{CapabilityError, FsmError};
pub use state::{Color, State};
pub use transition::Transition;
