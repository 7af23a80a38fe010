//! Per-agent controllers that drive a shared state graph tick by tick.

mod history;
mod machine;

pub use history::{StateHistory, StateTransition};
pub use machine::{StateController, TickOutcome};
