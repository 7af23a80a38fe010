//! The host side of a tick: what a state needs from whoever drives it.

use super::error::FsmError;
use crate::graph::StateId;

/// Owner of the current-state slot and the agent context.
///
/// A [`State`](super::State) reads and mutates the context through this
/// trait and asks it to switch states; the controller decides how the switch
/// is carried out. [`StateController`](crate::controller::StateController)
/// is the stock implementation, but hosts are free to bring their own.
pub trait Controller<C> {
    fn context(&self) -> &C;

    fn context_mut(&mut self) -> &mut C;

    fn current_state(&self) -> StateId;

    /// Make `next` the current state.
    ///
    /// Must fail loudly when `next` is not a valid state.
    fn transition_to_state(&mut self, next: StateId) -> Result<(), FsmError>;
}
