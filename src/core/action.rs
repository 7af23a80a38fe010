//! Actions: behaviour a state performs every tick it is active.

use super::error::CapabilityError;
use std::sync::Arc;

/// A unit of per-tick behaviour attached to a [`State`](super::State).
///
/// Actions are shared between every controller that uses the state, so an
/// implementation must not keep per-agent data in its own fields. Anything
/// that changes from agent to agent belongs on the context `C`.
///
/// # Example
///
/// ```rust
/// use pluggable_ai::core::{Action, CapabilityError};
///
/// struct Agent {
///     x: f32,
///     speed: f32,
/// }
///
/// struct MoveForward;
///
/// impl Action<Agent> for MoveForward {
///     fn act(&self, agent: &mut Agent) -> Result<(), CapabilityError> {
///         agent.x += agent.speed;
///         Ok(())
///     }
/// }
///
/// let mut agent = Agent { x: 0.0, speed: 1.5 };
/// MoveForward.act(&mut agent).unwrap();
/// assert_eq!(agent.x, 1.5);
/// ```
pub trait Action<C>: Send + Sync {
    /// Perform the action against the agent context.
    fn act(&self, ctx: &mut C) -> Result<(), CapabilityError>;

    /// Label used in logs and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Reference-counted action that can be attached to many states.
pub type SharedAction<C> = Arc<dyn Action<C>>;

/// Action backed by a closure.
pub struct FnAction<F> {
    name: String,
    f: F,
}

impl<F> FnAction<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<C, F> Action<C> for FnAction<F>
where
    F: Fn(&mut C) -> Result<(), CapabilityError> + Send + Sync,
{
    fn act(&self, ctx: &mut C) -> Result<(), CapabilityError> {
        (self.f)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a [`SharedAction`].
///
/// ```rust
/// use pluggable_ai::core::action_fn;
///
/// let count = action_fn("count", |n: &mut u32| {
///     *n += 1;
///     Ok(())
/// });
///
/// let mut n = 0;
/// count.act(&mut n).unwrap();
/// assert_eq!(n, 1);
/// assert_eq!(count.name(), "count");
/// ```
pub fn action_fn<C, F>(name: impl Into<String>, f: F) -> SharedAction<C>
where
    C: 'static,
    F: Fn(&mut C) -> Result<(), CapabilityError> + Send + Sync + 'static,
{
    Arc::new(FnAction::new(name, f))
}
