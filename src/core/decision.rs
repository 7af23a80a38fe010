//! Decisions: boolean predicates that pick a transition's branch.
//!
//! A decision reads the agent context and answers yes or no. Decisions are
//! shared between controllers, so like actions they keep no per-agent data
//! in their own fields.

use super::error::CapabilityError;
use std::sync::{Arc, OnceLock};

/// Predicate evaluated against the agent context.
///
/// Must answer synchronously. A decision that cannot evaluate returns an
/// error rather than guessing a boolean, since a guessed answer would pick
/// the wrong branch without any trace.
///
/// # Example
///
/// ```rust
/// use pluggable_ai::core::{CapabilityError, Decision};
///
/// struct Agent {
///     health: u32,
/// }
///
/// struct IsHurt;
///
/// impl Decision<Agent> for IsHurt {
///     fn decide(&self, agent: &Agent) -> Result<bool, CapabilityError> {
///         Ok(agent.health < 50)
///     }
/// }
///
/// assert!(IsHurt.decide(&Agent { health: 10 }).unwrap());
/// assert!(!IsHurt.decide(&Agent { health: 90 }).unwrap());
/// ```
pub trait Decision<C>: Send + Sync {
    fn decide(&self, ctx: &C) -> Result<bool, CapabilityError>;

    /// Label used in logs and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Reference-counted decision that can be used by many transitions.
pub type SharedDecision<C> = Arc<dyn Decision<C>>;

impl<C> Decision<C> for Arc<dyn Decision<C>> {
    fn decide(&self, ctx: &C) -> Result<bool, CapabilityError> {
        (**self).decide(ctx)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Decision backed by a closure.
pub struct FnDecision<F> {
    name: String,
    f: F,
}

impl<F> FnDecision<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<C, F> Decision<C> for FnDecision<F>
where
    F: Fn(&C) -> Result<bool, CapabilityError> + Send + Sync,
{
    fn decide(&self, ctx: &C) -> Result<bool, CapabilityError> {
        (self.f)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a [`SharedDecision`].
pub fn decision_fn<C, F>(name: impl Into<String>, f: F) -> SharedDecision<C>
where
    C: 'static,
    F: Fn(&C) -> Result<bool, CapabilityError> + Send + Sync + 'static,
{
    Arc::new(FnDecision::new(name, f))
}

/// Always answers the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub bool);

impl<C> Decision<C> for Constant {
    fn decide(&self, _ctx: &C) -> Result<bool, CapabilityError> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        if self.0 {
            "constant(true)"
        } else {
            "constant(false)"
        }
    }
}

/// Inverts the wrapped decision.
///
/// Named after what it wraps, e.g. `not(sees_enemy)`.
pub struct Not<D> {
    inner: D,
    name: OnceLock<String>,
}

impl<D> Not<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            name: OnceLock::new(),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<C, D: Decision<C>> Decision<C> for Not<D> {
    fn decide(&self, ctx: &C) -> Result<bool, CapabilityError> {
        self.inner.decide(ctx).map(|answer| !answer)
    }

    fn name(&self) -> &str {
        self.name
            .get_or_init(|| format!("not({})", self.inner.name()))
    }
}

/// True when every child is true. Evaluates in order and stops at the
/// first false; an empty list is true.
pub struct AllOf<C>(pub Vec<SharedDecision<C>>);

impl<C> Decision<C> for AllOf<C> {
    fn decide(&self, ctx: &C) -> Result<bool, CapabilityError> {
        for child in &self.0 {
            if !child.decide(ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> &str {
        "all_of"
    }
}

/// True when any child is true. Evaluates in order and stops at the
/// first true; an empty list is false.
pub struct AnyOf<C>(pub Vec<SharedDecision<C>>);

impl<C> Decision<C> for AnyOf<C> {
    fn decide(&self, ctx: &C) -> Result<bool, CapabilityError> {
        for child in &self.0 {
            if child.decide(ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn name(&self) -> &str {
        "any_of"
    }
}
