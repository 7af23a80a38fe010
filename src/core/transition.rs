//! Transitions: a decision plus the two states it can lead to.

use super::decision::SharedDecision;
use super::error::CapabilityError;
use crate::graph::StateId;
use std::sync::Arc;

/// Conditional edge owned by a [`State`](super::State).
///
/// Evaluating the transition asks its decision and returns `true_state` or
/// `false_state`. Either branch may point back at the owning state, which
/// is how a transition says "stay here".
pub struct Transition<C> {
    pub decision: SharedDecision<C>,
    pub true_state: StateId,
    pub false_state: StateId,
}

impl<C> Transition<C> {
    pub fn new(decision: SharedDecision<C>, true_state: StateId, false_state: StateId) -> Self {
        Self {
            decision,
            true_state,
            false_state,
        }
    }

    /// Ask the decision and pick the matching branch.
    pub fn evaluate(&self, ctx: &C) -> Result<StateId, CapabilityError> {
        if self.decision.decide(ctx)? {
            Ok(self.true_state)
        } else {
            Ok(self.false_state)
        }
    }

    /// Both branches lead back to `owner`.
    pub fn is_self_loop(&self, owner: StateId) -> bool {
        self.true_state == owner && self.false_state == owner
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            decision: Arc::clone(&self.decision),
            true_state: self.true_state,
            false_state: self.false_state,
        }
    }
}

impl<C> std::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("decision", &self.decision.name())
            .field("true_state", &self.true_state)
            .field("false_state", &self.false_state)
            .finish()
    }
}
