//! Builder for transitions whose targets are named, not yet resolved.

use crate::builder::error::{Branch, ConfigError};
use crate::core::{SharedDecision, Transition};
use crate::graph::StateId;
use std::collections::HashMap;

/// Transition under construction.
///
/// Targets are state names. They are resolved to [`StateId`]s when the
/// whole graph is built, so a transition may point at a state declared
/// later or at its own state.
pub struct TransitionBuilder<C> {
    decision: Option<SharedDecision<C>>,
    on_true: Option<String>,
    on_false: Option<String>,
}

impl<C> TransitionBuilder<C> {
    pub fn new() -> Self {
        Self {
            decision: None,
            on_true: None,
            on_false: None,
        }
    }

    /// Set the decision (required).
    pub fn decision(mut self, decision: SharedDecision<C>) -> Self {
        self.decision = Some(decision);
        self
    }

    /// State to switch to when the decision is true (required).
    pub fn on_true(mut self, state: impl Into<String>) -> Self {
        self.on_true = Some(state.into());
        self
    }

    /// State to switch to when the decision is false (required).
    pub fn on_false(mut self, state: impl Into<String>) -> Self {
        self.on_false = Some(state.into());
        self
    }

    pub(crate) fn check_decision(&self, state: &str, index: usize) -> Result<(), ConfigError> {
        match self.decision {
            Some(_) => Ok(()),
            None => Err(ConfigError::MissingDecision {
                state: state.to_string(),
                index,
            }),
        }
    }

    pub(crate) fn target(
        &self,
        branch: Branch,
        state: &str,
        index: usize,
        names: &HashMap<String, StateId>,
    ) -> Result<StateId, ConfigError> {
        let target = match branch {
            Branch::True => self.on_true.as_deref(),
            Branch::False => self.on_false.as_deref(),
        };
        let target = target.ok_or_else(|| ConfigError::MissingTarget {
            state: state.to_string(),
            index,
            branch,
        })?;
        names
            .get(target)
            .copied()
            .ok_or_else(|| ConfigError::UnresolvedTarget {
                state: state.to_string(),
                index,
                branch,
                target: target.to_string(),
            })
    }

    /// Resolve names against `names` and produce the runtime transition.
    pub(crate) fn resolve(
        self,
        state: &str,
        index: usize,
        names: &HashMap<String, StateId>,
    ) -> Result<Transition<C>, ConfigError> {
        let true_state = self.target(Branch::True, state, index, names)?;
        let false_state = self.target(Branch::False, state, index, names)?;
        let decision = self.decision.ok_or_else(|| ConfigError::MissingDecision {
            state: state.to_string(),
            index,
        })?;
        Ok(Transition::new(decision, true_state, false_state))
    }
}

impl<C> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
