//! Builder for a single state.

use crate::builder::transition::TransitionBuilder;
use crate::config::TransitionPolicy;
use crate::core::{Color, SharedAction, SharedDecision};

/// State under construction, identified by its name.
pub struct StateBuilder<C> {
    pub(crate) name: String,
    pub(crate) actions: Vec<SharedAction<C>>,
    pub(crate) transitions: Vec<TransitionBuilder<C>>,
    pub(crate) color: Color,
    pub(crate) policy: Option<TransitionPolicy>,
}

impl<C> StateBuilder<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            transitions: Vec::new(),
            color: Color::default(),
            policy: None,
        }
    }

    /// Append an action. Actions run in the order they are added.
    pub fn action(mut self, action: SharedAction<C>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = SharedAction<C>>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Append a transition. Transitions are evaluated in the order they are added.
    pub fn transition(mut self, transition: TransitionBuilder<C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Shorthand for a complete transition.
    pub fn when(
        self,
        decision: SharedDecision<C>,
        on_true: impl Into<String>,
        on_false: impl Into<String>,
    ) -> Self {
        self.transition(
            TransitionBuilder::new()
                .decision(decision)
                .on_true(on_true)
                .on_false(on_false),
        )
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Override the graph-wide transition policy for this state only.
    pub fn policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
