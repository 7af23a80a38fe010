//! States and the per-tick update algorithm.
//!
//! A state is configuration plus dispatch: it owns an ordered list of
//! actions and an ordered list of transitions, and every tick it runs the
//! former and evaluates the latter against a [`Controller`].

use super::action::SharedAction;
use super::controller::Controller;
use super::error::FsmError;
use super::transition::Transition;
use crate::config::TransitionPolicy;
use crate::graph::StateId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Authoring color used to tell states apart in editors and debug views.
///
/// Has no effect on runtime behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const GRAY: Color = Color::rgba(0.5, 0.5, 0.5, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GRAY
    }
}

/// One node of an agent's behaviour graph.
///
/// States are built once (see [`StateGraphBuilder`](crate::builder::StateGraphBuilder))
/// and then shared read-only by every controller that runs them.
pub struct State<C> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) actions: Vec<SharedAction<C>>,
    pub(crate) transitions: Vec<Transition<C>>,
    pub(crate) color: Color,
    pub(crate) policy: TransitionPolicy,
}

impl<C> State<C> {
    /// Create a state with no actions and no transitions.
    pub fn new(id: StateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            actions: Vec::new(),
            transitions: Vec::new(),
            color: Color::default(),
            policy: TransitionPolicy::default(),
        }
    }

    pub fn with_action(mut self, action: SharedAction<C>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_transition(mut self, transition: Transition<C>) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[SharedAction<C>] {
        &self.actions
    }

    pub fn transitions(&self) -> &[Transition<C>] {
        &self.transitions
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// A state that can never lead anywhere else.
    pub fn is_terminal(&self) -> bool {
        self.transitions.iter().all(|t| t.is_self_loop(self.id))
    }

    /// Run one tick of this state against `controller`.
    ///
    /// Every action runs once, in declared order. Then the transitions are
    /// evaluated in declared order according to the state's
    /// [`TransitionPolicy`]. Under [`TransitionPolicy::LastWins`] a switch
    /// is requested for each transition, so the last one determines the
    /// final current state.
    ///
    /// The first failing action or decision aborts the tick. Nothing that
    /// already happened is undone.
    pub fn update_state<K>(&self, controller: &mut K) -> Result<(), FsmError>
    where
        K: Controller<C> + ?Sized,
    {
        self.do_actions(controller)?;
        self.check_transitions(controller)
    }

    fn do_actions<K>(&self, controller: &mut K) -> Result<(), FsmError>
    where
        K: Controller<C> + ?Sized,
    {
        for (index, action) in self.actions.iter().enumerate() {
            trace!(state = %self.name, index, action = action.name(), "running action");
            action
                .act(controller.context_mut())
                .map_err(|source| FsmError::ActionFailed {
                    state: self.name.clone(),
                    index,
                    action: action.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn check_transitions<K>(&self, controller: &mut K) -> Result<(), FsmError>
    where
        K: Controller<C> + ?Sized,
    {
        for (index, transition) in self.transitions.iter().enumerate() {
            let next = transition
                .evaluate(controller.context())
                .map_err(|source| FsmError::DecisionFailed {
                    state: self.name.clone(),
                    index,
                    decision: transition.decision.name().to_string(),
                    source,
                })?;
            trace!(state = %self.name, index, next = %next, "transition evaluated");

            if self.policy == TransitionPolicy::FirstMatch && next == self.id {
                continue;
            }

            controller
                .transition_to_state(next)
                .map_err(|source| FsmError::SwitchFailed {
                    state: self.name.clone(),
                    index,
                    source: Box::new(source),
                })?;

            if self.policy == TransitionPolicy::FirstMatch {
                break;
            }
        }
        Ok(())
    }
}

impl<C> Clone for State<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            actions: self.actions.iter().map(Arc::clone).collect(),
            transitions: self.transitions.clone(),
            color: self.color,
            policy: self.policy,
        }
    }
}

impl<C> std::fmt::Debug for State<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let actions: Vec<&str> = self.actions.iter().map(|a| a.name()).collect();
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("actions", &actions)
            .field("transitions", &self.transitions)
            .field("policy", &self.policy)
            .finish()
    }
}
