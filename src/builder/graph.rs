//! Builder that resolves named states into a [`StateGraph`].

use crate::builder::error::{Branch, ConfigError, GraphBuildError};
use crate::builder::state::StateBuilder;
use crate::config::TransitionPolicy;
use crate::core::State;
use crate::graph::{StateGraph, StateId};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

type Check = Validation<(), NonEmptyVec<ConfigError>>;

fn check<T>(result: Result<T, ConfigError>) -> Check {
    match result {
        Ok(_) => Validation::success(()),
        Err(problem) => Validation::fail(problem),
    }
}

/// Builder for a whole behaviour graph.
///
/// States are added in any order and refer to each other by name.
/// [`build`](Self::build) validates the full graph and reports every
/// problem at once instead of stopping at the first.
pub struct StateGraphBuilder<C> {
    states: Vec<StateBuilder<C>>,
    policy: TransitionPolicy,
}

impl<C> StateGraphBuilder<C> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            policy: TransitionPolicy::default(),
        }
    }

    /// Policy for states that do not set their own.
    pub fn policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(mut self, state: StateBuilder<C>) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder<C>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Validate and resolve the graph.
    pub fn build(self) -> Result<StateGraph<C>, GraphBuildError> {
        let (names, mut checks) = self.index_names();
        checks.extend(self.transition_checks(&names));

        if let Validation::Failure(problems) = Validation::all_vec(checks) {
            return Err(GraphBuildError::new(problems.iter().cloned().collect()));
        }

        let default_policy = self.policy;
        let mut states = Vec::with_capacity(self.states.len());
        for (position, builder) in self.states.into_iter().enumerate() {
            let id = StateId::new(position);
            let policy = builder.policy.unwrap_or(default_policy);
            if policy == TransitionPolicy::LastWins && builder.transitions.len() > 1 {
                debug!(
                    state = %builder.name,
                    transitions = builder.transitions.len(),
                    "every transition requests a switch; the last one decides"
                );
            }

            let mut state = State::new(id, builder.name.clone())
                .with_color(builder.color)
                .with_policy(policy);
            for action in builder.actions {
                state = state.with_action(action);
            }
            for (index, transition) in builder.transitions.into_iter().enumerate() {
                state = state.with_transition(transition.resolve(&builder.name, index, &names)?);
            }
            states.push(state);
        }

        Ok(StateGraph::from_states(states))
    }

    fn index_names(&self) -> (HashMap<String, StateId>, Vec<Check>) {
        let mut names = HashMap::with_capacity(self.states.len());
        let mut checks = Vec::new();

        if self.states.is_empty() {
            checks.push(Validation::fail(ConfigError::EmptyGraph));
        }
        for (position, state) in self.states.iter().enumerate() {
            if names.contains_key(&state.name) {
                checks.push(Validation::fail(ConfigError::DuplicateState {
                    name: state.name.clone(),
                }));
            } else {
                names.insert(state.name.clone(), StateId::new(position));
            }
        }
        (names, checks)
    }

    fn transition_checks(&self, names: &HashMap<String, StateId>) -> Vec<Check> {
        let mut checks = Vec::new();
        for state in &self.states {
            for (index, transition) in state.transitions.iter().enumerate() {
                checks.push(check(transition.check_decision(&state.name, index)));
                for branch in [Branch::True, Branch::False] {
                    checks.push(check(transition.target(branch, &state.name, index, names)));
                }
            }
        }
        checks
    }
}

impl<C> Default for StateGraphBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
