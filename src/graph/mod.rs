//! Arena holding every state of a behaviour graph.
//!
//! States refer to each other (forward references, cycles, self-loops) by
//! [`StateId`], an index into the arena. Ids are resolved from state names
//! once, when the graph is built, so a finished graph never contains a
//! dangling reference.

use crate::core::{FsmError, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable key of a state inside a [`StateGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    /// Id of the state at position `index` in declaration order.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the state in the arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable, shareable collection of states.
///
/// Wrap it in an `Arc` to drive many controllers from the same graph.
///
/// # Example
///
/// ```rust
/// use pluggable_ai::builder::{StateBuilder, StateGraphBuilder};
///
/// let graph = StateGraphBuilder::<()>::new()
///     .state(StateBuilder::new("Idle"))
///     .state(StateBuilder::new("Flee"))
///     .build()
///     .unwrap();
///
/// let flee = graph.id_of("Flee").unwrap();
/// assert_eq!(graph.name_of(flee), Some("Flee"));
/// assert!(graph.contains(flee));
/// assert_eq!(graph.len(), 2);
/// ```
pub struct StateGraph<C> {
    states: Vec<State<C>>,
    by_name: HashMap<String, StateId>,
}

impl<C> StateGraph<C> {
    /// Assemble a graph from states whose ids already match their position.
    pub(crate) fn from_states(states: Vec<State<C>>) -> Self {
        let by_name = states
            .iter()
            .map(|s| (s.name().to_string(), s.id()))
            .collect();
        Self { states, by_name }
    }

    /// State with the given id, if the graph has one.
    pub fn get(&self, id: StateId) -> Option<&State<C>> {
        self.states.get(id.index())
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn state(&self, id: StateId) -> Result<&State<C>, FsmError> {
        self.get(id).ok_or(FsmError::UnknownState { id })
    }

    /// Id of the state called `name`.
    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    /// Look up a state by name, failing when there is none.
    pub fn require(&self, name: &str) -> Result<StateId, FsmError> {
        self.id_of(name).ok_or_else(|| FsmError::UnknownStateName {
            name: name.to_string(),
        })
    }

    /// Name of the state with the given id.
    pub fn name_of(&self, id: StateId) -> Option<&str> {
        self.get(id).map(State::name)
    }

    /// Whether `id` points at a state of this graph.
    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in declaration order, which is also id order.
    pub fn iter(&self) -> impl Iterator<Item = &State<C>> {
        self.states.iter()
    }
}

impl<C> fmt::Debug for StateGraph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("states", &self.states)
            .finish()
    }
}
