//! Record of the state changes a controller went through.

use crate::graph::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One change of a controller's current state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// Tick during which the change happened (0-based)
    pub tick: u64,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state changes.
///
/// Under the last-transition-wins policy a single tick can change the
/// current state more than once; each change is recorded.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use pluggable_ai::controller::{StateHistory, StateTransition};
/// use pluggable_ai::graph::StateId;
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition {
///     from: StateId::new(0),
///     to: StateId::new(1),
///     tick: 0,
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: StateId::new(1),
///     to: StateId::new(0),
///     tick: 3,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![StateId::new(0), StateId::new(1), StateId::new(0)]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
    limit: Option<usize>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries, dropping the oldest.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
        self.trim();
    }

    /// Change the size limit. Existing entries are kept, oldest first out.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.trim();
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            if self.transitions.len() > limit {
                let excess = self.transitions.len() - limit;
                self.transitions.drain(..excess);
            }
        }
    }

    /// States traversed: the first recorded origin, then every target.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Wall-clock time between the first and the last recorded change.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Recorded changes, oldest first.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
