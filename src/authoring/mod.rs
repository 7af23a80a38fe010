//! Serialized graph definitions.
//!
//! A [`GraphDef`] is the data form of a behaviour graph: states with
//! ordered action references and ordered transitions whose targets are state
//! names. [`GraphDef::compile`] turns it into a runtime
//! [`StateGraph`](crate::graph::StateGraph), using a [`CapabilityRegistry`]
//! to instantiate actions and decisions by kind.
//!
//! ```json
//! {
//!   "policy": "last_wins",
//!   "states": [
//!     {
//!       "name": "Idle",
//!       "actions": [{ "kind": "look_around" }],
//!       "transitions": [
//!         { "decision": { "kind": "is_moving" }, "true_state": "Walking", "false_state": "Idle" }
//!       ]
//!     },
//!     {
//!       "name": "Walking",
//!       "transitions": [
//!         { "decision": { "kind": "is_moving", "negate": true }, "true_state": "Idle", "false_state": "Walking" }
//!       ]
//!     }
//!   ]
//! }
//! ```

mod error;
mod registry;

pub use error::AuthoringError;
pub use registry::{ActionFactory, CapabilityRegistry, DecisionFactory};

use crate::builder::{ConfigError, GraphBuildError, StateBuilder, StateGraphBuilder, TransitionBuilder};
use crate::config::TransitionPolicy;
use crate::core::{Color, Constant, SharedDecision};
use crate::graph::StateGraph;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Reference to an action or decision kind plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,

    /// Invert the decision's answer. Only valid on decisions.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negate: bool,
}

impl CapabilityRef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Value::Null,
            negate: false,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}

/// Serialized transition. Missing fields are configuration errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub decision: Option<CapabilityRef>,
    pub true_state: Option<String>,
    pub false_state: Option<String>,
}

/// Serialized state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,

    #[serde(default)]
    pub color: Color,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<TransitionPolicy>,

    #[serde(default)]
    pub actions: Vec<Option<CapabilityRef>>,

    #[serde(default)]
    pub transitions: Vec<Option<TransitionDef>>,
}

/// Serialized behaviour graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDef {
    #[serde(default)]
    pub policy: TransitionPolicy,

    pub states: Vec<StateDef>,
}

impl GraphDef {
    pub fn from_json(json: &str) -> Result<Self, AuthoringError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, AuthoringError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Instantiate every capability and resolve the graph.
    ///
    /// Reports every problem found, both capability lookups and graph
    /// structure, in a single [`GraphBuildError`].
    pub fn compile<C: 'static>(
        &self,
        registry: &CapabilityRegistry<C>,
    ) -> Result<StateGraph<C>, AuthoringError> {
        let mut problems = Vec::new();
        let mut graph = StateGraphBuilder::new().policy(self.policy);

        for def in &self.states {
            let mut state = StateBuilder::new(def.name.as_str()).color(def.color);
            if let Some(policy) = def.policy {
                state = state.policy(policy);
            }

            for (index, action) in def.actions.iter().enumerate() {
                let Some(reference) = action else {
                    problems.push(ConfigError::NullAction {
                        state: def.name.clone(),
                        index,
                    });
                    continue;
                };
                match registry.action(reference, &def.name, index) {
                    Ok(action) => state = state.action(action),
                    Err(problem) => problems.push(problem),
                }
            }

            for (index, transition) in def.transitions.iter().enumerate() {
                // Problem entries are replaced by a harmless self-loop so
                // later transitions keep their index in error messages.
                let placeholder = || -> SharedDecision<C> { Arc::new(Constant(false)) };
                let Some(transition) = transition else {
                    problems.push(ConfigError::NullTransition {
                        state: def.name.clone(),
                        index,
                    });
                    state = state.when(placeholder(), def.name.as_str(), def.name.as_str());
                    continue;
                };

                let mut builder = TransitionBuilder::new();
                if let Some(reference) = &transition.decision {
                    match registry.decision(reference, &def.name, index) {
                        Ok(decision) => builder = builder.decision(decision),
                        Err(problem) => {
                            problems.push(problem);
                            builder = builder.decision(placeholder());
                        }
                    }
                }
                if let Some(target) = &transition.true_state {
                    builder = builder.on_true(target.as_str());
                }
                if let Some(target) = &transition.false_state {
                    builder = builder.on_false(target.as_str());
                }
                state = state.transition(builder);
            }

            graph = graph.state(state);
        }

        match graph.build() {
            Ok(graph) if problems.is_empty() => {
                debug!(states = graph.len(), "state graph compiled");
                Ok(graph)
            }
            Ok(_) => Err(GraphBuildError::new(problems).into()),
            Err(err) => {
                problems.extend(err.problems().iter().cloned());
                Err(GraphBuildError::new(problems).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Branch;
    use crate::core::{action_fn, decision_fn};
    use serde_json::json;

    #[derive(Default)]
    struct Walker {
        speed: f32,
        looks: u32,
    }

    fn registry() -> CapabilityRegistry<Walker> {
        CapabilityRegistry::new()
            .with_action("look_around", |_| {
                Ok(action_fn("look_around", |w: &mut Walker| {
                    w.looks += 1;
                    Ok(())
                }))
            })
            .with_decision("is_moving", |_| {
                Ok(decision_fn("is_moving", |w: &Walker| Ok(w.speed > 0.0)))
            })
    }

    const IDLE_WALK: &str = r#"{
        "states": [
            {
                "name": "Idle",
                "color": { "r": 0.0, "g": 1.0, "b": 0.0, "a": 1.0 },
                "actions": [{ "kind": "look_around" }],
                "transitions": [
                    { "decision": { "kind": "is_moving" }, "true_state": "Walking", "false_state": "Idle" }
                ]
            },
            {
                "name": "Walking",
                "transitions": [
                    { "decision": { "kind": "is_moving", "negate": true }, "true_state": "Idle", "false_state": "Walking" }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_and_compiles_definition() {
        let def = GraphDef::from_json(IDLE_WALK).unwrap();
        assert_eq!(def.policy, TransitionPolicy::LastWins);
        assert_eq!(def.states[1].color, Color::GRAY);

        let graph = def.compile(&registry()).unwrap();
        let idle = graph.get(graph.id_of("Idle").unwrap()).unwrap();
        assert_eq!(idle.actions().len(), 1);
        assert_eq!(idle.color().g, 1.0);
        assert_eq!(idle.transitions()[0].true_state, graph.id_of("Walking").unwrap());
    }

    #[test]
    fn json_survives_a_round_trip() {
        let def = GraphDef::from_json(IDLE_WALK).unwrap();
        let again = GraphDef::from_json(&def.to_json().unwrap()).unwrap();
        assert_eq!(def, again);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = GraphDef::from_json("{ \"states\": 3 }").unwrap_err();
        assert!(matches!(err, AuthoringError::Parse(_)));
    }

    #[test]
    fn nulls_and_unknown_kinds_are_collected() {
        let def: GraphDef = serde_json::from_value(json!({
            "states": [
                {
                    "name": "Idle",
                    "actions": [null, { "kind": "juggle" }],
                    "transitions": [
                        null,
                        { "decision": { "kind": "teleported" }, "true_state": "Idle", "false_state": "Idle" },
                        { "decision": { "kind": "is_moving" }, "true_state": null, "false_state": "Idle" }
                    ]
                }
            ]
        }))
        .unwrap();

        let err = def.compile(&registry()).unwrap_err();
        let AuthoringError::Invalid(err) = err else {
            panic!("expected an invalid graph");
        };

        let problems = err.problems();
        assert_eq!(
            problems,
            &[
                ConfigError::NullAction {
                    state: "Idle".to_string(),
                    index: 0
                },
                ConfigError::UnknownAction {
                    state: "Idle".to_string(),
                    index: 1,
                    kind: "juggle".to_string()
                },
                ConfigError::NullTransition {
                    state: "Idle".to_string(),
                    index: 0
                },
                ConfigError::UnknownDecision {
                    state: "Idle".to_string(),
                    index: 1,
                    kind: "teleported".to_string()
                },
                ConfigError::MissingTarget {
                    state: "Idle".to_string(),
                    index: 2,
                    branch: Branch::True
                },
            ]
        );
    }

    #[test]
    fn missing_decision_is_reported_by_the_builder() {
        let def = GraphDef {
            policy: TransitionPolicy::FirstMatch,
            states: vec![StateDef {
                name: "Solo".to_string(),
                color: Color::default(),
                policy: None,
                actions: vec![],
                transitions: vec![Some(TransitionDef {
                    decision: None,
                    true_state: Some("Solo".to_string()),
                    false_state: Some("Solo".to_string()),
                })],
            }],
        };

        let err = def.compile(&registry()).unwrap_err();
        assert!(err.to_string().contains("transition 0 has no decision"));
    }
}
