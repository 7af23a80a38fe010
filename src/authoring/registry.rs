//! Registry turning capability references into shared actions and decisions.

use super::CapabilityRef;
use crate::builder::ConfigError;
use crate::core::{CapabilityError, Constant, Not, SharedAction, SharedDecision};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds an action from its JSON parameters.
pub type ActionFactory<C> =
    Arc<dyn Fn(&Value) -> Result<SharedAction<C>, CapabilityError> + Send + Sync>;

/// Builds a decision from its JSON parameters.
pub type DecisionFactory<C> =
    Arc<dyn Fn(&Value) -> Result<SharedDecision<C>, CapabilityError> + Send + Sync>;

/// Maps capability kinds (as written in graph definitions) to factories.
///
/// [`new`](Self::new) pre-registers the `"constant"` decision, which takes
/// `{"value": bool}`. Everything else is registered by the host.
///
/// # Example
///
/// ```rust
/// use pluggable_ai::authoring::CapabilityRegistry;
/// use pluggable_ai::core::{action_fn, decision_fn};
///
/// struct Guard {
///     noise: f32,
///     alerted: bool,
/// }
///
/// let registry = CapabilityRegistry::<Guard>::new()
///     .with_action("raise_alarm", |_params| {
///         Ok(action_fn("raise_alarm", |g: &mut Guard| {
///             g.alerted = true;
///             Ok(())
///         }))
///     })
///     .with_decision("heard_noise", |params| {
///         let threshold = params.get("threshold").and_then(|v| v.as_f64()).unwrap_or(0.5) as f32;
///         Ok(decision_fn("heard_noise", move |g: &Guard| Ok(g.noise > threshold)))
///     });
///
/// assert!(registry.has_action("raise_alarm"));
/// assert!(registry.has_decision("heard_noise"));
/// assert!(registry.has_decision("constant"));
/// ```
pub struct CapabilityRegistry<C> {
    actions: HashMap<String, ActionFactory<C>>,
    decisions: HashMap<String, DecisionFactory<C>>,
}

#[derive(Deserialize)]
struct ConstantParams {
    value: bool,
}

impl<C: 'static> CapabilityRegistry<C> {
    /// Registry with the built-in kinds.
    pub fn new() -> Self {
        Self::empty().with_decision("constant", |params| {
            let params: ConstantParams = serde_json::from_value(params.clone())
                .map_err(|e| CapabilityError::Other(Box::new(e)))?;
            Ok(Arc::new(Constant(params.value)))
        })
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
            decisions: HashMap::new(),
        }
    }

    pub fn register_action<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<SharedAction<C>, CapabilityError> + Send + Sync + 'static,
    {
        self.actions.insert(kind.into(), Arc::new(factory));
        self
    }

    pub fn register_decision<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<SharedDecision<C>, CapabilityError> + Send + Sync + 'static,
    {
        self.decisions.insert(kind.into(), Arc::new(factory));
        self
    }

    pub fn with_action<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<SharedAction<C>, CapabilityError> + Send + Sync + 'static,
    {
        self.register_action(kind, factory);
        self
    }

    pub fn with_decision<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<SharedDecision<C>, CapabilityError> + Send + Sync + 'static,
    {
        self.register_decision(kind, factory);
        self
    }

    pub fn has_action(&self, kind: &str) -> bool {
        self.actions.contains_key(kind)
    }

    pub fn has_decision(&self, kind: &str) -> bool {
        self.decisions.contains_key(kind)
    }

    pub(crate) fn action(
        &self,
        reference: &CapabilityRef,
        state: &str,
        index: usize,
    ) -> Result<SharedAction<C>, ConfigError> {
        let factory = self
            .actions
            .get(&reference.kind)
            .ok_or_else(|| ConfigError::UnknownAction {
                state: state.to_string(),
                index,
                kind: reference.kind.clone(),
            })?;
        if reference.negate {
            return Err(ConfigError::NegatedAction {
                state: state.to_string(),
                index,
                kind: reference.kind.clone(),
            });
        }
        factory(&reference.params).map_err(|e| invalid_params(reference, state, index, e))
    }

    pub(crate) fn decision(
        &self,
        reference: &CapabilityRef,
        state: &str,
        index: usize,
    ) -> Result<SharedDecision<C>, ConfigError> {
        let factory = self
            .decisions
            .get(&reference.kind)
            .ok_or_else(|| ConfigError::UnknownDecision {
                state: state.to_string(),
                index,
                kind: reference.kind.clone(),
            })?;
        let decision =
            factory(&reference.params).map_err(|e| invalid_params(reference, state, index, e))?;
        if reference.negate {
            Ok(Arc::new(Not::new(decision)))
        } else {
            Ok(decision)
        }
    }
}

impl<C: 'static> Default for CapabilityRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_params(
    reference: &CapabilityRef,
    state: &str,
    index: usize,
    error: CapabilityError,
) -> ConfigError {
    ConfigError::InvalidParams {
        state: state.to_string(),
        index,
        kind: reference.kind.clone(),
        message: error.to_string(),
    }
}
