//! The stock per-agent controller.

use super::history::{StateHistory, StateTransition};
use crate::config::ControllerConfig;
use crate::core::{Controller, FsmError};
use crate::graph::{StateGraph, StateId};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, debug_span, warn};
use uuid::Uuid;

/// What one tick did to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Tick number (0-based)
    pub tick: u64,
    /// Current state when the tick started
    pub from: StateId,
    /// Current state when the tick finished
    pub to: StateId,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Drives one agent through a shared [`StateGraph`].
///
/// Owns the current-state slot and the agent context `C`. Each call to
/// [`tick`](Self::tick) hands control to the current state, which runs its
/// actions and asks this controller to switch states.
///
/// # Example
///
/// ```rust
/// use pluggable_ai::builder::{StateBuilder, StateGraphBuilder};
/// use pluggable_ai::controller::StateController;
/// use pluggable_ai::core::{decision_fn, Controller};
/// use std::sync::Arc;
///
/// let tired = decision_fn("tired", |stamina: &u32| Ok(*stamina == 0));
///
/// let graph = StateGraphBuilder::new()
///     .state(StateBuilder::new("Run").when(tired, "Rest", "Run"))
///     .state(StateBuilder::new("Rest"))
///     .build()
///     .unwrap();
///
/// let mut controller = StateController::with_initial_name(Arc::new(graph), "Run", 1).unwrap();
/// controller.tick().unwrap();
/// assert_eq!(controller.current_state_name(), "Run");
///
/// *controller.context_mut() = 0;
/// controller.tick().unwrap();
/// assert_eq!(controller.current_state_name(), "Rest");
/// ```
pub struct StateController<C> {
    pub(crate) id: Uuid,
    pub(crate) graph: Arc<StateGraph<C>>,
    pub(crate) current: StateId,
    pub(crate) context: C,
    pub(crate) ticks: u64,
    pub(crate) history: StateHistory,
    pub(crate) config: ControllerConfig,
}

impl<C> StateController<C> {
    /// Start a controller in `initial`.
    pub fn new(graph: Arc<StateGraph<C>>, initial: StateId, context: C) -> Result<Self, FsmError> {
        graph.state(initial)?;
        Ok(Self {
            id: Uuid::new_v4(),
            graph,
            current: initial,
            context,
            ticks: 0,
            history: StateHistory::new(),
            config: ControllerConfig::default(),
        })
    }

    /// Start a controller in the state called `name`.
    pub fn with_initial_name(
        graph: Arc<StateGraph<C>>,
        name: &str,
        context: C,
    ) -> Result<Self, FsmError> {
        let initial = graph.require(name)?;
        Self::new(graph, initial, context)
    }

    /// Apply `config`.
    ///
    /// Recorded history is kept; a lower `history_limit` drops the oldest
    /// entries.
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.history.set_limit(config.history_limit);
        self.config = config;
        self
    }

    /// Run one tick of the current state.
    ///
    /// Errors from actions, decisions or switches abort the tick and are
    /// returned as-is; the tick still counts.
    pub fn tick(&mut self) -> Result<TickOutcome, FsmError> {
        let graph = Arc::clone(&self.graph);
        let state = graph.state(self.current)?;
        let from = self.current;
        let tick = self.ticks;

        let span = debug_span!("tick", controller = %self.id, tick, state = state.name());
        let _enter = span.enter();

        let result = state.update_state(self);
        self.ticks += 1;
        if let Err(err) = result {
            warn!(error = %err, "tick aborted");
            return Err(err);
        }

        Ok(TickOutcome {
            tick,
            from,
            to: self.current,
        })
    }

    /// Run `ticks` ticks, stopping at the first error.
    pub fn run(&mut self, ticks: usize) -> Result<Vec<TickOutcome>, FsmError> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Identifier of this controller, kept across checkpoint and resume.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The graph this controller runs.
    pub fn graph(&self) -> &Arc<StateGraph<C>> {
        &self.graph
    }

    /// Name of the current state.
    pub fn current_state_name(&self) -> &str {
        self.graph.name_of(self.current).unwrap_or("<unknown>")
    }

    /// Consume the controller and hand back the agent context.
    pub fn into_context(self) -> C {
        self.context
    }

    /// Ticks run so far, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Changes of the current state, oldest first.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

impl<C> Controller<C> for StateController<C> {
    fn context(&self) -> &C {
        &self.context
    }

    fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    fn current_state(&self) -> StateId {
        self.current
    }

    fn transition_to_state(&mut self, next: StateId) -> Result<(), FsmError> {
        if !self.graph.contains(next) {
            return Err(FsmError::UnknownState { id: next });
        }
        if next == self.current {
            return Ok(());
        }

        debug!(
            from = self.graph.name_of(self.current).unwrap_or("<unknown>"),
            to = self.graph.name_of(next).unwrap_or("<unknown>"),
            "state changed"
        );
        if self.config.record_history {
            self.history.record(StateTransition {
                from: self.current,
                to: next,
                tick: self.ticks,
                timestamp: Utc::now(),
            });
        }
        self.current = next;
        Ok(())
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for StateController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateController")
            .field("id", &self.id)
            .field("current", &self.current_state_name())
            .field("ticks", &self.ticks)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, StateGraphBuilder};
    use crate::core::{action_fn, decision_fn, CapabilityError, Constant};

    #[derive(Debug, Default)]
    struct Npc {
        alerted: bool,
        steps: u32,
    }

    fn graph() -> Arc<StateGraph<Npc>> {
        let alerted = decision_fn("alerted", |npc: &Npc| Ok(npc.alerted));
        let step = action_fn("step", |npc: &mut Npc| {
            npc.steps += 1;
            Ok(())
        });

        let graph = StateGraphBuilder::new()
            .state(
                StateBuilder::new("Patrol")
                    .action(step)
                    .when(alerted.clone(), "Alert", "Patrol"),
            )
            .state(StateBuilder::new("Alert").when(alerted, "Alert", "Patrol"))
            .build()
            .unwrap();
        Arc::new(graph)
    }

    #[test]
    fn unknown_initial_state_is_rejected() {
        let result = StateController::new(graph(), StateId::new(9), Npc::default());
        assert!(matches!(result, Err(FsmError::UnknownState { .. })));

        let result = StateController::with_initial_name(graph(), "Sleep", Npc::default());
        assert!(matches!(result, Err(FsmError::UnknownStateName { .. })));
    }

    #[test]
    fn tick_runs_current_state_and_reports_change() {
        let mut controller =
            StateController::with_initial_name(graph(), "Patrol", Npc::default()).unwrap();

        let outcome = controller.tick().unwrap();
        assert!(!outcome.changed());
        assert_eq!(controller.context().steps, 1);

        controller.context_mut().alerted = true;
        let outcome = controller.tick().unwrap();
        assert!(outcome.changed());
        assert_eq!(outcome.tick, 1);
        assert_eq!(controller.current_state_name(), "Alert");
        assert_eq!(controller.context().steps, 2);
        assert_eq!(controller.ticks(), 2);
    }

    #[test]
    fn history_records_only_real_changes() {
        let mut controller =
            StateController::with_initial_name(graph(), "Patrol", Npc::default()).unwrap();

        controller.run(3).unwrap();
        assert!(controller.history().is_empty());

        controller.context_mut().alerted = true;
        controller.tick().unwrap();
        controller.context_mut().alerted = false;
        controller.tick().unwrap();

        let names: Vec<&str> = controller
            .history()
            .get_path()
            .into_iter()
            .map(|id| controller.graph().name_of(id).unwrap())
            .collect();
        assert_eq!(names, vec!["Patrol", "Alert", "Patrol"]);
        assert_eq!(controller.history().transitions()[0].tick, 3);
    }

    #[test]
    fn history_can_be_disabled() {
        let mut controller = StateController::with_initial_name(graph(), "Patrol", Npc::default())
            .unwrap()
            .with_config(ControllerConfig {
                record_history: false,
                history_limit: None,
            });

        controller.context_mut().alerted = true;
        controller.tick().unwrap();

        assert_eq!(controller.current_state_name(), "Alert");
        assert!(controller.history().is_empty());
    }

    #[test]
    fn with_config_keeps_recorded_history() {
        let mut controller =
            StateController::with_initial_name(graph(), "Patrol", Npc::default()).unwrap();
        controller.context_mut().alerted = true;
        controller.tick().unwrap();
        controller.context_mut().alerted = false;
        controller.tick().unwrap();

        let controller = controller.with_config(ControllerConfig {
            record_history: true,
            history_limit: Some(1),
        });

        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.history().limit(), Some(1));
        assert_eq!(controller.history().transitions()[0].tick, 1);
    }

    #[test]
    fn switching_to_unknown_state_is_an_error() {
        let mut controller =
            StateController::with_initial_name(graph(), "Patrol", Npc::default()).unwrap();

        let err = controller.transition_to_state(StateId::new(42)).unwrap_err();
        assert!(matches!(err, FsmError::UnknownState { id } if id.index() == 42));
        assert_eq!(controller.current_state_name(), "Patrol");
    }

    #[test]
    fn failed_tick_still_counts_and_keeps_partial_effects() {
        let graph = StateGraphBuilder::new()
            .state(
                StateBuilder::new("Broken")
                    .action(action_fn("step", |n: &mut u32| {
                        *n += 1;
                        Ok(())
                    }))
                    .action(action_fn("fail", |_: &mut u32| {
                        Err(CapabilityError::msg("out of ammo"))
                    }))
                    .when(Arc::new(Constant(true)), "Broken", "Broken"),
            )
            .build()
            .unwrap();
        let mut controller = StateController::with_initial_name(Arc::new(graph), "Broken", 0u32).unwrap();

        assert!(controller.tick().is_err());
        assert_eq!(*controller.context(), 1);
        assert_eq!(controller.ticks(), 1);
    }

    #[test]
    fn controllers_share_one_graph() {
        let shared = graph();
        let mut calm = StateController::with_initial_name(Arc::clone(&shared), "Patrol", Npc::default()).unwrap();
        let mut alarmed = StateController::with_initial_name(
            Arc::clone(&shared),
            "Patrol",
            Npc {
                alerted: true,
                steps: 0,
            },
        )
        .unwrap();

        calm.tick().unwrap();
        alarmed.tick().unwrap();

        assert_eq!(calm.current_state_name(), "Patrol");
        assert_eq!(alarmed.current_state_name(), "Alert");
        assert_ne!(calm.id(), alarmed.id());
    }
}
