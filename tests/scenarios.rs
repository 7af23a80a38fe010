//! End-to-end scenarios: authoring a graph, driving controllers, and the
//! failure modes a host has to deal with.

use pluggable_ai::authoring::{AuthoringError, CapabilityRegistry, GraphDef};
use pluggable_ai::builder::{Branch, ConfigError, StateBuilder, StateGraphBuilder, TransitionBuilder};
use pluggable_ai::controller::StateController;
use pluggable_ai::core::{
    action_fn, decision_fn, CapabilityError, Controller, FsmError, Not, SharedAction,
    SharedDecision, State, Transition,
};
use pluggable_ai::graph::{StateGraph, StateId};
use pluggable_ai::TransitionPolicy;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Walker {
    /// Movement readings fed to the agent, one per tick.
    script: VecDeque<bool>,
    moving: bool,
    senses: u32,
}

fn sense() -> SharedAction<Walker> {
    action_fn("sense", |w: &mut Walker| {
        w.moving = w.script.pop_front().unwrap_or(false);
        w.senses += 1;
        Ok(())
    })
}

fn is_moving() -> SharedDecision<Walker> {
    decision_fn("is_moving", |w: &Walker| Ok(w.moving))
}

fn has_stopped() -> SharedDecision<Walker> {
    Arc::new(Not::new(is_moving()))
}

fn idle_walking() -> Arc<StateGraph<Walker>> {
    let graph = StateGraphBuilder::new()
        .state(
            StateBuilder::new("Idle")
                .action(sense())
                .when(is_moving(), "Walking", "Idle"),
        )
        .state(
            StateBuilder::new("Walking")
                .action(sense())
                .when(has_stopped(), "Idle", "Walking"),
        )
        .build()
        .unwrap();
    Arc::new(graph)
}

#[test]
fn idle_walking_idle() {
    let walker = Walker {
        script: VecDeque::from([true, false]),
        ..Walker::default()
    };
    let mut controller = StateController::with_initial_name(idle_walking(), "Idle", walker).unwrap();

    let mut visited = vec![controller.current_state_name().to_string()];
    for _ in 0..2 {
        controller.tick().unwrap();
        visited.push(controller.current_state_name().to_string());
    }

    assert_eq!(visited, vec!["Idle", "Walking", "Idle"]);
    assert_eq!(controller.context().senses, 2);
    assert_eq!(controller.history().len(), 2);
}

#[test]
fn missing_target_is_a_load_time_error() {
    let err = StateGraphBuilder::new()
        .state(
            StateBuilder::new("Idle")
                .transition(TransitionBuilder::new().decision(is_moving()).on_false("Idle")),
        )
        .build()
        .unwrap_err();

    assert_eq!(
        err.problems(),
        &[ConfigError::MissingTarget {
            state: "Idle".to_string(),
            index: 0,
            branch: Branch::True,
        }]
    );
}

#[test]
fn switching_into_a_dangling_target_fails_on_first_use() {
    let mut controller =
        StateController::with_initial_name(idle_walking(), "Idle", Walker::default()).unwrap();
    let rogue = State::new(StateId::new(0), "Rogue").with_transition(Transition::new(
        is_moving(),
        StateId::new(1),
        StateId::new(17),
    ));

    let err = rogue.update_state(&mut controller).unwrap_err();

    assert!(matches!(
        &err,
        FsmError::SwitchFailed { state, index: 0, source }
            if state == "Rogue" && matches!(**source, FsmError::UnknownState { .. })
    ));
    assert!(err.to_string().contains("Rogue"));
    assert_eq!(controller.current_state_name(), "Idle");
}

#[test]
fn decision_failure_reaches_the_host() {
    let blind: SharedDecision<Walker> =
        decision_fn("blind", |_: &Walker| Err(CapabilityError::msg("camera unplugged")));
    let graph = StateGraphBuilder::new()
        .state(StateBuilder::new("Look").action(sense()).when(blind, "Look", "Look"))
        .build()
        .unwrap();
    let mut controller =
        StateController::with_initial_name(Arc::new(graph), "Look", Walker::default()).unwrap();

    let err = controller.tick().unwrap_err();

    assert!(matches!(err, FsmError::DecisionFailed { ref decision, .. } if decision == "blind"));
    assert_eq!(controller.context().senses, 1);
}

#[test]
fn first_match_policy_stops_at_first_exit() {
    let always: SharedDecision<()> = decision_fn("always", |_: &()| Ok(true));
    let graph = StateGraphBuilder::new()
        .policy(TransitionPolicy::FirstMatch)
        .state(
            StateBuilder::new("Hub")
                .when(always.clone(), "Hub", "Hub")
                .when(always.clone(), "Left", "Hub")
                .when(always, "Right", "Hub"),
        )
        .state(StateBuilder::new("Left"))
        .state(StateBuilder::new("Right"))
        .build()
        .unwrap();
    let mut controller = StateController::with_initial_name(Arc::new(graph), "Hub", ()).unwrap();

    controller.tick().unwrap();

    assert_eq!(controller.current_state_name(), "Left");
}

#[test]
fn last_wins_is_the_default_for_the_same_graph() {
    let always: SharedDecision<()> = decision_fn("always", |_: &()| Ok(true));
    let graph = StateGraphBuilder::new()
        .state(
            StateBuilder::new("Hub")
                .when(always.clone(), "Left", "Hub")
                .when(always, "Right", "Hub"),
        )
        .state(StateBuilder::new("Left"))
        .state(StateBuilder::new("Right"))
        .build()
        .unwrap();
    let mut controller = StateController::with_initial_name(Arc::new(graph), "Hub", ()).unwrap();

    controller.tick().unwrap();

    assert_eq!(controller.current_state_name(), "Right");
    let path: Vec<usize> = controller
        .history()
        .get_path()
        .into_iter()
        .map(StateId::index)
        .collect();
    assert_eq!(path, vec![0, 1, 2]);
}

#[test]
fn authored_graph_drives_a_controller() {
    let registry = CapabilityRegistry::<Walker>::new()
        .with_action("sense", |_| Ok(sense()))
        .with_decision("is_moving", |_| Ok(is_moving()));
    let def = GraphDef::from_json(
        r#"{
            "states": [
                {
                    "name": "Idle",
                    "actions": [{ "kind": "sense" }],
                    "transitions": [
                        { "decision": { "kind": "is_moving" }, "true_state": "Walking", "false_state": "Idle" }
                    ]
                },
                {
                    "name": "Walking",
                    "actions": [{ "kind": "sense" }],
                    "transitions": [
                        { "decision": { "kind": "is_moving", "negate": true }, "true_state": "Idle", "false_state": "Walking" }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    let graph = Arc::new(def.compile(&registry).unwrap());
    let walker = Walker {
        script: VecDeque::from([false, true, true, false]),
        ..Walker::default()
    };
    let mut controller = StateController::with_initial_name(graph, "Idle", walker).unwrap();

    let names: Vec<String> = (0..4)
        .map(|_| {
            controller.tick().unwrap();
            controller.current_state_name().to_string()
        })
        .collect();

    assert_eq!(names, vec!["Idle", "Walking", "Walking", "Idle"]);
}

#[test]
fn authored_graph_with_unknown_target_is_rejected() {
    let def = GraphDef::from_json(
        r#"{
            "states": [
                {
                    "name": "Idle",
                    "transitions": [
                        { "decision": { "kind": "constant", "params": { "value": true } }, "true_state": "Sprint", "false_state": "Idle" }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    let err = def.compile(&CapabilityRegistry::<()>::new()).unwrap_err();

    match err {
        AuthoringError::Invalid(err) => assert_eq!(
            err.problems(),
            &[ConfigError::UnresolvedTarget {
                state: "Idle".to_string(),
                index: 0,
                branch: Branch::True,
                target: "Sprint".to_string(),
            }]
        ),
        other => panic!("expected an invalid graph, got {other}"),
    }
}

#[test]
fn one_graph_serves_controllers_on_many_threads() {
    let graph = idle_walking();

    let finals: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = [vec![true], vec![true, false], vec![]]
            .into_iter()
            .map(|script| {
                let graph = Arc::clone(&graph);
                scope.spawn(move || {
                    let walker = Walker {
                        script: script.into(),
                        ..Walker::default()
                    };
                    let mut controller =
                        StateController::with_initial_name(graph, "Idle", walker).unwrap();
                    controller.run(2).unwrap();
                    controller.current_state_name().to_string()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(finals, vec!["Idle", "Idle", "Idle"]);
}
