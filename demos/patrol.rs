//! Patrolling guard
//!
//! A guard walks a loop of waypoints, chases the player once they come
//! close, and goes back to patrolling when the player gets away. The graph
//! is authored as JSON and compiled against a capability registry, so the
//! same definition could be loaded from a file.
//!
//! Run with: RUST_LOG=pluggable_ai=debug cargo run --example patrol

use pluggable_ai::authoring::{CapabilityRegistry, GraphDef};
use pluggable_ai::checkpoint::Checkpoint;
use pluggable_ai::controller::StateController;
use pluggable_ai::core::{action_fn, decision_fn, CapabilityError, Controller};
use std::sync::Arc;

const GRAPH: &str = r#"{
    "states": [
        {
            "name": "Patrol",
            "color": { "r": 0.2, "g": 0.8, "b": 0.2, "a": 1.0 },
            "actions": [{ "kind": "walk_waypoints" }],
            "transitions": [
                {
                    "decision": { "kind": "player_within", "params": { "range": 3.0 } },
                    "true_state": "Chase",
                    "false_state": "Patrol"
                }
            ]
        },
        {
            "name": "Chase",
            "color": { "r": 0.9, "g": 0.1, "b": 0.1, "a": 1.0 },
            "actions": [{ "kind": "move_to_player" }],
            "transitions": [
                {
                    "decision": { "kind": "player_within", "params": { "range": 6.0 }, "negate": true },
                    "true_state": "Patrol",
                    "false_state": "Chase"
                }
            ]
        }
    ]
}"#;

#[derive(Debug)]
struct Guard {
    position: f32,
    waypoints: Vec<f32>,
    next_waypoint: usize,
    player: f32,
}

fn registry() -> CapabilityRegistry<Guard> {
    CapabilityRegistry::new()
        .with_action("walk_waypoints", |_| {
            Ok(action_fn("walk_waypoints", |g: &mut Guard| {
                let target = *g
                    .waypoints
                    .get(g.next_waypoint)
                    .ok_or_else(|| CapabilityError::msg("guard has no waypoints"))?;
                g.position += (target - g.position).clamp(-1.0, 1.0);
                if (target - g.position).abs() < f32::EPSILON {
                    g.next_waypoint = (g.next_waypoint + 1) % g.waypoints.len();
                }
                Ok(())
            }))
        })
        .with_action("move_to_player", |_| {
            Ok(action_fn("move_to_player", |g: &mut Guard| {
                g.position += (g.player - g.position).clamp(-1.5, 1.5);
                Ok(())
            }))
        })
        .with_decision("player_within", |params| {
            let range = params
                .get("range")
                .and_then(|v| v.as_f64())
                .ok_or_else(|| CapabilityError::msg("player_within needs a numeric range"))?
                as f32;
            Ok(decision_fn("player_within", move |g: &Guard| {
                Ok((g.player - g.position).abs() <= range)
            }))
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== Patrolling Guard ===\n");

    let graph = Arc::new(GraphDef::from_json(GRAPH)?.compile(&registry())?);
    let guard = Guard {
        position: 0.0,
        waypoints: vec![4.0, 0.0],
        next_waypoint: 0,
        player: 20.0,
    };
    let mut controller = StateController::with_initial_name(Arc::clone(&graph), "Patrol", guard)?;

    // The player wanders in, then runs off.
    let player_path = [20.0, 12.0, 7.0, 5.0, 5.0, 9.0, 15.0, 25.0];
    for player in player_path {
        controller.context_mut().player = player;
        let outcome = controller.tick()?;
        println!(
            "tick {:>2}: player at {:>5.1}, guard at {:>5.1}, state {}{}",
            outcome.tick,
            player,
            controller.context().position,
            controller.current_state_name(),
            if outcome.changed() { "  <- changed" } else { "" }
        );
    }

    println!("\nState path:");
    let path: Vec<&str> = controller
        .history()
        .get_path()
        .into_iter()
        .filter_map(|id| graph.name_of(id))
        .collect();
    println!("  {}", path.join(" -> "));

    let checkpoint = controller.checkpoint().to_json()?;
    let restored = Checkpoint::from_json(&checkpoint)?;
    let resumed = StateController::resume(
        graph,
        &restored,
        Guard {
            position: 0.0,
            waypoints: vec![4.0, 0.0],
            next_waypoint: 0,
            player: 25.0,
        },
    )?;
    println!(
        "\nResumed controller {} in {} after {} ticks",
        resumed.id(),
        resumed.current_state_name(),
        resumed.ticks()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
