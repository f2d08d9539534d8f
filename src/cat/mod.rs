//! Cat domain plugin for Catnap.
//!
//! Owns the resident cat: the patrol/pursue state machine in `agent`, the
//! fixed-step system that feeds it, and the movement executor that turns
//! its desired direction into motion. Everything else hears about the cat
//! through `CatStateChangeEvent`.

use bevy::prelude::*;

use crate::shared::*;

pub mod agent;
mod systems;

use agent::{CatAgent, CatConfig};

pub struct CatPlugin;

impl Plugin for CatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_cat);

        // The agent runs on the fixed clock: think first, then walk.
        app.add_systems(
            FixedUpdate,
            (
                systems::check_cat_target,
                systems::cat_think,
                systems::cat_walk,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// The cat entity: its brain plus how fast the executor walks it.
#[derive(Component)]
pub struct Cat {
    pub agent: CatAgent,
    pub speed: f32,
}

/// Per-step output of the brain, consumed by the movement executor.
#[derive(Component, Debug, Clone, Default)]
pub struct CatMovement {
    pub desired_dir: Vec2,
    pub facing: Facing,
    pub is_moving: bool,
}

/// Spawn the cat from scene data. An empty patrol route is fatal: reported
/// once, cat not spawned.
fn spawn_cat(
    mut commands: Commands,
    registry: Res<SceneRegistry>,
    time: Res<Time<Fixed>>,
    existing: Query<(), With<Cat>>,
) {
    if !existing.is_empty() {
        return;
    }
    let Some(scene) = &registry.scene else {
        error!("No scene loaded; cat not spawned");
        return;
    };

    let def = &scene.cat;
    let config = CatConfig {
        waypoints: def.waypoints.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        detection_radius: def.detection_radius,
        stop_radius: def.stop_radius,
        wait_time: def.wait_time,
    };

    let agent = match CatAgent::new(config, time.elapsed_secs()) {
        Ok(agent) => agent,
        Err(err) => {
            error!("{err}; cat not spawned");
            return;
        }
    };

    commands.spawn((
        Cat {
            agent,
            speed: def.speed,
        },
        CatMovement::default(),
        Sprite::from_color(Color::srgb(0.45, 0.42, 0.5), Vec2::new(16.0, 12.0)),
        Transform::from_xyz(def.spawn.0, def.spawn.1, 1.0),
    ));

    info!(
        "Cat spawned at ({}, {}) with {} patrol spots",
        def.spawn.0,
        def.spawn.1,
        def.waypoints.len()
    );
}
