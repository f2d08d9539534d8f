//! Fixed-step systems around the cat agent: target validation, the think
//! step, and the movement executor.

use bevy::prelude::*;

use super::agent::ConfigError;
use super::{Cat, CatMovement};
use crate::shared::*;

/// One-shot setup check: a cat with no player to track is a configuration
/// error. Reported once, never re-checked per step.
pub fn check_cat_target(
    mut checked: Local<bool>,
    cats: Query<(), With<Cat>>,
    players: Query<(), With<Player>>,
) {
    if *checked || cats.is_empty() {
        return;
    }
    *checked = true;
    if players.is_empty() {
        error!("{}", ConfigError::MissingTarget);
    }
}

/// Feed the agent one fixed step: positions and the fixed clock in,
/// desired direction out. Transition edges become log lines and
/// `CatStateChangeEvent`s; steady state stays silent.
pub fn cat_think(
    time: Res<Time>,
    mut notifications: EventWriter<CatStateChangeEvent>,
    player_query: Query<&Transform, (With<Player>, Without<Cat>)>,
    mut query: Query<(&Transform, &mut Cat, &mut CatMovement)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let target = player_transform.translation.truncate();
    let now = time.elapsed_secs();
    let mut rng = rand::thread_rng();

    for (transform, mut cat, mut movement) in query.iter_mut() {
        let out = cat
            .agent
            .step(transform.translation.truncate(), target, now, &mut rng);
        movement.desired_dir = out.direction;

        for change in out.changes {
            match change.to {
                CatState::Caught => info!("Cat caught the player!"),
                CatState::Pursuing => info!("Cat is pursuing the player"),
                CatState::Patrolling => {
                    info!("Cat patrolling to spot {}", cat.agent.current_waypoint())
                }
                CatState::Waiting => info!("Cat is waiting"),
            }
            notifications.send(CatStateChangeEvent {
                from: change.from,
                to: change.to,
            });
        }
    }
}

/// Movement executor: apply the desired direction at the cat's speed and
/// keep the walk/facing feedback in sync.
pub fn cat_walk(time: Res<Time>, mut query: Query<(&mut Transform, &Cat, &mut CatMovement)>) {
    let dt = time.delta_secs();

    for (mut transform, cat, mut movement) in query.iter_mut() {
        let dir = movement.desired_dir;
        if dir == Vec2::ZERO {
            movement.is_moving = false;
            continue;
        }

        movement.is_moving = true;
        transform.translation.x += dir.x * cat.speed * dt;
        transform.translation.y += dir.y * cat.speed * dt;

        // Dominant axis wins; vertical biased like the player's facing.
        movement.facing = if dir.y.abs() >= dir.x.abs() {
            if dir.y > 0.0 { Facing::Up } else { Facing::Down }
        } else if dir.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        };
    }
}
