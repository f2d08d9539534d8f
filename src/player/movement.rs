use bevy::prelude::*;

use crate::shared::*;

/// Core movement system — applies the input axis as velocity and keeps the
/// facing direction in sync.
///
/// The axis is already normalized and already zeroed outside the Gameplay
/// input context, so dialogue freezes the player without any checks here.
pub fn player_movement(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut query: Query<(&mut Transform, &mut PlayerMovement), With<Player>>,
) {
    let Ok((mut transform, mut movement)) = query.get_single_mut() else {
        return;
    };

    let dir = input.move_axis;
    if dir == Vec2::ZERO {
        movement.is_moving = false;
        return;
    }

    movement.is_moving = true;

    // Dominant facing axis. Diagonals are ties, biased towards vertical —
    // that reads better in a top-down room when walking up to furniture.
    movement.facing = if dir.y.abs() >= dir.x.abs() {
        if dir.y > 0.0 { Facing::Up } else { Facing::Down }
    } else if dir.x > 0.0 {
        Facing::Right
    } else {
        Facing::Left
    };

    let delta = dir * movement.speed * time.delta_secs();
    transform.translation.x += delta.x;
    transform.translation.y += delta.y;
}
