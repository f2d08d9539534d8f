mod interaction;
mod movement;
mod spawn;

use bevy::prelude::*;

use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // -- Spawn player when we enter Playing --
        app.add_systems(OnEnter(GameState::Playing), spawn::spawn_player);

        // -- Systems that run every frame while Playing --
        app.add_systems(
            Update,
            (
                movement::player_movement,
                interaction::interact_dispatch,
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Helpers shared across sub-modules
// ═══════════════════════════════════════════════════════════════════════

/// Get the facing direction as a world-space unit vector.
pub fn facing_vec(facing: &Facing) -> Vec2 {
    match facing {
        Facing::Up => Vec2::Y,
        Facing::Down => Vec2::NEG_Y,
        Facing::Left => Vec2::NEG_X,
        Facing::Right => Vec2::X,
    }
}
