use bevy::prelude::*;

use crate::shared::*;

/// Spawn the player at the scene's start position.
pub fn spawn_player(
    mut commands: Commands,
    registry: Res<SceneRegistry>,
    existing: Query<(), With<Player>>,
) {
    if !existing.is_empty() {
        return;
    }
    let Some(scene) = &registry.scene else {
        error!("No scene loaded; player not spawned");
        return;
    };

    commands.spawn((
        Player,
        PlayerMovement {
            speed: scene.player.speed,
            ..default()
        },
        Sprite::from_color(Color::srgb(0.92, 0.8, 0.55), Vec2::new(12.0, 16.0)),
        Transform::from_xyz(scene.player.spawn.0, scene.player.spawn.1, 1.0),
    ));
}
