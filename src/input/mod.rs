use bevy::prelude::*;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (reset_and_read_input, manage_input_context).chain(),
        );
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    match *context {
        InputContext::Disabled => {}

        InputContext::Gameplay => {
            let mut axis = Vec2::ZERO;
            if keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp) {
                axis.y += 1.0;
            }
            if keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown) {
                axis.y -= 1.0;
            }
            if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
                axis.x -= 1.0;
            }
            if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
                axis.x += 1.0;
            }
            input.move_axis = if axis != Vec2::ZERO {
                axis.normalize()
            } else {
                Vec2::ZERO
            };

            input.interact =
                keys.just_pressed(bindings.interact) || keys.just_pressed(KeyCode::Space);
        }

        InputContext::Dialogue => {
            input.interact = keys.just_pressed(bindings.interact)
                || keys.just_pressed(KeyCode::Space)
                || keys.just_pressed(KeyCode::Enter);
        }
    }
}

/// Derives InputContext from GameState. ONE system, replaces per-domain guards.
fn manage_input_context(game_state: Res<State<GameState>>, mut context: ResMut<InputContext>) {
    *context = match *game_state.get() {
        GameState::Loading => InputContext::Disabled,
        GameState::Playing => InputContext::Gameplay,
        GameState::Dialogue => InputContext::Dialogue,
        GameState::Ending => InputContext::Disabled,
    };
}
