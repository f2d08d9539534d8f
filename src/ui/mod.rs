pub mod dialogue_box;
pub mod transitions;

use bevy::prelude::*;

use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── FADE OVERLAY — always present ───
        app.init_resource::<transitions::IntroSequence>();
        app.add_systems(Startup, transitions::spawn_fade_overlay);
        app.add_systems(OnEnter(GameState::Playing), transitions::begin_intro_fade);
        app.add_systems(
            Update,
            (
                transitions::update_fade,
                transitions::start_intro_dialogue,
                transitions::handle_game_end,
                transitions::finish_exit,
            )
                .chain(),
        );

        // ─── DIALOGUE BOX — lives exactly as long as the Dialogue state ───
        app.add_systems(OnEnter(GameState::Dialogue), dialogue_box::spawn_dialogue_box);
        app.add_systems(OnExit(GameState::Dialogue), dialogue_box::despawn_dialogue_box);
        app.add_systems(
            Update,
            dialogue_box::advance_dialogue.run_if(in_state(GameState::Dialogue)),
        );
    }
}
