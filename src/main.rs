mod shared;
mod input;
mod data;
mod player;
mod cat;
mod world;
mod dialogue;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Catnap".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<PlayerInput>()
        .init_resource::<InputContext>()
        .init_resource::<KeyBindings>()
        .init_resource::<SceneRegistry>()
        .init_resource::<DialogueLibrary>()
        .init_resource::<DialogueVariables>()
        // Events
        .add_event::<InteractEvent>()
        .add_event::<DialogueStartEvent>()
        .add_event::<DialogueEndEvent>()
        .add_event::<CatStateChangeEvent>()
        .add_event::<GameEndEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(cat::CatPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(dialogue::DialoguePlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE)),
    ));
}
