use bevy::app::AppExit;
use bevy::prelude::*;

use crate::shared::*;

/// Marker for the screen fade overlay
#[derive(Component)]
pub struct ScreenFadeOverlay;

/// Resource that drives fade in/out
#[derive(Resource)]
pub struct ScreenFade {
    /// Current opacity 0.0 (transparent) to 1.0 (opaque black)
    pub alpha: f32,
    /// Target opacity
    pub target_alpha: f32,
    /// Speed of fade (alpha units per second)
    pub speed: f32,
    /// Whether a fade is actively running
    pub active: bool,
}

impl Default for ScreenFade {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            target_alpha: 0.0,
            speed: 3.0,
            active: false,
        }
    }
}

/// Tracks the one-time game-start sequence: fade in from black, then start
/// the scene's intro dialogue.
#[derive(Resource, Debug, Default)]
pub struct IntroSequence {
    pub fade_started: bool,
    pub dialogue_sent: bool,
}

/// Present only while the end-game sequence runs: once the screen is fully
/// black, hold briefly, then quit.
#[derive(Resource)]
pub struct PendingExit {
    pub hold: Timer,
}

/// Spawn the fade overlay (always present but invisible)
pub fn spawn_fade_overlay(mut commands: Commands) {
    commands.insert_resource(ScreenFade::default());

    commands.spawn((
        ScreenFadeOverlay,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100), // on top of everything
    ));
}

/// First entry into Playing starts the intro fade from black.
pub fn begin_intro_fade(mut fade: ResMut<ScreenFade>, mut intro: ResMut<IntroSequence>) {
    if intro.fade_started {
        return;
    }
    intro.fade_started = true;
    fade.alpha = 1.0;
    fade.target_alpha = 0.0;
    fade.speed = 0.8;
    fade.active = true;
}

/// Animate the fade overlay
pub fn update_fade(
    time: Res<Time>,
    mut fade: ResMut<ScreenFade>,
    mut query: Query<&mut BackgroundColor, With<ScreenFadeOverlay>>,
) {
    if !fade.active {
        return;
    }

    let dt = time.delta_secs();
    let diff = fade.target_alpha - fade.alpha;

    if diff.abs() < 0.01 {
        fade.alpha = fade.target_alpha;
        fade.active = false;
    } else {
        fade.alpha += diff.signum() * fade.speed * dt;
        fade.alpha = fade.alpha.clamp(0.0, 1.0);
    }

    for mut bg in &mut query {
        *bg = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, fade.alpha));
    }
}

/// Once the intro fade has cleared, kick off the scene's intro dialogue.
pub fn start_intro_dialogue(
    fade: Res<ScreenFade>,
    mut intro: ResMut<IntroSequence>,
    registry: Res<SceneRegistry>,
    game_state: Res<State<GameState>>,
    mut dialogue: EventWriter<DialogueStartEvent>,
) {
    if !intro.fade_started || intro.dialogue_sent || fade.active {
        return;
    }
    if *game_state.get() != GameState::Playing {
        return;
    }

    intro.dialogue_sent = true;
    let Some(scene) = &registry.scene else {
        return;
    };
    if let Some(node) = &scene.intro_node {
        dialogue.send(DialogueStartEvent {
            node_id: node.clone(),
        });
    }
}

/// Start the end-game sequence: fade to black and stop gameplay.
pub fn handle_game_end(
    mut commands: Commands,
    mut events: EventReader<GameEndEvent>,
    mut fade: ResMut<ScreenFade>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for _ev in events.read() {
        fade.target_alpha = 1.0;
        fade.speed = 1.0;
        fade.active = true;
        commands.insert_resource(PendingExit {
            hold: Timer::from_seconds(EXIT_HOLD_SECS, TimerMode::Once),
        });
        next_state.set(GameState::Ending);
    }
}

/// Hold on black for a moment, then quit.
pub fn finish_exit(
    time: Res<Time>,
    fade: Res<ScreenFade>,
    pending: Option<ResMut<PendingExit>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    if fade.active || fade.alpha < 1.0 {
        return;
    }

    pending.hold.tick(time.delta());
    if pending.hold.just_finished() {
        exit.send(AppExit::Success);
    }
}
