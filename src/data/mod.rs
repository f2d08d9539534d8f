//! Data layer — loads the scene definition at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), reads the scene from
//! `assets/data/scene.ron` (falling back to the built-in scene if the file
//! is missing or malformed), fills the registries (SceneRegistry,
//! DialogueLibrary, DialogueVariables), then transitions into Playing.
//!
//! No other domain needs to seed these resources; domain plugins can
//! safely read them once GameState has advanced past Loading.

pub mod scene;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_scene);
    }
}

/// Single system that populates every registry and then transitions to
/// Playing.
fn load_scene(
    mut scene_registry: ResMut<SceneRegistry>,
    mut library: ResMut<DialogueLibrary>,
    mut vars: ResMut<DialogueVariables>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let scene = match read_scene_file(SCENE_PATH) {
        Ok(scene) => {
            info!("Scene loaded from {}", SCENE_PATH);
            scene
        }
        Err(err) => {
            warn!("Falling back to built-in scene: {}", err);
            scene::builtin_scene()
        }
    };

    for node in &scene.dialogue {
        library.nodes.insert(node.id.clone(), node.clone());
    }
    for (name, value) in &scene.variables {
        vars.set(name, *value);
    }

    info!(
        "  Dialogue nodes loaded: {}, variables declared: {}, interactables: {}",
        library.nodes.len(),
        vars.values.len(),
        scene.interactables.len()
    );

    scene_registry.scene = Some(scene);
    next_state.set(GameState::Playing);
}

/// Read and parse a scene file.
pub fn read_scene_file(path: &str) -> Result<SceneDef, String> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("Reading {} failed: {}", path, e))?;
    ron::from_str(&text).map_err(|e| format!("Parsing {} failed: {}", path, e))
}
