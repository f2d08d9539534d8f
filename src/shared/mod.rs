//! Shared components, resources, events, and states for Catnap.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Dialogue,
    /// End-game fade-out; gameplay is over, we are only waiting to quit.
    Ending,
}

// ═══════════════════════════════════════════════════════════════════════
// CAT — behavioral state, shared so other domains can react to it
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatState {
    Waiting,
    Patrolling,
    Pursuing,
    Caught,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Default for Facing {
    fn default() -> Self {
        Facing::Down
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

#[derive(Component, Debug, Clone)]
pub struct PlayerMovement {
    pub facing: Facing,
    pub is_moving: bool,
    pub speed: f32,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self {
            facing: Facing::Down,
            is_moving: false,
            speed: 90.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INTERACTABLES
// ═══════════════════════════════════════════════════════════════════════

/// An object the player can interact with: examine, collect, or both.
#[derive(Component, Debug, Clone)]
pub struct Interactable {
    pub id: String,
    /// Item name used for the `<item>_count` dialogue variable.
    pub item: Option<String>,
    /// Dialogue node started on interaction, if any.
    pub node: Option<String>,
    pub collectable: bool,
    pub collected: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT — hardware-independent game actions
// ═══════════════════════════════════════════════════════════════════════

/// Which slice of the keymap is live. Derived from GameState every frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Disabled,
    Gameplay,
    Dialogue,
}

/// Per-frame game actions. Reset and repopulated in PreUpdate.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Normalized movement axis (zero when idle or outside Gameplay).
    pub move_axis: Vec2,
    /// Interact / advance-dialogue, edge-triggered.
    pub interact: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::KeyE,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCENE DEFINITIONS — loaded from assets/data/scene.ron
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    pub spawn: (f32, f32),
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatDef {
    pub spawn: (f32, f32),
    pub speed: f32,
    pub detection_radius: f32,
    pub stop_radius: f32,
    /// Nominal idle seconds between patrol legs.
    pub wait_time: f32,
    pub waypoints: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractableDef {
    pub id: String,
    pub pos: (f32, f32),
    pub item: Option<String>,
    pub node: Option<String>,
    pub collectable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCommand {
    /// Fade to black and quit once the node's dialogue closes.
    EndGame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueNodeDef {
    pub id: String,
    pub lines: Vec<String>,
    pub command: Option<NodeCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDef {
    pub player: PlayerDef,
    pub cat: CatDef,
    /// Node started after the intro fade, if declared.
    pub intro_node: Option<String>,
    /// Node started when the cat catches the player, if declared.
    pub caught_node: Option<String>,
    /// Dialogue variables and their starting values. Collect counters
    /// must be declared here or collection will not track them.
    pub variables: Vec<(String, f32)>,
    pub interactables: Vec<InteractableDef>,
    pub dialogue: Vec<DialogueNodeDef>,
}

// ═══════════════════════════════════════════════════════════════════════
// REGISTRIES — populated by the data domain during Loading
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct SceneRegistry {
    pub scene: Option<SceneDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DialogueLibrary {
    pub nodes: HashMap<String, DialogueNodeDef>,
}

impl DialogueLibrary {
    pub fn get(&self, id: &str) -> Option<&DialogueNodeDef> {
        self.nodes.get(id)
    }
}

/// Dialogue-visible variable storage (`$name` in node lines).
#[derive(Resource, Debug, Clone, Default)]
pub struct DialogueVariables {
    pub values: HashMap<String, f32>,
}

impl DialogueVariables {
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    pub fn set(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), value);
    }
}

/// The dialogue currently on screen. Inserted by the runner when a node
/// starts, removed when it ends.
#[derive(Resource, Debug, Clone)]
pub struct ActiveDialogue {
    pub node_id: String,
    pub lines: Vec<String>,
    pub current_line: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// The player interacted with an object.
#[derive(Event, Debug, Clone)]
pub struct InteractEvent {
    pub target: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueStartEvent {
    pub node_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueEndEvent {
    pub node_id: String,
}

/// Emitted exactly on cat state-transition edges, never on steady state.
#[derive(Event, Debug, Clone, Copy)]
pub struct CatStateChangeEvent {
    pub from: CatState,
    pub to: CatState,
}

/// Request the end-game fade-out and quit.
#[derive(Event, Debug, Clone)]
pub struct GameEndEvent;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale for the low-res look

/// How far in front of the player an interactable can be picked up.
pub const INTERACT_RANGE: f32 = 24.0;

/// Seconds the end-game fade holds on black before quitting.
pub const EXIT_HOLD_SECS: f32 = 1.0;

pub const SCENE_PATH: &str = "assets/data/scene.ron";
