//! World domain: the interactable objects in the apartment.
//!
//! Objects respond to `InteractEvent`: collectables bump their dialogue
//! counter and are despawned once their dialogue closes (immediately when
//! they have none); anything with a dialogue node starts it.

use bevy::prelude::*;

use crate::shared::*;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_interactables);

        app.add_systems(
            Update,
            handle_interactions.run_if(in_state(GameState::Playing)),
        );

        // Runs regardless of state: the end event fires while we are
        // transitioning out of Dialogue and must not be missed.
        app.add_systems(Update, despawn_collected);
    }
}

/// Spawn every interactable the scene declares.
fn spawn_interactables(
    mut commands: Commands,
    registry: Res<SceneRegistry>,
    existing: Query<(), With<Interactable>>,
) {
    if !existing.is_empty() {
        return;
    }
    let Some(scene) = &registry.scene else {
        error!("No scene loaded; interactables not spawned");
        return;
    };

    for def in &scene.interactables {
        let color = if def.collectable {
            Color::srgb(0.45, 0.7, 0.4)
        } else {
            Color::srgb(0.5, 0.55, 0.75)
        };
        commands.spawn((
            Interactable {
                id: def.id.clone(),
                item: def.item.clone(),
                node: def.node.clone(),
                collectable: def.collectable,
                collected: false,
            },
            Sprite::from_color(color, Vec2::splat(10.0)),
            Transform::from_xyz(def.pos.0, def.pos.1, 0.5),
        ));
    }

    info!("Interactables spawned: {}", scene.interactables.len());
}

/// Resolve interactions: count collectables, start dialogue, or despawn
/// straight away when there is nothing to say.
fn handle_interactions(
    mut commands: Commands,
    mut events: EventReader<InteractEvent>,
    mut query: Query<&mut Interactable>,
    mut vars: ResMut<DialogueVariables>,
    mut dialogue: EventWriter<DialogueStartEvent>,
) {
    for ev in events.read() {
        let Ok(mut obj) = query.get_mut(ev.target) else {
            continue;
        };

        if obj.collectable {
            // Only counters the scene declared are tracked.
            if let Some(item) = &obj.item {
                let key = format!("{item}_count");
                if let Some(count) = vars.get(&key) {
                    vars.set(&key, count + 1.0);
                }
            }
            obj.collected = true;
        }

        match &obj.node {
            Some(node) if !node.is_empty() => {
                dialogue.send(DialogueStartEvent {
                    node_id: node.clone(),
                });
            }
            _ if obj.collected => {
                commands.entity(ev.target).despawn();
            }
            _ => {}
        }
    }
}

/// Once any dialogue closes, collected objects disappear.
fn despawn_collected(
    mut commands: Commands,
    mut events: EventReader<DialogueEndEvent>,
    query: Query<(Entity, &Interactable)>,
) {
    let mut ended = false;
    for _ev in events.read() {
        ended = true;
    }
    if !ended {
        return;
    }

    for (entity, obj) in query.iter() {
        if obj.collected {
            info!("Collected {}", obj.id);
            commands.entity(entity).despawn();
        }
    }
}
