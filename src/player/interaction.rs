use bevy::prelude::*;

use super::facing_vec;
use crate::shared::*;

/// On an interact press, find the closest interactable in front of the
/// player and hand it off as an `InteractEvent`. The world domain decides
/// what the interaction actually does.
pub fn interact_dispatch(
    input: Res<PlayerInput>,
    player_query: Query<(&Transform, &PlayerMovement), With<Player>>,
    interactables: Query<(Entity, &Transform), With<Interactable>>,
    mut events: EventWriter<InteractEvent>,
) {
    if !input.interact {
        return;
    }

    let Ok((transform, movement)) = player_query.get_single() else {
        return;
    };

    let origin = transform.translation.truncate();
    let forward = facing_vec(&movement.facing);

    // Closest object within range whose offset lies in the facing cone.
    let mut closest: Option<(Entity, f32)> = None;
    for (entity, obj_transform) in interactables.iter() {
        let offset = obj_transform.translation.truncate() - origin;
        let dist = offset.length();
        if dist > INTERACT_RANGE {
            continue;
        }
        // Standing on top of the object counts; otherwise it has to be
        // roughly in front of us (within ~60 degrees of facing).
        if dist > 1.0 && offset.normalize().dot(forward) < 0.5 {
            continue;
        }
        match closest {
            None => closest = Some((entity, dist)),
            Some((_, best)) if dist < best => closest = Some((entity, dist)),
            _ => {}
        }
    }

    if let Some((target, _)) = closest {
        events.send(InteractEvent { target });
    }
}
