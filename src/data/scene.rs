//! Built-in fallback scene. Mirrors `assets/data/scene.ron` so the game
//! still boots when the data file is missing or unreadable.

use crate::shared::*;

fn node(id: &str, lines: &[&str], command: Option<NodeCommand>) -> DialogueNodeDef {
    DialogueNodeDef {
        id: id.to_string(),
        lines: lines.iter().map(|line| line.to_string()).collect(),
        command,
    }
}

fn object(
    id: &str,
    pos: (f32, f32),
    item: Option<&str>,
    dialogue_node: Option<&str>,
    collectable: bool,
) -> InteractableDef {
    InteractableDef {
        id: id.to_string(),
        pos,
        item: item.map(str::to_string),
        node: dialogue_node.map(str::to_string),
        collectable,
    }
}

pub fn builtin_scene() -> SceneDef {
    SceneDef {
        player: PlayerDef {
            spawn: (0.0, -70.0),
            speed: 90.0,
        },
        cat: CatDef {
            spawn: (100.0, 50.0),
            speed: 60.0,
            detection_radius: 56.0,
            stop_radius: 10.0,
            wait_time: 2.5,
            waypoints: vec![
                (100.0, 50.0),
                (-100.0, 50.0),
                (-100.0, -50.0),
                (100.0, -50.0),
            ],
        },
        intro_node: Some("intro".to_string()),
        caught_node: Some("caught".to_string()),
        variables: vec![
            ("catnip_count".to_string(), 0.0),
            ("mouse_toy_count".to_string(), 0.0),
        ],
        interactables: vec![
            object("yarn_basket", (-70.0, 20.0), None, Some("yarn_basket"), false),
            object(
                "catnip_sprig",
                (60.0, -30.0),
                Some("catnip"),
                Some("catnip_sprig"),
                true,
            ),
            object(
                "catnip_jar",
                (-40.0, -58.0),
                Some("catnip"),
                Some("catnip_jar"),
                true,
            ),
            object(
                "mouse_toy",
                (30.0, 64.0),
                Some("mouse_toy"),
                Some("mouse_toy"),
                true,
            ),
            object("front_door", (0.0, -88.0), None, Some("front_door"), false),
        ],
        dialogue: vec![
            node(
                "intro",
                &[
                    "Home at last. The cat is making its rounds, and it does not \
                     share the apartment gladly.",
                    "Grab your things and slip out the front door. Stay out of its way.",
                ],
                None,
            ),
            node(
                "yarn_basket",
                &["A basket of yarn. Every strand is wound tight — the cat has \
                   clearly been at it."],
                None,
            ),
            node(
                "catnip_sprig",
                &[
                    "A sprig of catnip, a little chewed. You pocket it.",
                    "That makes $catnip_count so far.",
                ],
                None,
            ),
            node(
                "catnip_jar",
                &[
                    "The good jar, hidden behind the plant pot. Into the bag it goes.",
                    "That makes $catnip_count so far.",
                ],
                None,
            ),
            node(
                "mouse_toy",
                &[
                    "The felt mouse. Its tail has seen better days.",
                    "Mouse toys collected: $mouse_toy_count.",
                ],
                None,
            ),
            node(
                "front_door",
                &[
                    "The hallway is clear.",
                    "You ease the door shut behind you and tiptoe down the stairs.",
                ],
                Some(NodeCommand::EndGame),
            ),
            node(
                "caught",
                &[
                    "A weight lands on your shoulders. The cat has you.",
                    "There is no arguing with a cat that has made up its mind. \
                     Maybe tomorrow.",
                ],
                Some(NodeCommand::EndGame),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scene_is_internally_consistent() {
        let scene = builtin_scene();
        let node_ids: Vec<&str> = scene.dialogue.iter().map(|n| n.id.as_str()).collect();

        // Every referenced node must exist.
        for obj in &scene.interactables {
            if let Some(node) = &obj.node {
                assert!(
                    node_ids.contains(&node.as_str()),
                    "interactable '{}' references missing node '{}'",
                    obj.id,
                    node
                );
            }
        }
        for special in [&scene.intro_node, &scene.caught_node].into_iter().flatten() {
            assert!(node_ids.contains(&special.as_str()));
        }

        // Every collectable's counter must be declared or collection
        // silently stops counting.
        for obj in &scene.interactables {
            if obj.collectable {
                let item = obj.item.as_ref().expect("collectable without item name");
                let key = format!("{item}_count");
                assert!(
                    scene.variables.iter().any(|(name, _)| *name == key),
                    "variable '{key}' not declared"
                );
            }
        }
    }

    #[test]
    fn builtin_scene_can_end_the_game() {
        let scene = builtin_scene();
        assert!(scene
            .dialogue
            .iter()
            .any(|n| n.command == Some(NodeCommand::EndGame)));
    }

    #[test]
    fn builtin_cat_config_respects_radius_ordering() {
        // Not enforced by the agent; the scene has to get it right.
        let cat = builtin_scene().cat;
        assert!(cat.stop_radius <= cat.detection_radius);
        assert!(!cat.waypoints.is_empty());
        assert!(cat.wait_time > 0.0);
    }
}
