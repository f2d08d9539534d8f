//! Dialogue runner: resolves node ids into on-screen lines, owns the
//! `Dialogue` game state, and executes per-node commands when a node
//! closes. The UI box only displays and advances; everything stateful
//! happens here.

use bevy::prelude::*;

use crate::shared::*;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (react_to_caught, start_dialogue)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );

        // Node commands run while leaving Dialogue; never gate this on state.
        app.add_systems(Update, finish_dialogue);
    }
}

/// The notification-sink consumer: when the cat catches the player and the
/// scene declares a caught node, start it.
fn react_to_caught(
    mut notifications: EventReader<CatStateChangeEvent>,
    registry: Res<SceneRegistry>,
    mut dialogue: EventWriter<DialogueStartEvent>,
) {
    for ev in notifications.read() {
        if ev.to != CatState::Caught {
            continue;
        }
        let Some(scene) = &registry.scene else {
            continue;
        };
        if let Some(node) = &scene.caught_node {
            dialogue.send(DialogueStartEvent {
                node_id: node.clone(),
            });
        }
    }
}

/// Open a dialogue node: expand its lines against the variable storage and
/// switch to the Dialogue state. Unknown nodes warn and are dropped.
fn start_dialogue(
    mut commands: Commands,
    mut events: EventReader<DialogueStartEvent>,
    library: Res<DialogueLibrary>,
    vars: Res<DialogueVariables>,
    active: Option<Res<ActiveDialogue>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut open = active.is_some();

    for ev in events.read() {
        if open {
            continue;
        }
        let Some(node) = library.get(&ev.node_id) else {
            warn!("Unknown dialogue node '{}'", ev.node_id);
            continue;
        };

        let mut lines: Vec<String> = node
            .lines
            .iter()
            .map(|line| expand_variables(line, &vars))
            .collect();
        if lines.is_empty() {
            lines.push("...".to_string());
        }

        commands.insert_resource(ActiveDialogue {
            node_id: ev.node_id.clone(),
            lines,
            current_line: 0,
        });
        next_state.set(GameState::Dialogue);
        open = true;
    }
}

/// Tear down the finished dialogue and run the node's command, if any.
fn finish_dialogue(
    mut commands: Commands,
    mut events: EventReader<DialogueEndEvent>,
    library: Res<DialogueLibrary>,
    mut game_end: EventWriter<GameEndEvent>,
) {
    for ev in events.read() {
        commands.remove_resource::<ActiveDialogue>();

        let Some(node) = library.get(&ev.node_id) else {
            continue;
        };
        match node.command {
            Some(NodeCommand::EndGame) => {
                info!("end_game command from node '{}'", ev.node_id);
                game_end.send(GameEndEvent);
            }
            None => {}
        }
    }
}

/// Replace `$name` tokens with values from the variable storage. Unknown
/// names are left in place. Whole numbers print without a decimal point.
pub fn expand_variables(line: &str, vars: &DialogueVariables) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len == 0 {
            out.push('$');
            rest = after;
            continue;
        }
        let name = &after[..name_len];
        match vars.get(name) {
            Some(value) => out.push_str(&format_value(value)),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

fn format_value(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> DialogueVariables {
        let mut vars = DialogueVariables::default();
        vars.set("catnip_count", 3.0);
        vars.set("half", 0.5);
        vars
    }

    #[test]
    fn expands_declared_variables() {
        assert_eq!(
            expand_variables("You found $catnip_count sprigs.", &vars()),
            "You found 3 sprigs."
        );
    }

    #[test]
    fn whole_numbers_print_without_fraction() {
        assert_eq!(expand_variables("$catnip_count", &vars()), "3");
        assert_eq!(expand_variables("$half", &vars()), "0.5");
    }

    #[test]
    fn unknown_variables_are_left_in_place() {
        assert_eq!(
            expand_variables("Hello $nobody!", &vars()),
            "Hello $nobody!"
        );
    }

    #[test]
    fn bare_dollar_sign_survives() {
        assert_eq!(expand_variables("Costs $ 5", &vars()), "Costs $ 5");
        assert_eq!(expand_variables("end$", &vars()), "end$");
    }

    #[test]
    fn token_stops_at_punctuation() {
        assert_eq!(
            expand_variables("($catnip_count) left", &vars()),
            "(3) left"
        );
    }
}
