use bevy::prelude::*;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct DialogueBoxRoot;

#[derive(Component)]
pub struct DialogueText;

#[derive(Component)]
pub struct DialoguePrompt;

fn prompt_text(is_last: bool) -> &'static str {
    if is_last {
        "[E / Space] Close"
    } else {
        "[E / Space] Continue"
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_dialogue_box(mut commands: Commands, active: Option<Res<ActiveDialogue>>) {
    let first_line = active
        .as_ref()
        .and_then(|d| d.lines.first())
        .cloned()
        .unwrap_or_else(|| "...".to_string());
    let is_last = active.as_ref().map(|d| d.lines.len() <= 1).unwrap_or(true);

    commands
        .spawn((
            DialogueBoxRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                padding: UiRect::bottom(Val::Px(24.0)),
                ..default()
            },
        ))
        .with_children(|parent| {
            // Dialogue panel at the bottom of the screen.
            parent
                .spawn((
                    Node {
                        width: Val::Px(620.0),
                        min_height: Val::Px(110.0),
                        flex_direction: FlexDirection::Column,
                        justify_content: JustifyContent::SpaceBetween,
                        padding: UiRect::all(Val::Px(16.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.08, 0.08, 0.12, 0.92)),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        DialogueText,
                        Text::new(first_line),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.95, 0.95, 0.9)),
                    ));
                    panel.spawn((
                        DialoguePrompt,
                        Text::new(prompt_text(is_last)),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.6, 0.6, 0.65)),
                    ));
                });
        });
}

pub fn despawn_dialogue_box(mut commands: Commands, query: Query<Entity, With<DialogueBoxRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INTERACTION — advance through dialogue lines
// ═══════════════════════════════════════════════════════════════════════

pub fn advance_dialogue(
    input: Res<PlayerInput>,
    active: Option<ResMut<ActiveDialogue>>,
    mut text_query: Query<&mut Text, With<DialogueText>>,
    mut prompt_query: Query<&mut Text, (With<DialoguePrompt>, Without<DialogueText>)>,
    mut next_state: ResMut<NextState<GameState>>,
    mut end_events: EventWriter<DialogueEndEvent>,
) {
    if !input.interact {
        return;
    }

    let Some(mut dialogue) = active else {
        return;
    };

    dialogue.current_line += 1;

    if dialogue.current_line >= dialogue.lines.len() {
        end_events.send(DialogueEndEvent {
            node_id: dialogue.node_id.clone(),
        });
        next_state.set(GameState::Playing);
        return;
    }

    let line = dialogue.lines[dialogue.current_line].clone();
    let is_last = dialogue.current_line >= dialogue.lines.len() - 1;

    for mut text in &mut text_query {
        **text = line.clone();
    }
    for mut text in &mut prompt_query {
        **text = prompt_text(is_last).to_string();
    }
}
