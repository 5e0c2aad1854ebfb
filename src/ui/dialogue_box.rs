use bevy::prelude::*;

use super::menu_kit::MenuTheme;
use crate::shared::*;

pub const CONTINUE_PROMPT: &str = "Press E to continue...";

#[derive(Component)]
pub struct DialogueBoxRoot;

#[derive(Component)]
pub struct DialogueSpeaker;

#[derive(Component)]
pub struct DialogueText;

/// Apply queued show / hide requests from the dialogue service. Only the
/// last request of a frame matters.
pub fn apply_dialogue_commands(
    mut commands: Commands,
    pending: Option<Res<PendingDialogue>>,
    theme: Res<MenuTheme>,
    existing: Query<Entity, With<DialogueBoxRoot>>,
) {
    let Some(pending) = pending else {
        return;
    };
    let Some(last) = pending.0.drain().pop() else {
        return;
    };

    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }
    if let DialogueCommand::Show { speaker, text } = last {
        spawn_dialogue_box(&mut commands, &theme, &speaker, &text);
    }
}

fn spawn_dialogue_box(commands: &mut Commands, theme: &MenuTheme, speaker: &str, text: &str) {
    commands
        .spawn((
            DialogueBoxRoot,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(16.0),
                left: Val::Percent(10.0),
                width: Val::Percent(80.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(14.0)),
                row_gap: Val::Px(6.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(theme.panel_bg.with_alpha(0.92)),
            BorderColor(theme.panel_border),
            GlobalZIndex(40),
            Name::new("DialogueBox"),
        ))
        .with_children(|parent| {
            parent.spawn((
                DialogueSpeaker,
                Text::new(speaker),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(theme.highlight_color),
            ));
            parent.spawn((
                DialogueText,
                Text::new(text),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(theme.text_color),
            ));
            parent.spawn((
                Text::new(CONTINUE_PROMPT),
                TextFont {
                    font_size: theme.hint_font_size,
                    ..default()
                },
                TextColor(theme.hint_color),
            ));
        });
}
